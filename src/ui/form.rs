use anemoi::DataView;
use anemoi::query::FieldKind;
use egui::{Key, RichText, TextEdit, Ui};
use egui_dropdown::DropDownBox;

use super::PALETTE_ORANGE;

const FIELD_WIDTH: f32 = 170.;

/// Draws the filter inputs of `view` and submits it on click or Enter.
pub(crate) fn show_form(ui: &mut Ui, view: &mut dyn DataView) {
    let spec = view.spec();
    let mut edited = false;
    let mut submit = false;

    ui.horizontal_wrapped(|ui| {
        for field in spec.fields() {
            let Some(value) = view.field_mut(field.name) else {
                continue;
            };
            ui.vertical(|ui| {
                let label = if field.required {
                    format!("{} *", field.label)
                } else {
                    field.label.to_string()
                };
                ui.label(RichText::new(label).small());

                match field.kind {
                    FieldKind::Text | FieldKind::Numeric => {
                        let response = ui.add(
                            TextEdit::singleline(value)
                                .hint_text(field.hint)
                                .desired_width(FIELD_WIDTH),
                        );
                        if response.changed() {
                            if field.kind == FieldKind::Numeric {
                                value.retain(|c| c.is_ascii_digit());
                            }
                            edited = true;
                        }
                        submit |= response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                    }
                    FieldKind::Choice(choices) => {
                        let selected = choices
                            .iter()
                            .find(|(choice, _)| *choice == value.as_str())
                            .map(|(_, label)| *label)
                            .unwrap_or(field.hint);
                        egui::ComboBox::from_id_salt(field.name)
                            .selected_text(selected)
                            .width(FIELD_WIDTH)
                            .show_ui(ui, |ui| {
                                for (choice, label) in choices.iter() {
                                    edited |= ui
                                        .selectable_value(value, choice.to_string(), *label)
                                        .changed();
                                }
                            });
                    }
                    FieldKind::Suggest(suggestions) => {
                        let before = value.clone();
                        ui.add(
                            DropDownBox::from_iter(
                                suggestions.iter().copied(),
                                field.name,
                                value,
                                |ui, text| ui.selectable_label(false, text),
                            )
                            .filter_by_input(true),
                        )
                        .on_hover_text(field.hint);
                        edited |= *value != before;
                    }
                }
            });
        }
    });

    if edited {
        view.on_input();
    }

    ui.add_space(4.);
    if ui.button(spec.submit_label).clicked() {
        submit = true;
    }
    // a rejected form keeps its validation error on the view
    if submit && view.submit().is_err() {
        ui.ctx().request_repaint();
    }

    if let Some(error) = view.validation_error() {
        ui.label(RichText::new(error.to_string()).color(PALETTE_ORANGE));
    }
}
