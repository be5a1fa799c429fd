use anemoi::render::{Column, RenderedImage};
use anemoi::{Cell, DataView, Rendered, Row, ViewStatus};
use egui::{Align, Button, Hyperlink, Image, Layout, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};
use log::{error, info};

use super::{PALETTE_ORANGE, PALETTE_RED};

const ROW_HEIGHT: f32 = 20.;
const MAX_PLOT_WIDTH: f32 = 1000.;

/// Draws whatever the view's fetch state calls for: a spinner, an error, the
/// empty indicator or the rendered result with its page controls.
pub(crate) fn show_results(
    ui: &mut Ui,
    view: &mut dyn DataView,
    generation: u64,
    save_message: &mut Option<String>,
) {
    let empty_message = view.spec().empty_message;
    let mut ready = false;
    match view.status() {
        ViewStatus::Idle => {}
        ViewStatus::Loading => {
            ui.vertical_centered(|ui| {
                ui.add_space(30.);
                ui.add(egui::Spinner::new().size(48.));
                ui.label(RichText::new("Loading...").weak());
            });
        }
        ViewStatus::Empty(message) => {
            ui.vertical_centered(|ui| {
                ui.add_space(30.);
                ui.label(RichText::new(message).weak());
            });
        }
        ViewStatus::Error { hint, message } => {
            ui.vertical_centered(|ui| {
                ui.add_space(30.);
                ui.label(RichText::new(hint).color(PALETTE_ORANGE));
                ui.label(RichText::new(message).small().weak());
            });
        }
        ViewStatus::Ready(rendered) => {
            ready = true;
            show_rendered(
                ui,
                rendered,
                view.visible_rows(),
                empty_message,
                generation,
                save_message,
            );
        }
    }

    if ready {
        show_pagination(ui, view);
    }
}

fn show_rendered(
    ui: &mut Ui,
    rendered: &Rendered,
    rows: &[Row],
    empty_message: &str,
    generation: u64,
    save_message: &mut Option<String>,
) {
    if let Some(heading) = &rendered.heading {
        ui.label(RichText::new(heading).heading().color(PALETTE_RED));
        ui.add_space(6.);
    }

    if !rendered.details.is_empty() {
        egui::Grid::new("result_details")
            .num_columns(2)
            .spacing([12., 4.])
            .show(ui, |ui| {
                for (label, value) in &rendered.details {
                    ui.label(RichText::new(*label).strong());
                    ui.label(value.as_str());
                    ui.end_row();
                }
            });
        ui.add_space(8.);
    }

    if let Some(notice) = &rendered.notice {
        ui.label(RichText::new(notice).color(PALETTE_ORANGE));
    }

    if let Some(image) = &rendered.image {
        show_image(ui, image, generation, save_message);
    }

    if let Some(table) = &rendered.table {
        if rows.is_empty() {
            ui.label(RichText::new(empty_message).weak());
        } else {
            show_table(ui, &table.columns, rows);
        }
    }
}

fn show_table(ui: &mut Ui, columns: &[Column], rows: &[Row]) {
    egui::ScrollArea::horizontal()
        .id_salt("result_table_scroll")
        .show(ui, |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(Layout::left_to_right(Align::Center))
                .columns(TableColumn::auto().at_least(60.).resizable(true), columns.len())
                .header(ROW_HEIGHT + 4., |mut header| {
                    for column in columns {
                        header.col(|ui| {
                            ui.strong(column.title());
                        });
                    }
                })
                .body(|mut body| {
                    for row in rows {
                        body.row(ROW_HEIGHT, |mut table_row| {
                            for cell in &row.cells {
                                table_row.col(|ui| show_cell(ui, cell));
                            }
                        });
                    }
                });
        });
}

fn show_cell(ui: &mut Ui, cell: &Cell) {
    match cell {
        Cell::Text(text) => {
            ui.label(text.as_str());
        }
        Cell::Link { text, url } => {
            ui.add(Hyperlink::from_label_and_url(text.as_str(), url).open_in_new_tab(true));
        }
    }
}

fn show_image(ui: &mut Ui, image: &RenderedImage, generation: u64, save_message: &mut Option<String>) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(&image.title).strong());
        if ui.button("💾 Save plot").clicked()
            && let Some(path) = rfd::FileDialog::new()
                .add_filter("PNG image", &["png"])
                .set_file_name("plot.png")
                .save_file()
        {
            *save_message = Some(match std::fs::write(&path, &image.png[..]) {
                Ok(()) => {
                    info!("Plot saved to {:?}", path);
                    format!("Saved to {}", path.display())
                }
                Err(e) => {
                    error!("Could not save plot to {:?}: {}", path, e);
                    format!("Could not save plot: {}", e)
                }
            });
        }
    });
    if let Some(message) = save_message {
        ui.label(RichText::new(message.as_str()).small());
    }

    let uri = format!("bytes://anemoi/plot-{}.png", generation);
    ui.add(
        Image::from_bytes(uri, egui::load::Bytes::Shared(image.png.clone()))
            .max_width(ui.available_width().min(MAX_PLOT_WIDTH)),
    );
    ui.add_space(8.);
}

fn show_pagination(ui: &mut Ui, view: &mut dyn DataView) {
    let Some(pages) = view.pages_mut() else {
        return;
    };
    ui.add_space(8.);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(pages.has_previous(), Button::new("◀ Previous"))
            .clicked()
        {
            pages.previous();
        }
        ui.label(format!(
            "Page {} of {}",
            pages.current_page(),
            pages.total_pages()
        ));
        if ui.add_enabled(pages.has_next(), Button::new("Next ▶")).clicked() {
            pages.next();
        }
    });
}
