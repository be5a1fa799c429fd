use std::time::Duration;

use anemoi::{AppConfig, FetchContext, ViewHost, ViewKind, ViewStatus, config::WindowSize};
use egui::{Color32, CornerRadius, RichText, Visuals, style::Widgets};
use log::error;

mod form;
mod results;

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(14, 14, 18);
pub(crate) const PALETTE_GREY: Color32 = Color32::from_rgb(38, 40, 46);
pub(crate) const PALETTE_RED: Color32 = Color32::from_rgb(225, 6, 0);
pub(crate) const PALETTE_ORANGE: Color32 = Color32::from_rgb(242, 97, 63);

const DEFAULT_BUTTON_CORNER_RADIUS: u8 = 4;
const LOADING_REPAINT_MS: u64 = 100;

/// Desktop client: a navigation bar over exactly one mounted data view.
pub struct AnemoiApp {
    app_config: AppConfig,
    host: ViewHost,
    // bumped whenever a new result arrives so plots get a fresh texture
    image_generation: u64,
    loaded_generation: u64,
    save_message: Option<String>,
}

impl AnemoiApp {
    pub fn new(
        app_config: AppConfig,
        context: FetchContext,
        initial_view: ViewKind,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut visuals = Visuals {
            dark_mode: true,
            hyperlink_color: PALETTE_ORANGE,
            faint_bg_color: PALETTE_GREY,
            extreme_bg_color: PALETTE_BLACK,
            panel_fill: PALETTE_BLACK,
            button_frame: true,
            widgets: Widgets::dark(),
            striped: true,
            ..Default::default()
        };
        visuals.widgets.inactive.corner_radius = CornerRadius::same(DEFAULT_BUTTON_CORNER_RADIUS);
        visuals.widgets.hovered.corner_radius = CornerRadius::same(DEFAULT_BUTTON_CORNER_RADIUS);
        visuals.selection.bg_fill = PALETTE_RED;
        cc.egui_ctx.set_visuals(visuals);

        Self {
            app_config,
            host: ViewHost::new(initial_view, context),
            image_generation: 0,
            loaded_generation: 0,
            save_message: None,
        }
    }

    fn select(&mut self, kind: ViewKind) {
        if self.host.select(kind) {
            self.save_message = None;
            self.image_generation += 1;
        }
    }

    fn show_nav_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("navigation_bar")
            .frame(egui::Frame::new().fill(PALETTE_GREY).inner_margin(6))
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    if ui
                        .button(RichText::new("☰").size(18.))
                        .on_hover_text("Views")
                        .clicked()
                    {
                        self.host.router_mut().toggle_nav();
                    }
                    ui.label(RichText::new("Anemoi").strong().size(18.).color(PALETTE_RED));
                    ui.separator();

                    let active = self.host.router().active();
                    let mut selected = None;
                    for kind in ViewKind::ALL {
                        if ui.selectable_label(*kind == active, kind.title()).clicked() {
                            selected = Some(*kind);
                        }
                    }
                    if let Some(kind) = selected {
                        self.select(kind);
                    }
                });
            });
    }

    fn show_nav_overlay(&mut self, ctx: &egui::Context) {
        if !self.host.router().is_nav_open() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.host.router_mut().close_nav();
            return;
        }

        let active = self.host.router().active();
        let mut selected = None;
        egui::SidePanel::left("navigation_overlay")
            .resizable(false)
            .default_width(180.)
            .show(ctx, |ui| {
                ui.add_space(8.);
                for kind in ViewKind::ALL {
                    let label = RichText::new(kind.title()).size(16.);
                    if ui.selectable_label(*kind == active, label).clicked() {
                        selected = Some(*kind);
                    }
                }
            });
        if let Some(kind) = selected {
            self.select(kind);
        }
    }
}

impl eframe::App for AnemoiApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.app_config.default_view = self.host.router().active();
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.host.view_mut().poll() {
            self.image_generation += 1;
        }
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.app_config.window_size = WindowSize {
                width: rect.width(),
                height: rect.height(),
            };
        }

        self.show_nav_bar(ctx);
        self.show_nav_overlay(ctx);

        if self.loaded_generation != self.image_generation {
            ctx.forget_all_images();
            self.loaded_generation = self.image_generation;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let view = self.host.view_mut();
                    ui.heading(view.kind().title());
                    ui.add_space(6.);
                    form::show_form(ui, view);
                    ui.add_space(10.);
                    results::show_results(
                        ui,
                        self.host.view_mut(),
                        self.image_generation,
                        &mut self.save_message,
                    );
                });
        });

        if matches!(self.host.view().status(), ViewStatus::Loading) {
            ctx.request_repaint_after(Duration::from_millis(LOADING_REPAINT_MS));
        }
    }
}
