//! Main application module

mod keyboard;
mod menus;
mod styles;

use eframe::egui;
use shared::{ModelKind, ParameterSet};

use crate::i18n;
use crate::state::{AppSettings, AppState};
use crate::ui::{board_list, parameters, status_bar, tweaks};
use crate::viewport::ViewportPanel;

pub use menus::model_key;

/// Startup options from the command line
#[derive(Default)]
pub struct StartupOptions {
    pub model: Option<ModelKind>,
    pub parameters: Option<ParameterSet>,
}

/// Main application
pub struct DeckApp {
    state: AppState,
    viewport: ViewportPanel,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl DeckApp {
    pub fn new(cc: &eframe::CreationContext<'_>, options: StartupOptions) -> Self {
        let settings = AppSettings::load();
        let mut state = AppState::new(options.model.unwrap_or_default(), settings);

        if let Some(params) = options.parameters {
            if state.model.set_parameters(params) {
                tracing::info!("Applied parameters from file");
            } else {
                tracing::warn!(
                    "Parameters from file do not lay out ({}), restoring defaults",
                    state.model.error().unwrap_or("unknown error")
                );
                state.model.reset_parameters();
            }
        }

        i18n::set_lang(state.settings.ui.language);
        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        } else {
            tracing::warn!("No GL context, using software painter");
        }

        let last_font_size = state.settings.ui.font_size;

        Self {
            state,
            viewport,
            last_font_size,
        }
    }
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }
        if i18n::lang() != self.state.settings.ui.language {
            i18n::set_lang(self.state.settings.ui.language);
        }

        keyboard::handle_keyboard(ctx, &mut self.state, &mut self.viewport);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::model_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state, &mut self.viewport);
                menus::settings_menu(ui, &mut self.state);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(ctx, &mut self.state);

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)))
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state);
            });

        // ── Left panel: Board list ───────────────────────────
        if self.state.panels.board_list {
            egui::SidePanel::left("board_list")
                .default_width(220.0)
                .width_range(160.0..=400.0)
                .resizable(true)
                .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
                .show(ctx, |ui| {
                    board_list::show(ui, &mut self.state);
                });
        }

        // ── Right panel: Parameters ──────────────────────────
        if self.state.panels.parameters {
            egui::SidePanel::right("parameters")
                .default_width(290.0)
                .width_range(220.0..=500.0)
                .resizable(true)
                .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
                .show(ctx, |ui| {
                    parameters::show(ui, &mut self.state);
                });
        }

        // ── Tweaks window (floating) ─────────────────────────
        if self.state.panels.tweaks {
            tweaks::show(ctx, &mut self.state);
        }

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });
    }

    fn on_exit(&mut self, gl: Option<&eframe::glow::Context>) {
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
        self.state.settings.save();
    }
}
