//! Floating window with view tweaks: explode factor and wireframe

use eframe::egui;

use crate::i18n::t;
use crate::state::view::{EXPLODE_MAX, EXPLODE_MIN, EXPLODE_STEP};
use crate::state::AppState;

pub fn show(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.panels.tweaks;
    egui::Window::new(t("tweaks.title"))
        .open(&mut open)
        .resizable(false)
        .default_pos(egui::pos2(260.0, 60.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(t("tweaks.explode"));
                let mut explode = state.view.explode();
                let response = ui.add(
                    egui::Slider::new(&mut explode, EXPLODE_MIN..=EXPLODE_MAX)
                        .step_by(EXPLODE_STEP as f64)
                        .fixed_decimals(1),
                );
                if response.changed() {
                    state.view.set_explode(explode);
                }
            });
            ui.checkbox(&mut state.view.wireframe, t("tweaks.wireframe"));
        });
    state.panels.tweaks = open;
}
