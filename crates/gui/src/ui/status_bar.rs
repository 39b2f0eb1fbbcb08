use egui::Ui;

use crate::app::model_key;
use crate::i18n::t;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        ui.label(t(model_key(state.model.kind())));

        ui.separator();

        let board_count = state.model.model().boards.len();
        ui.weak(format!("{}: {board_count}", t("status.boards")));

        ui.separator();

        match state.hovered_label() {
            Some(label) => {
                ui.label(format!("{}: {label}", t("status.hovered")));
            }
            None => {
                ui.weak(t("status.ready"));
            }
        }

        if let Some(error) = state.model.error() {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(200, 60, 40), format!("{}: {error}", t("status.layout_error")));
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("deckframe v", env!("CARGO_PKG_VERSION")));
        });
    });
}
