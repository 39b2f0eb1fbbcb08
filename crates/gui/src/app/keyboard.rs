//! Keyboard shortcut handling

use eframe::egui;

use crate::state::view::EXPLODE_STEP;
use crate::state::AppState;
use crate::viewport::ViewportPanel;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState, viewport: &mut ViewportPanel) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    ctx.input(|i| {
        if i.modifiers.command {
            return;
        }
        // W — toggle wireframe
        if i.key_pressed(egui::Key::W) {
            state.view.toggle_wireframe();
        }
        // R — reset camera
        if i.key_pressed(egui::Key::R) {
            viewport.reset_camera();
        }
        // [ / ] — explode less / more
        if i.key_pressed(egui::Key::OpenBracket) {
            state.view.nudge_explode(-EXPLODE_STEP);
        }
        if i.key_pressed(egui::Key::CloseBracket) {
            state.view.nudge_explode(EXPLODE_STEP);
        }
        // Escape — clear hover
        if i.key_pressed(egui::Key::Escape) {
            state.hover.clear();
        }
    });
}
