//! Viewport overlay drawing (hover label, camera info, hints)

use egui::{Align2, Color32, FontId, Painter, Rect};
use shared::inches_to_meters;

use super::camera::ArcBallCamera;
use crate::build::BoardBounds;
use crate::i18n::t;
use crate::state::AppState;

/// Dimension label of the hovered board, centred on the board
pub fn draw_hover_label(
    painter: &Painter,
    rect: Rect,
    camera: &ArcBallCamera,
    bounds: &[BoardBounds],
    state: &AppState,
) {
    if !state.settings.labels.visible {
        return;
    }
    let Some(index) = state.hover.board() else {
        return;
    };
    let Some(board) = state.model.model().boards.get(index) else {
        return;
    };
    let Some(center) = bounds.get(index).map(|b| b.center()) else {
        return;
    };
    let Some(screen) = camera.project(center.to_array(), rect) else {
        return;
    };

    let labels = &state.settings.labels;
    let world_size = inches_to_meters(board.label_font_size()) as f32;
    let size = camera
        .world_to_pixels(world_size, center, rect)
        .clamp(labels.min_font_size, labels.max_font_size.max(labels.min_font_size));

    let text = board.dimension_label();
    let font = FontId::proportional(size);

    // Light halo so the label reads against both ground and boards
    for offset in [egui::vec2(1.0, 1.0), egui::vec2(-1.0, -1.0)] {
        painter.text(screen + offset, Align2::CENTER_CENTER, &text, font.clone(), Color32::WHITE);
    }
    painter.text(screen, Align2::CENTER_CENTER, text, font, Color32::BLACK);
}

pub fn draw_camera_info(painter: &Painter, rect: Rect, camera: &ArcBallCamera) {
    let overlay_rect = Rect::from_min_size(
        egui::pos2(rect.right() - 140.0, rect.top() + 4.0),
        egui::vec2(136.0, 44.0),
    );
    painter.rect_filled(overlay_rect, 4.0, Color32::from_rgba_premultiplied(0, 0, 0, 140));
    painter.text(
        overlay_rect.min + egui::vec2(6.0, 4.0),
        Align2::LEFT_TOP,
        format!(
            "Dist: {:.2} m\nYaw: {:.0}  Pitch: {:.0}",
            camera.distance,
            camera.yaw.to_degrees(),
            camera.pitch.to_degrees(),
        ),
        FontId::monospace(10.0),
        Color32::from_rgb(200, 200, 210),
    );
}

pub fn draw_nav_hint(painter: &Painter, rect: Rect) {
    painter.text(
        egui::pos2(rect.center().x, rect.bottom() - 20.0),
        Align2::CENTER_BOTTOM,
        t("status.nav_hint"),
        FontId::proportional(11.0),
        Color32::from_rgb(100, 100, 110),
    );
}
