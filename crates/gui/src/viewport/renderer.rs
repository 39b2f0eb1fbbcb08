//! Software rendering with egui's painter, used when no GL context is available
//!
//! Boards are painted far to near. Solid mode paints each board's edges
//! right after its faces, so nearer boards cover them; wireframe mode paints
//! every edge after all faces.

use egui::{Color32, Pos2, Rect, Stroke, Ui};
use glam::Vec3;
use shared::{EDGE_COLOR, GROUND_COLOR, HOVER_COLOR};

use super::camera::ArcBallCamera;
use super::gl_renderer::LIGHT_POSITION;
use super::mesh::box_corners;
use crate::build::{BoardBounds, SceneMeshes, GROUND_RADIUS};
use crate::state::AppState;

/// Floats per line segment (two vertices of 7 floats)
const SEGMENT_STRIDE: usize = 14;
const SEGMENTS_PER_BOARD: usize = 12;

/// Quads of the unit box, as indices into `box_corners`
const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [3, 2, 6, 7],
    [0, 3, 7, 4],
    [1, 2, 6, 5],
];

/// One painting step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Faces(usize),
    Edges(usize),
}

/// Board indices sorted far to near as seen from `eye`
fn depth_order(bounds: &[BoardBounds], eye: Vec3) -> Vec<usize> {
    let mut order: Vec<(usize, f32)> = bounds
        .iter()
        .map(|b| (b.index, b.center().distance_squared(eye)))
        .collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));
    order.into_iter().map(|(index, _)| index).collect()
}

fn paint_passes(order: &[usize], wireframe: bool) -> Vec<Pass> {
    if wireframe {
        order
            .iter()
            .map(|i| Pass::Faces(*i))
            .chain(order.iter().map(|i| Pass::Edges(*i)))
            .collect()
    } else {
        order.iter().flat_map(|i| [Pass::Faces(*i), Pass::Edges(*i)]).collect()
    }
}

/// Paint the 3D viewport using egui's painter
pub fn paint_viewport(ui: &Ui, rect: Rect, camera: &ArcBallCamera, scene: &SceneMeshes, state: &AppState) {
    let painter = ui.painter_at(rect);
    let settings = &state.settings.viewport;

    let bg = settings.background_color;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(bg[0], bg[1], bg[2]));

    if settings.show_ground {
        draw_ground(&painter, rect, camera);
    }

    let eye = camera.eye_position();
    let hovered = state.hover.board();
    let boards = &state.model.model().boards;
    let edge = Stroke::new(settings.edge_width, rgb32(EDGE_COLOR));
    let hover_edge = Stroke::new(settings.edge_width + 1.5, rgb32(HOVER_COLOR));

    let order = depth_order(&scene.bounds, eye);
    for pass in paint_passes(&order, state.view.wireframe) {
        match pass {
            Pass::Faces(i) => {
                let Some(bounds) = scene.bounds.get(i) else {
                    continue;
                };
                let color = if hovered == Some(i) {
                    HOVER_COLOR
                } else {
                    boards.get(i).map(|b| b.color).unwrap_or(shared::BOARD_COLOR)
                };
                draw_faces(&painter, rect, camera, bounds, eye, color);
            }
            Pass::Edges(i) => {
                let stroke = if hovered == Some(i) { hover_edge } else { edge };
                let start = i * SEGMENTS_PER_BOARD * SEGMENT_STRIDE;
                let end = start + SEGMENTS_PER_BOARD * SEGMENT_STRIDE;
                if let Some(verts) = scene.edges.vertices.get(start..end) {
                    for seg in verts.chunks_exact(SEGMENT_STRIDE) {
                        draw_segment(&painter, rect, camera, seg, stroke);
                    }
                }
            }
        }
    }
}

/// Front-facing quads of a board, flat shaded
fn draw_faces(
    painter: &egui::Painter,
    rect: Rect,
    camera: &ArcBallCamera,
    bounds: &BoardBounds,
    eye: Vec3,
    color: [u8; 3],
) {
    let corners = box_corners(&bounds.world);
    let center = bounds.center();
    let light = Vec3::from(LIGHT_POSITION).normalize();

    for face in BOX_FACES {
        let face_center = face.iter().map(|i| corners[*i]).sum::<Vec3>() / 4.0;
        let normal = (face_center - center).normalize_or_zero();
        if normal.dot(eye - face_center) <= 0.0 {
            continue;
        }
        let points: Option<Vec<Pos2>> = face
            .iter()
            .map(|i| camera.project(corners[*i].to_array(), rect))
            .collect();
        if let Some(points) = points {
            let shade = 0.75 + 0.25 * normal.dot(light).max(0.0);
            painter.add(egui::Shape::convex_polygon(points, shaded(color, shade), Stroke::NONE));
        }
    }
}

fn shaded(c: [u8; 3], factor: f32) -> Color32 {
    let scale = |v: u8| (v as f32 * factor).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(scale(c[0]), scale(c[1]), scale(c[2]))
}

fn draw_segment(painter: &egui::Painter, rect: Rect, camera: &ArcBallCamera, seg: &[f32], stroke: Stroke) {
    let a = camera.project([seg[0], seg[1], seg[2]], rect);
    let b = camera.project([seg[7], seg[8], seg[9]], rect);
    if let (Some(a), Some(b)) = (a, b) {
        painter.line_segment([a, b], stroke);
    }
}

/// Ground disc outline
fn draw_ground(painter: &egui::Painter, rect: Rect, camera: &ArcBallCamera) {
    let radius = shared::inches_to_meters(GROUND_RADIUS) as f32;
    let segments = 64;
    let points: Vec<Pos2> = (0..=segments)
        .filter_map(|i| {
            let a = i as f32 * std::f32::consts::TAU / segments as f32;
            camera.project([radius * a.cos(), 0.0, radius * a.sin()], rect)
        })
        .collect();

    if points.len() > 2 {
        painter.add(egui::Shape::line(points, Stroke::new(1.0, rgb32(GROUND_COLOR))));
    }
}

pub fn rgb32(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn bounds_at(index: usize, x: f32) -> BoardBounds {
        let world = Mat4::from_translation(Vec3::new(x, 0.0, 0.0));
        BoardBounds {
            index,
            world,
            inverse: world.inverse(),
        }
    }

    #[test]
    fn test_depth_order_far_to_near() {
        let bounds = [bounds_at(0, 1.0), bounds_at(1, 5.0), bounds_at(2, 3.0)];
        assert_eq!(depth_order(&bounds, Vec3::ZERO), vec![1, 2, 0]);
    }

    #[test]
    fn test_solid_interleaves_edges() {
        let passes = paint_passes(&[1, 0], false);
        assert_eq!(
            passes,
            vec![Pass::Faces(1), Pass::Edges(1), Pass::Faces(0), Pass::Edges(0)]
        );
    }

    #[test]
    fn test_wireframe_edges_over_all_faces() {
        let passes = paint_passes(&[1, 0], true);
        assert_eq!(
            passes,
            vec![Pass::Faces(1), Pass::Faces(0), Pass::Edges(1), Pass::Edges(0)]
        );
    }

    #[test]
    fn test_shaded_scales_channels() {
        assert_eq!(shaded([200, 100, 0], 0.5), Color32::from_rgb(100, 50, 0));
        assert_eq!(shaded([200, 100, 0], 1.0), Color32::from_rgb(200, 100, 0));
    }
}
