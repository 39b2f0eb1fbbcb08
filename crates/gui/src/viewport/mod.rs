//! 3D viewport panel with OpenGL rendering

mod camera;
mod gl_renderer;
pub use deckframe_lib::viewport::{mesh, picking};
mod overlays;
mod renderer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use egui::Ui;

use crate::build::{SceneCache, SceneMeshes};
use crate::state::{AppState, HoverSource};
use camera::ArcBallCamera;
use gl_renderer::GlRenderer;
use picking::pick_board;

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    camera: ArcBallCamera,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    /// Set from the paint callback when an upload fails; switches to the software painter
    gl_failed: Arc<AtomicBool>,
    cache: SceneCache,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            camera: ArcBallCamera::new(),
            gl_renderer: None,
            gl_failed: Arc::new(AtomicBool::new(false)),
            cache: SceneCache::new(),
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => {
                tracing::info!("GL renderer ready");
                self.gl_renderer = Some(Arc::new(Mutex::new(renderer)));
            }
            Err(e) => {
                tracing::error!("GL renderer unavailable, using software painter: {e}");
            }
        }
    }

    /// Release GL resources (call from `on_exit`)
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        self.handle_camera(&response, ui, state);

        // Picking uses bounds at the current explode factor; hover colour
        // is applied by the rebuild after picking.
        self.rebuild_if_needed(state);
        self.handle_hover(&response, rect, state);
        self.rebuild_if_needed(state);

        if !ui.is_rect_visible(rect) {
            return;
        }

        self.render(ui, rect, state);
        self.draw_overlays(ui, rect, state);
    }

    fn handle_camera(&mut self, response: &egui::Response, ui: &Ui, state: &AppState) {
        let speeds = &state.settings.camera;

        if response.dragged_by(egui::PointerButton::Primary) || response.dragged_by(egui::PointerButton::Middle) {
            let delta = response.drag_delta();
            self.camera.rotate(-delta.x * speeds.rotate_speed, delta.y * speeds.rotate_speed);
        }

        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            let scale = speeds.pan_speed * self.camera.distance;
            self.camera.pan(-delta.x * scale, delta.y * scale);
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.camera.zoom(scroll * speeds.zoom_speed);
            }
        }
    }

    fn rebuild_if_needed(&mut self, state: &AppState) {
        self.cache.ensure(
            state.model.model(),
            state.model.version(),
            state.view.explode(),
            state.hover.board(),
        );
    }

    fn handle_hover(&mut self, response: &egui::Response, rect: egui::Rect, state: &mut AppState) {
        let dragging = response.dragged();
        match response.hover_pos() {
            Some(pos) if !dragging => {
                let ray = self.camera.screen_ray(pos, rect);
                let hit = pick_board(&ray, self.cache.bounds()).map(|(index, _)| index);
                if hit != state.hover.board() || state.hover.source() != Some(HoverSource::Viewport) {
                    state.hover.set(hit, HoverSource::Viewport);
                }
            }
            Some(_) => {}
            None => {
                if state.hover.source() == Some(HoverSource::Viewport) {
                    state.hover.clear();
                }
            }
        }
    }

    fn render(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        match &self.gl_renderer {
            Some(gl_renderer) if !self.gl_failed.load(Ordering::Relaxed) => {
                self.render_gl(ui, rect, state, gl_renderer.clone());
            }
            _ => renderer::paint_viewport(ui, rect, &self.camera, self.cache.meshes(), state),
        }
    }

    fn render_gl(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState, renderer: Arc<Mutex<GlRenderer>>) {
        let camera_yaw = self.camera.yaw;
        let camera_pitch = self.camera.pitch;
        let camera_distance = self.camera.distance;
        let camera_target = self.camera.target;
        let camera_fov = self.camera.fov;

        let meshes: SceneMeshes = self.cache.meshes_clone();
        let version = self.cache.rebuild_count();
        let failed = self.gl_failed.clone();

        let wireframe = state.view.wireframe;
        let show_ground = state.settings.viewport.show_ground;
        let shadows = state.settings.viewport.shadows;
        let bg_color = state.settings.viewport.background_color;

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();

                let camera = ArcBallCamera {
                    yaw: camera_yaw,
                    pitch: camera_pitch,
                    distance: camera_distance,
                    target: camera_target,
                    fov: camera_fov,
                };

                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px as f32,
                    clip.from_bottom_px as f32,
                    clip.width_px as f32,
                    clip.height_px as f32,
                ];

                if let Ok(mut r) = renderer.lock() {
                    if let Err(e) = r.sync_from_scene(gl, &meshes, version) {
                        tracing::error!("GL upload failed, switching to software painter: {e}");
                        failed.store(true, Ordering::Relaxed);
                        return;
                    }

                    let render_params = gl_renderer::RenderParams {
                        viewport,
                        wireframe,
                        show_ground,
                        shadows,
                        bg_color,
                    };
                    r.paint(gl, &camera, &render_params);
                }
            })),
        };

        ui.painter().add(callback);
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let painter = ui.painter_at(rect);

        overlays::draw_hover_label(&painter, rect, &self.camera, self.cache.bounds(), state);
        overlays::draw_camera_info(&painter, rect, &self.camera);
        overlays::draw_nav_hint(&painter, rect);
    }
}
