//! Headless test harness: model, view toggles, hover and the mesh cache
//! without a window.

use shared::{Board, ModelKind, ParameterError, ParameterSet};

use crate::build::{SceneCache, SceneMeshes};
use crate::state::{HoverSource, HoverState, ModelState, ViewToggles};
use crate::validation::MeshValidator;
use crate::viewport::mesh::MeshData;
use crate::viewport::picking::{pick_board, Ray};

/// Headless test harness — drives the same state the viewer does
pub struct TestHarness {
    pub model: ModelState,
    pub view: ViewToggles,
    pub hover: HoverState,
    cache: SceneCache,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Harness showing the default model
    pub fn new() -> Self {
        Self::with_model(ModelKind::default())
    }

    pub fn with_model(kind: ModelKind) -> Self {
        Self {
            model: ModelState::new(kind),
            view: ViewToggles::default(),
            hover: HoverState::default(),
            cache: SceneCache::new(),
        }
    }

    // ── Model ─────────────────────────────────────────────────

    pub fn select_model(&mut self, kind: ModelKind) {
        self.model.set_kind(kind);
        self.hover.clear();
    }

    /// Set a numeric parameter. `Ok(false)` means the value was stored
    /// but the layout rejected it (previous boards are kept).
    pub fn set_parameter_number(&mut self, name: &str, value: f64) -> Result<bool, ParameterError> {
        let built = self.model.set_number(name, value)?;
        self.after_model_change();
        Ok(built)
    }

    pub fn set_parameter_formula(&mut self, name: &str, formula: &str) -> Result<bool, ParameterError> {
        let built = self.model.set_formula(name, formula)?;
        self.after_model_change();
        Ok(built)
    }

    pub fn reset_parameters(&mut self) {
        self.model.reset_parameters();
        self.after_model_change();
    }

    /// Replace parameters from JSON (the `ParameterSet` format)
    pub fn load_parameters_json(&mut self, json: &str) -> Result<bool, String> {
        let params: ParameterSet =
            serde_json::from_str(json).map_err(|e| format!("Invalid parameters JSON: {e}"))?;
        let built = self.model.set_parameters(params);
        self.after_model_change();
        Ok(built)
    }

    pub fn export_parameters_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self.model.parameters())
            .map_err(|e| format!("Cannot serialize parameters: {e}"))
    }

    fn after_model_change(&mut self) {
        self.hover.clamp_to(self.model.model().boards.len());
    }

    // ── View ──────────────────────────────────────────────────

    pub fn set_explode(&mut self, explode: f32) {
        self.view.set_explode(explode);
    }

    pub fn set_wireframe(&mut self, on: bool) {
        self.view.wireframe = on;
    }

    // ── Build + inspection ────────────────────────────────────

    /// Build (or reuse) meshes for the current state
    pub fn build(&mut self) -> &SceneMeshes {
        self.cache.ensure(
            self.model.model(),
            self.model.version(),
            self.view.explode(),
            self.hover.board(),
        );
        self.cache.meshes()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.cache.rebuild_count()
    }

    pub fn board_count(&self) -> usize {
        self.model.model().boards.len()
    }

    pub fn boards(&self) -> &[Board] {
        &self.model.model().boards
    }

    pub fn board_index(&self, name: &str) -> Option<usize> {
        self.boards().iter().position(|b| b.name == name)
    }

    pub fn board(&self, name: &str) -> Option<&Board> {
        self.boards().iter().find(|b| b.name == name)
    }

    /// Mesh of a board after the last `build`
    pub fn mesh_of(&self, index: usize) -> Option<&MeshData> {
        self.cache.meshes().boards.get(index)
    }

    // ── Hover ─────────────────────────────────────────────────

    /// Pick with a world-space ray, as the pointer would. Returns the hovered board.
    pub fn hover_ray(&mut self, ray: &Ray) -> Option<usize> {
        self.build();
        let hit = pick_board(ray, self.cache.bounds()).map(|(index, _)| index);
        self.hover.set(hit, HoverSource::Viewport);
        hit
    }

    /// Hover a board directly, as the board list does
    pub fn hover_board(&mut self, index: Option<usize>) {
        let index = index.filter(|i| *i < self.board_count());
        self.hover.set(index, HoverSource::BoardList);
    }

    pub fn hovered_board(&self) -> Option<&Board> {
        self.hover.board().and_then(|i| self.boards().get(i))
    }

    pub fn hovered_label(&self) -> Option<String> {
        self.hovered_board().map(|b| b.dimension_label())
    }

    // ── Validation ────────────────────────────────────────────

    /// Validate a board's mesh from the last `build`
    pub fn validate_board(&self, index: usize) -> Option<Vec<String>> {
        let board = self.boards().get(index)?;
        let mesh = self.mesh_of(index)?;
        Some(MeshValidator::new(mesh).validate_board(board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_new_harness_shows_platform() {
        let h = TestHarness::new();
        assert_eq!(h.model.kind(), ModelKind::Platform);
        assert_eq!(h.board_count(), 36);
    }

    #[test]
    fn test_build_is_cached() {
        let mut h = TestHarness::new();
        h.build();
        h.build();
        assert_eq!(h.rebuild_count(), 1);
        h.set_explode(1.5);
        h.build();
        assert_eq!(h.rebuild_count(), 2);
    }

    #[test]
    fn test_hover_ray_from_above_hits_floorboard() {
        let mut h = TestHarness::new();
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        let index = h.hover_ray(&ray).unwrap();
        assert!(h.boards()[index].name.starts_with("floorboard."));
        assert_eq!(h.hovered_label().unwrap(), "1\" x 5.5\" x 96\"");
    }

    #[test]
    fn test_hover_miss_clears() {
        let mut h = TestHarness::new();
        h.hover_board(Some(0));
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(h.hover_ray(&ray).is_none());
        assert!(h.hovered_label().is_none());
    }

    #[test]
    fn test_select_model_clears_hover() {
        let mut h = TestHarness::new();
        h.hover_board(Some(3));
        h.select_model(ModelKind::Bench);
        assert!(h.hover.board().is_none());
        assert_eq!(h.board_count(), 12);
    }

    #[test]
    fn test_validate_every_board() {
        let mut h = TestHarness::new();
        h.set_explode(1.7);
        h.build();
        for i in 0..h.board_count() {
            let errors = h.validate_board(i).unwrap();
            assert!(errors.is_empty(), "board {}: {:?}", i, errors);
        }
    }
}
