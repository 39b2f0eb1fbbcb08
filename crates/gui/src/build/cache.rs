//! Scene mesh cache

use shared::Model;

use super::{build_scene_meshes, BoardBounds, SceneMeshes};

/// Inputs the cached meshes were built from
#[derive(Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    version: u64,
    explode_bits: u32,
    hovered: Option<usize>,
}

/// Cached scene meshes, rebuilt when the model, explode factor or hover changes
#[derive(Default)]
pub struct SceneCache {
    meshes: SceneMeshes,
    key: Option<CacheKey>,
    rebuild_count: u64,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if cache is still valid
    pub fn is_valid(&self, version: u64, explode: f32, hovered: Option<usize>) -> bool {
        self.key
            == Some(CacheKey {
                version,
                explode_bits: explode.to_bits(),
                hovered,
            })
    }

    /// Rebuild cached meshes from the model
    pub fn rebuild(&mut self, model: &Model, version: u64, explode: f32, hovered: Option<usize>) {
        self.meshes = build_scene_meshes(model, explode, hovered);
        self.key = Some(CacheKey {
            version,
            explode_bits: explode.to_bits(),
            hovered,
        });
        self.rebuild_count += 1;
        tracing::trace!(
            "Scene rebuilt (#{}, {} boards)",
            self.rebuild_count,
            model.boards.len()
        );
    }

    /// Rebuild only if the inputs changed. Returns whether a rebuild happened.
    pub fn ensure(&mut self, model: &Model, version: u64, explode: f32, hovered: Option<usize>) -> bool {
        if self.is_valid(version, explode, hovered) {
            return false;
        }
        self.rebuild(model, version, explode, hovered);
        true
    }

    pub fn meshes(&self) -> &SceneMeshes {
        &self.meshes
    }

    /// Clone the cached meshes (for passing into PaintCallback)
    pub fn meshes_clone(&self) -> SceneMeshes {
        self.meshes.clone()
    }

    pub fn bounds(&self) -> &[BoardBounds] {
        &self.meshes.bounds
    }

    /// Rebuild counter
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{build_model, default_parameters, ModelKind};

    fn model() -> Model {
        build_model(ModelKind::Bench, &default_parameters(ModelKind::Bench)).unwrap()
    }

    #[test]
    fn test_cache_forces_first_rebuild() {
        let cache = SceneCache::new();
        assert!(!cache.is_valid(0, 1.0, None));
    }

    #[test]
    fn test_cache_reuses_until_inputs_change() {
        let model = model();
        let mut cache = SceneCache::new();
        assert!(cache.ensure(&model, 1, 1.0, None));
        assert!(!cache.ensure(&model, 1, 1.0, None));
        assert_eq!(cache.rebuild_count(), 1);

        assert!(cache.ensure(&model, 1, 1.5, None));
        assert!(cache.ensure(&model, 1, 1.5, Some(2)));
        assert!(cache.ensure(&model, 2, 1.5, Some(2)));
        assert_eq!(cache.rebuild_count(), 4);
        assert_eq!(cache.bounds().len(), model.boards.len());
    }
}
