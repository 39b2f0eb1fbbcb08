//! Model state: selected kind, its parameters, and the last good layout

use shared::{build_model, default_parameters, Model, ModelKind, Parameter, ParameterError, ParameterSet};

/// Current model with versioning for cache invalidation
pub struct ModelState {
    kind: ModelKind,
    parameters: ParameterSet,
    model: Model,
    /// Last layout error, cleared on a successful rebuild
    error: Option<String>,
    /// Monotonically increasing version counter for cache invalidation
    version: u64,
}

impl Default for ModelState {
    fn default() -> Self {
        Self::new(ModelKind::default())
    }
}

impl ModelState {
    pub fn new(kind: ModelKind) -> Self {
        let mut state = Self {
            kind,
            parameters: default_parameters(kind),
            model: Model {
                kind,
                boards: Vec::new(),
            },
            error: None,
            version: 0,
        };
        state.rebuild();
        state
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Switch to another kind with its default parameters
    pub fn set_kind(&mut self, kind: ModelKind) {
        self.kind = kind;
        self.parameters = default_parameters(kind);
        // Drop the previous kind's boards even if the new layout fails
        self.model = Model {
            kind,
            boards: Vec::new(),
        };
        self.rebuild();
    }

    /// Replace the whole parameter set (e.g. loaded from a file)
    pub fn set_parameters(&mut self, parameters: ParameterSet) -> bool {
        self.parameters = parameters;
        self.rebuild()
    }

    pub fn reset_parameters(&mut self) {
        self.parameters = default_parameters(self.kind);
        self.rebuild();
    }

    pub fn set_number(&mut self, name: &str, value: f64) -> Result<bool, ParameterError> {
        self.parameters.set_number(name, value)?;
        Ok(self.rebuild())
    }

    pub fn set_formula(&mut self, name: &str, formula: &str) -> Result<bool, ParameterError> {
        self.parameters.set_formula(name, formula)?;
        Ok(self.rebuild())
    }

    /// Apply an edit to a single parameter, then rebuild
    pub fn update_parameter(
        &mut self,
        edit: impl FnOnce(&mut ParameterSet) -> Result<(), ParameterError>,
    ) -> Result<bool, ParameterError> {
        edit(&mut self.parameters)?;
        Ok(self.rebuild())
    }

    pub fn insert_parameter(&mut self, parameter: Parameter) -> Result<bool, ParameterError> {
        self.update_parameter(|p| p.insert(parameter))
    }

    pub fn remove_parameter(&mut self, name: &str) -> Result<bool, ParameterError> {
        self.update_parameter(|p| {
            p.remove(name)
                .map(|_| ())
                .ok_or_else(|| ParameterError::NotFound(name.to_string()))
        })
    }

    pub fn rename_parameter(&mut self, old: &str, new: &str) -> Result<bool, ParameterError> {
        self.update_parameter(|p| p.rename(old, new))
    }

    /// Recompute the layout. On failure the previous model is kept
    /// and the error is recorded. Returns whether the layout succeeded.
    pub fn rebuild(&mut self) -> bool {
        self.version += 1;
        match build_model(self.kind, &self.parameters) {
            Ok(model) => {
                tracing::debug!("Built {} with {} boards", self.kind.slug(), model.boards.len());
                self.model = model;
                self.error = None;
                true
            }
            Err(e) => {
                tracing::warn!("Layout of {} failed: {}", self.kind.slug(), e);
                self.error = Some(e.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_builds_defaults() {
        let state = ModelState::new(ModelKind::Platform);
        assert!(state.error().is_none());
        assert_eq!(state.model().boards.len(), 36);
        assert!(state.version() > 0);
    }

    #[test]
    fn test_failed_rebuild_keeps_last_model() {
        let mut state = ModelState::new(ModelKind::Bench);
        let before = state.model().clone();
        let version = state.version();

        let ok = state.set_number("bar_length", -1.0).unwrap();
        assert!(!ok);
        assert!(state.error().is_some());
        assert_eq!(state.model(), &before);
        assert!(state.version() > version);

        state.reset_parameters();
        assert!(state.error().is_none());
    }

    #[test]
    fn test_set_kind_loads_defaults() {
        let mut state = ModelState::new(ModelKind::Platform);
        state.set_kind(ModelKind::SlottedBar);
        assert_eq!(state.kind(), ModelKind::SlottedBar);
        assert!(state.parameters().contains("slot_width"));
        assert!(!state.parameters().contains("leg_height"));
        assert!(state.model().boards.iter().any(|b| b.name.starts_with("slat.")));
    }

    #[test]
    fn test_unknown_parameter_is_error() {
        let mut state = ModelState::new(ModelKind::Platform);
        let version = state.version();
        assert!(state.set_number("nope", 1.0).is_err());
        assert_eq!(state.version(), version);
    }
}
