//! View toggles and hover state

pub const EXPLODE_MIN: f32 = 1.0;
pub const EXPLODE_MAX: f32 = 2.0;
/// Step used by the `[` / `]` keys
pub const EXPLODE_STEP: f32 = 0.1;

/// Tweakable view controls (explode factor, wireframe)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewToggles {
    explode: f32,
    pub wireframe: bool,
}

impl Default for ViewToggles {
    fn default() -> Self {
        Self {
            explode: EXPLODE_MIN,
            wireframe: false,
        }
    }
}

impl ViewToggles {
    pub fn explode(&self) -> f32 {
        self.explode
    }

    /// Set explode factor, clamped to 1..=2. NaN is ignored.
    pub fn set_explode(&mut self, value: f32) {
        if value.is_nan() {
            return;
        }
        self.explode = value.clamp(EXPLODE_MIN, EXPLODE_MAX);
    }

    pub fn nudge_explode(&mut self, delta: f32) {
        // Round to the step grid so repeated nudges don't drift
        let value = ((self.explode + delta) / EXPLODE_STEP).round() * EXPLODE_STEP;
        self.set_explode(value);
    }

    pub fn toggle_wireframe(&mut self) {
        self.wireframe = !self.wireframe;
    }
}

/// Where the current hover came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverSource {
    /// Pointer ray in the viewport
    Viewport,
    /// Row in the board list panel
    BoardList,
}

/// Hovered board (index into `Model::boards`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    hovered: Option<(usize, HoverSource)>,
}

impl HoverState {
    pub fn board(&self) -> Option<usize> {
        self.hovered.map(|(i, _)| i)
    }

    pub fn source(&self) -> Option<HoverSource> {
        self.hovered.map(|(_, s)| s)
    }

    pub fn set(&mut self, board: Option<usize>, source: HoverSource) {
        self.hovered = board.map(|i| (i, source));
    }

    pub fn clear(&mut self) {
        self.hovered = None;
    }

    /// Drop the hover if it points past the end of the board list
    pub fn clamp_to(&mut self, board_count: usize) {
        if self.board().is_some_and(|i| i >= board_count) {
            self.hovered = None;
        }
    }
}
