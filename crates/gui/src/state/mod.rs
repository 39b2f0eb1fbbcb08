pub mod model;
pub mod settings;
pub mod view;

pub use model::ModelState;
pub use settings::{AppSettings, Language};
pub use view::{HoverSource, HoverState, ViewToggles};

use shared::ModelKind;

/// Panel visibility flags
pub struct PanelVisibility {
    pub board_list: bool,
    pub parameters: bool,
    pub tweaks: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            board_list: true,
            parameters: true,
            tweaks: true,
        }
    }
}

/// Combined application state
pub struct AppState {
    pub model: ModelState,
    pub view: ViewToggles,
    pub hover: HoverState,
    pub panels: PanelVisibility,
    pub settings: AppSettings,
    /// Show settings window
    pub show_settings_window: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ModelKind::default(), AppSettings::load())
    }
}

impl AppState {
    pub fn new(kind: ModelKind, settings: AppSettings) -> Self {
        Self {
            model: ModelState::new(kind),
            view: ViewToggles::default(),
            hover: HoverState::default(),
            panels: PanelVisibility::default(),
            settings,
            show_settings_window: false,
        }
    }

    /// Switch model kind; hover indices are meaningless afterwards
    pub fn select_model(&mut self, kind: ModelKind) {
        self.model.set_kind(kind);
        self.hover.clear();
    }

    /// Dimension label of the hovered board
    pub fn hovered_label(&self) -> Option<String> {
        let index = self.hover.board()?;
        self.model
            .model()
            .boards
            .get(index)
            .map(|b| b.dimension_label())
    }
}
