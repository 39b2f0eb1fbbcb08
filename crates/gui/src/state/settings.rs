//! Viewer settings, persisted as JSON in the platform config directory.
//!
//! Only viewer preferences live here. Model parameters are never saved.

use serde::{Deserialize, Serialize};

/// UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ru => "Русский",
        }
    }

    pub fn all() -> &'static [Language] {
        &[Language::En, Language::Ru]
    }
}

/// Viewport colours and line widths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Show the ground disc
    pub show_ground: bool,
    /// Render board shadows (GL renderer only)
    pub shadows: bool,
    /// Edge line width in pixels (software painter)
    pub edge_width: f32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [0xee, 0xf2, 0xf5],
            show_ground: true,
            shadows: true,
            edge_width: 1.0,
        }
    }
}

/// Hover label settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Show the dimension label of the hovered board
    pub visible: bool,
    /// Smallest label height in points
    pub min_font_size: f32,
    /// Largest label height in points
    pub max_font_size: f32,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            visible: true,
            min_font_size: 10.0,
            max_font_size: 48.0,
        }
    }
}

/// Orbit camera sensitivity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Degrees per dragged pixel
    pub rotate_speed: f32,
    /// Zoom factor per scroll point
    pub zoom_speed: f32,
    /// Metres per dragged pixel at unit distance
    pub pan_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 0.5,
            zoom_speed: 0.002,
            pan_speed: 0.002,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    pub language: Language,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Language::default(),
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub viewport: ViewportSettings,
    pub labels: LabelSettings,
    pub camera: CameraSettings,
    pub ui: UiSettings,
}

impl AppSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "deckframe", "deckframe")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed settings in {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Some(dir) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!("Cannot create config dir {}: {e}", dir.display());
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Cannot write settings to {}: {e}", path.display());
                }
            }
            Err(e) => tracing::warn!("Cannot serialize settings: {e}"),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = AppSettings::from_json(r#"{"ui": {"language": "Ru"}}"#).unwrap();
        assert_eq!(s.ui.language, Language::Ru);
        assert_eq!(s.ui.font_size, 14.0);
        assert!(s.labels.visible);
        assert!(s.viewport.shadows);
    }

    #[test]
    fn test_shadows_can_be_turned_off() {
        let s = AppSettings::from_json(r#"{"viewport": {"shadows": false}}"#).unwrap();
        assert!(!s.viewport.shadows);
        assert!(s.viewport.show_ground);
    }

    #[test]
    fn test_roundtrip_keeps_camera_speed() {
        let mut s = AppSettings::default();
        s.camera.rotate_speed = 1.25;
        let json = serde_json::to_string(&s).unwrap();
        let back = AppSettings::from_json(&json).unwrap();
        assert_eq!(back.camera.rotate_speed, 1.25);
    }
}
