mod app;
pub mod i18n;
mod ui;
mod viewport;

// Re-export library modules so that `crate::build`, `crate::state`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use deckframe_lib::build;
pub use deckframe_lib::state;

use app::{DeckApp, StartupOptions};
use shared::{ModelKind, ParameterSet};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deckframe=info,deckframe_lib=info".into()),
        )
        .init();

    let options = parse_args();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("deckframe")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "deckframe",
        native_options,
        Box::new(move |cc| Ok(Box::new(DeckApp::new(cc, options)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// Parse `--model <slug>` and `--params <file.json>`
fn parse_args() -> StartupOptions {
    let args: Vec<String> = std::env::args().collect();
    let mut options = StartupOptions::default();
    let mut i = 1;
    while i < args.len() {
        match (args[i].as_str(), args.get(i + 1)) {
            ("--model", Some(slug)) => {
                match slug.parse::<ModelKind>() {
                    Ok(kind) => options.model = Some(kind),
                    Err(e) => tracing::error!("{e}"),
                }
                i += 2;
            }
            ("--params", Some(path)) => {
                options.parameters = load_parameters(path);
                i += 2;
            }
            (other, _) => {
                tracing::warn!("Ignoring argument '{other}'");
                i += 1;
            }
        }
    }
    options
}

fn load_parameters(path: &str) -> Option<ParameterSet> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to read parameters file {path}: {e}");
            return None;
        }
    };
    match serde_json::from_str::<ParameterSet>(&json) {
        Ok(params) => {
            tracing::info!("Loaded {} parameters from {path}", params.len());
            Some(params)
        }
        Err(e) => {
            tracing::error!("Failed to parse parameters JSON from {path}: {e}");
            None
        }
    }
}
