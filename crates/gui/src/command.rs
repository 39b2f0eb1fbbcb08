//! JSON command protocol for scripted agents and integration tests.
//!
//! Each command is a JSON object tagged by `"command"`:
//! `{"command": "set_parameter", "name": "leg_height", "value": 30}`.

use serde::{Deserialize, Serialize};
use shared::{ModelKind, Stock};

use crate::harness::TestHarness;
use crate::viewport::picking::Ray;

/// A command an agent can execute against the harness.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Switch model kind (loads its default parameters)
    SelectModel { model: ModelKind },
    /// Set a parameter to a number
    SetParameter { name: String, value: f64 },
    /// Set a parameter to a formula
    SetFormula { name: String, formula: String },
    /// Restore the current model's default parameters
    ResetParameters,
    /// Set explode factor (clamped to 1..=2)
    SetExplode { value: f32 },
    SetWireframe { enabled: bool },
    /// Hover with a world-space ray (metres)
    Hover { origin: [f32; 3], direction: [f32; 3] },
    /// Describe the model and its boards
    Inspect,
    /// Return the parameter set as JSON text
    ExportParameters,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Outcome of a parameter edit: stored, but the layout may still reject it
fn layout_response(harness: &TestHarness, built: bool) -> CommandResponse {
    if built {
        CommandResponse::ok_with_data(serde_json::json!({ "board_count": harness.board_count() }))
    } else {
        CommandResponse::err(
            harness
                .model
                .error()
                .unwrap_or("Layout failed")
                .to_string(),
        )
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::SelectModel { model } => {
            harness.select_model(model);
            layout_response(harness, harness.model.error().is_none())
        }

        AgentCommand::SetParameter { name, value } => {
            match harness.set_parameter_number(&name, value) {
                Ok(built) => layout_response(harness, built),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::SetFormula { name, formula } => {
            match harness.set_parameter_formula(&name, &formula) {
                Ok(built) => layout_response(harness, built),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::ResetParameters => {
            harness.reset_parameters();
            layout_response(harness, harness.model.error().is_none())
        }

        AgentCommand::SetExplode { value } => {
            harness.set_explode(value);
            CommandResponse::ok_with_data(serde_json::json!({ "explode": harness.view.explode() }))
        }

        AgentCommand::SetWireframe { enabled } => {
            harness.set_wireframe(enabled);
            CommandResponse::ok()
        }

        AgentCommand::Hover { origin, direction } => {
            let ray = Ray::new(origin.into(), direction.into());
            if ray.direction == glam::Vec3::ZERO {
                return CommandResponse::err("Ray direction must be non-zero");
            }
            let hit = harness.hover_ray(&ray);
            let board = hit.and_then(|i| harness.boards().get(i));
            CommandResponse::ok_with_data(serde_json::json!({
                "index": hit,
                "name": board.map(|b| b.name.clone()),
                "label": board.map(|b| b.dimension_label()),
            }))
        }

        AgentCommand::Inspect => {
            let model = harness.model.model();
            let boards: Vec<serde_json::Value> = model
                .boards
                .iter()
                .map(|b| {
                    serde_json::json!({
                        "name": b.name,
                        "stock": b.stock,
                        "label": b.dimension_label(),
                        "position": b.position,
                    })
                })
                .collect();
            let by_stock: serde_json::Map<String, serde_json::Value> = model
                .board_count_by_stock()
                .into_iter()
                .map(|(stock, n): (Stock, usize)| (stock.display_name().to_string(), n.into()))
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "model": harness.model.kind(),
                "board_count": boards.len(),
                "by_stock": by_stock,
                "boards": boards,
                "explode": harness.view.explode(),
                "wireframe": harness.view.wireframe,
                "hovered": harness.hover.board(),
                "error": harness.model.error(),
            }))
        }

        AgentCommand::ExportParameters => match harness.export_parameters_json() {
            Ok(json) => CommandResponse::ok_with_data(serde_json::json!({ "parameters_json": json })),
            Err(e) => CommandResponse::err(e),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    tracing::debug!("Executing {:?}", cmd);
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_reset() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"command": "reset_parameters"}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::ResetParameters));
    }

    #[test]
    fn test_command_serde_select_model() {
        let json = r#"{"command": "select_model", "model": "slotted-bar"}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            AgentCommand::SelectModel {
                model: ModelKind::SlottedBar
            }
        ));
    }

    #[test]
    fn test_execute_set_parameter() {
        let mut h = TestHarness::new();
        let resp = execute_json(
            &mut h,
            r#"{"command": "set_parameter", "name": "wall_courses", "value": 4}"#,
        )
        .unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.unwrap()["board_count"], 40);
    }

    #[test]
    fn test_unknown_parameter_fails() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "set_parameter", "name": "nope", "value": 1}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("nope"));
    }

    #[test]
    fn test_layout_error_reported() {
        let mut h = TestHarness::new();
        let resp = execute_json(
            &mut h,
            r#"{"command": "set_formula", "name": "leg_height", "formula": "0 - feet"}"#,
        )
        .unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("leg_height"));
        assert_eq!(h.board_count(), 36);
    }

    #[test]
    fn test_execute_inspect() {
        let mut h = TestHarness::with_model(ModelKind::Bench);
        let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["model"], "bench");
        assert_eq!(data["board_count"], 12);
        assert_eq!(data["by_stock"]["2x6"], 3);
        assert_eq!(data["by_stock"]["2x4"], 9);
    }

    #[test]
    fn test_zero_direction_rejected() {
        let mut h = TestHarness::new();
        let resp = execute_json(
            &mut h,
            r#"{"command": "hover", "origin": [0, 5, 0], "direction": [0, 0, 0]}"#,
        )
        .unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = TestHarness::new();
        assert!(execute_json(&mut h, "not valid json").is_err());
    }
}
