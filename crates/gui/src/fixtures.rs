//! Helpers for building test data: parameter files and aiming rays.

use glam::Vec3;
use shared::{default_parameters, inches_to_meters, Board, ModelKind};

use crate::viewport::picking::Ray;

/// Default parameters of a kind as the JSON accepted by `--params`
pub fn default_parameters_json(kind: ModelKind) -> String {
    serde_json::to_string_pretty(&default_parameters(kind)).unwrap_or_default()
}

/// World-space centre of a board in metres at the given explode factor
pub fn board_center(board: &Board, explode: f32) -> Vec3 {
    let p = board.exploded_position(explode as f64);
    Vec3::new(
        inches_to_meters(p[0]) as f32,
        inches_to_meters(p[1]) as f32,
        inches_to_meters(p[2]) as f32,
    )
}

/// Ray from `from` (metres) aimed at a board's centre
pub fn ray_at_board(board: &Board, explode: f32, from: Vec3) -> Ray {
    let target = board_center(board, explode);
    Ray::new(from, target - from)
}

/// Ray straight down onto the board from 10 m above it
pub fn ray_down_onto(board: &Board, explode: f32) -> Ray {
    let c = board_center(board, explode);
    Ray::new(Vec3::new(c.x, 10.0, c.z), Vec3::NEG_Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ParameterSet;

    #[test]
    fn test_default_parameters_json_parses() {
        for kind in ModelKind::all() {
            let json = default_parameters_json(*kind);
            let params: ParameterSet = serde_json::from_str(&json).unwrap();
            assert_eq!(params, default_parameters(*kind));
        }
    }
}
