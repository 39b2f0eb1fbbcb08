//! Integration tests for the TestHarness: model switching, parameter edits,
//! hover picking and mesh caching.

use deckframe_lib::fixtures::*;
use deckframe_lib::harness::TestHarness;
use deckframe_lib::viewport::picking::Ray;
use glam::Vec3;
use shared::{ModelKind, Stock};

#[test]
fn test_default_model_is_platform() {
    let h = TestHarness::new();
    assert_eq!(h.model.kind(), ModelKind::Platform);
    assert_eq!(h.board_count(), 36);
    assert!(h.model.error().is_none());
}

#[test]
fn test_switch_models() {
    let mut h = TestHarness::new();

    h.select_model(ModelKind::Bench);
    assert_eq!(h.board_count(), 12);

    h.select_model(ModelKind::SlottedBar);
    assert_eq!(h.board_count(), 18);
    let slats = h.boards().iter().filter(|b| b.stock == Stock::TwoByTwo).count();
    assert_eq!(slats, 9);
}

#[test]
fn test_switch_model_clears_hover() {
    let mut h = TestHarness::with_model(ModelKind::Bench);
    h.hover_board(Some(3));
    assert_eq!(h.hover.board(), Some(3));

    h.select_model(ModelKind::Platform);
    assert_eq!(h.hover.board(), None);
}

#[test]
fn test_parameter_changes_layout() {
    let mut h = TestHarness::new();
    assert_eq!(h.set_parameter_number("wall_courses", 4.0), Ok(true));
    assert_eq!(h.board_count(), 40);

    h.reset_parameters();
    assert_eq!(h.board_count(), 36);
}

#[test]
fn test_formula_drives_dependents() {
    let mut h = TestHarness::with_model(ModelKind::Bench);
    let before = h.board("top.0").map(|b| b.length);
    assert_eq!(before, Some(72.0));

    assert_eq!(h.set_parameter_formula("bar_length", "5 * feet"), Ok(true));
    assert_eq!(h.board("top.0").map(|b| b.length), Some(60.0));
}

#[test]
fn test_rejected_layout_keeps_previous_boards() {
    let mut h = TestHarness::new();
    let before = h.boards().to_vec();

    assert_eq!(h.set_parameter_number("wall_courses", 0.0), Ok(false));
    assert!(h.model.error().is_some());
    assert_eq!(h.boards(), &before[..]);

    assert_eq!(h.set_parameter_number("wall_courses", 3.0), Ok(true));
    assert!(h.model.error().is_none());
}

#[test]
fn test_unknown_parameter_is_error() {
    let mut h = TestHarness::new();
    assert!(h.set_parameter_number("no_such_param", 1.0).is_err());
    assert!(h.set_parameter_formula("feet", "(1 + 2").is_err());
}

#[test]
fn test_parameters_json_roundtrip_through_harness() {
    let mut h = TestHarness::with_model(ModelKind::Bench);
    h.set_parameter_number("leg_inset", 4.0).unwrap();
    let json = h.export_parameters_json().unwrap();

    let mut other = TestHarness::with_model(ModelKind::Bench);
    assert_eq!(other.load_parameters_json(&json), Ok(true));
    assert_eq!(other.boards(), h.boards());

    assert!(other.load_parameters_json("not json").is_err());
}

#[test]
fn test_default_parameters_json_loads() {
    for kind in ModelKind::all() {
        let mut h = TestHarness::with_model(*kind);
        let before = h.boards().to_vec();
        assert_eq!(h.load_parameters_json(&default_parameters_json(*kind)), Ok(true));
        assert_eq!(h.boards(), &before[..]);
    }
}

#[test]
fn test_hover_from_above_hits_top_board() {
    let mut h = TestHarness::with_model(ModelKind::Bench);
    let index = h.board_index("top.1").unwrap();
    let ray = ray_down_onto(&h.boards()[index], 1.0);

    assert_eq!(h.hover_ray(&ray), Some(index));
    assert_eq!(h.hovered_label().as_deref(), Some("1.5\" x 5.5\" x 72\""));
}

#[test]
fn test_hover_follows_explode() {
    let mut h = TestHarness::with_model(ModelKind::Bench);
    let index = h.board_index("top.0").unwrap();
    let board = h.boards()[index].clone();

    h.set_explode(2.0);
    assert_eq!(h.hover_ray(&ray_down_onto(&board, 2.0)), Some(index));
}

#[test]
fn test_hover_miss_clears() {
    let mut h = TestHarness::new();
    let ray = ray_down_onto(&h.boards()[0], 1.0);
    h.hover_ray(&ray);
    assert!(h.hover.board().is_some());

    let away = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
    assert_eq!(h.hover_ray(&away), None);
    assert_eq!(h.hover.board(), None);
}

#[test]
fn test_hover_board_out_of_range_ignored() {
    let mut h = TestHarness::with_model(ModelKind::Bench);
    h.hover_board(Some(500));
    assert_eq!(h.hover.board(), None);
}

#[test]
fn test_cache_reuse_and_invalidation() {
    let mut h = TestHarness::new();
    h.build();
    h.build();
    assert_eq!(h.rebuild_count(), 1);

    h.set_explode(1.5);
    h.build();
    assert_eq!(h.rebuild_count(), 2);

    h.hover_board(Some(0));
    h.build();
    assert_eq!(h.rebuild_count(), 3);

    h.set_parameter_number("floorboard_count", 6.0).unwrap();
    h.build();
    assert_eq!(h.rebuild_count(), 4);

    // Wireframe does not change geometry
    h.set_wireframe(true);
    h.build();
    assert_eq!(h.rebuild_count(), 4);
}

#[test]
fn test_every_board_mesh_validates() {
    for kind in ModelKind::all() {
        let mut h = TestHarness::with_model(*kind);
        h.build();
        for i in 0..h.board_count() {
            let errors = h.validate_board(i).unwrap();
            assert!(errors.is_empty(), "{} board {i}: {:?}", kind.slug(), errors);
        }
        assert!(h.validate_board(h.board_count()).is_none());
    }
}

#[test]
fn test_aim_at_board_from_side() {
    let mut h = TestHarness::with_model(ModelKind::SlottedBar);
    let index = h.board_index("footrest").unwrap();
    let board = h.boards()[index].clone();
    let center = board_center(&board, 1.0);
    // Looking along -Z from in front of the bar, at footrest height
    let ray = ray_at_board(&board, 1.0, Vec3::new(center.x, center.y, 5.0));
    assert_eq!(h.hover_ray(&ray), Some(index));
}
