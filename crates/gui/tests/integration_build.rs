//! Integration tests for the build pipeline.
//!
//! Tests end-to-end: parameters -> layout -> build_scene_meshes -> validate mesh output.

use deckframe_lib::build::build_scene_meshes;
use deckframe_lib::validation::MeshValidator;
use shared::{build_model, default_parameters, ModelKind, BOARD_COLOR, GROUND_COLOR, HOVER_COLOR};

#[test]
fn test_every_model_end_to_end() {
    for kind in ModelKind::all() {
        let model = build_model(*kind, &default_parameters(*kind)).unwrap();
        let meshes = build_scene_meshes(&model, 1.0, None);

        assert_eq!(meshes.boards.len(), model.boards.len(), "{}", kind.slug());
        assert_eq!(meshes.bounds.len(), model.boards.len());
        assert_eq!(meshes.edges.segment_count(), model.boards.len() * 12);

        for (board, mesh) in model.boards.iter().zip(&meshes.boards) {
            let errors = MeshValidator::new(mesh).validate_board(board);
            assert!(errors.is_empty(), "{} {}: {:?}", kind.slug(), board.name, errors);
        }
    }
}

#[test]
fn test_platform_board_count() {
    let model = build_model(ModelKind::Platform, &default_parameters(ModelKind::Platform)).unwrap();
    let meshes = build_scene_meshes(&model, 1.0, None);
    assert_eq!(meshes.boards.len(), 36);
}

#[test]
fn test_ground_disc_present() {
    let model = build_model(ModelKind::Bench, &default_parameters(ModelKind::Bench)).unwrap();
    let meshes = build_scene_meshes(&model, 1.0, None);

    let ground = MeshValidator::new(&meshes.ground);
    assert!(ground.validate_all().is_empty());
    assert!(ground.has_uniform_color(GROUND_COLOR));
    // Flat disc in the XZ plane
    assert!(ground.dimensions()[1].abs() < 1e-6);
}

#[test]
fn test_hovered_board_recolored() {
    let model = build_model(ModelKind::Bench, &default_parameters(ModelKind::Bench)).unwrap();
    let meshes = build_scene_meshes(&model, 1.0, Some(2));

    for (i, mesh) in meshes.boards.iter().enumerate() {
        let expected = if i == 2 { HOVER_COLOR } else { BOARD_COLOR };
        assert!(MeshValidator::new(mesh).has_uniform_color(expected), "board {i}");
    }
}

#[test]
fn test_explode_moves_boards_not_sizes() {
    let model = build_model(ModelKind::Platform, &default_parameters(ModelKind::Platform)).unwrap();
    let packed = build_scene_meshes(&model, 1.0, None);
    let exploded = build_scene_meshes(&model, 2.0, None);

    for (board, (a, b)) in model.boards.iter().zip(packed.boards.iter().zip(&exploded.boards)) {
        let va = MeshValidator::new(a);
        let vb = MeshValidator::new(b);
        let (da, db) = (va.dimensions(), vb.dimensions());
        for axis in 0..3 {
            assert!((da[axis] - db[axis]).abs() < 1e-4, "{}", board.name);
        }

        let ca = va.aabb().center();
        let cb = vb.aabb().center();
        assert!((cb - ca * 2.0).length() < 1e-3, "{}: {ca} vs {cb}", board.name);
    }
}

#[test]
fn test_bounds_match_board_centers() {
    let model = build_model(ModelKind::SlottedBar, &default_parameters(ModelKind::SlottedBar)).unwrap();
    let meshes = build_scene_meshes(&model, 1.5, None);

    for (bounds, mesh) in meshes.bounds.iter().zip(&meshes.boards) {
        let from_mesh = MeshValidator::new(mesh).aabb().center();
        assert!((bounds.center() - from_mesh).length() < 1e-4);
    }
}
