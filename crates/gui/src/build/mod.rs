//! Scene mesh building: boards -> lit boxes, edge lines and the ground disc.
//!
//! Board dimensions are in inches. Everything produced here is in metres.

mod cache;

pub use cache::SceneCache;

use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::{inches_to_meters, Board, Model, EDGE_COLOR, FEET, GROUND_COLOR, HOVER_COLOR};

use crate::viewport::mesh::{self, rgb, LineMeshData, MeshData};

/// Ground disc radius in inches (20 ft)
pub const GROUND_RADIUS: f64 = 20.0 * FEET;
pub const GROUND_SEGMENTS: u32 = 128;

/// Oriented bounds of one board, used for picking
#[derive(Clone, Copy, Debug)]
pub struct BoardBounds {
    /// Index into `Model::boards`
    pub index: usize,
    /// Unit box -> world
    pub world: Mat4,
    /// World -> unit box
    pub inverse: Mat4,
}

impl BoardBounds {
    pub fn center(&self) -> Vec3 {
        self.world.transform_point3(Vec3::ZERO)
    }
}

/// Everything the renderer needs for one frame
#[derive(Clone, Debug, Default)]
pub struct SceneMeshes {
    /// One lit mesh per board, same order as `Model::boards`
    pub boards: Vec<MeshData>,
    /// 12 edges per board
    pub edges: LineMeshData,
    pub ground: MeshData,
    pub bounds: Vec<BoardBounds>,
}

/// Unit box -> world transform for a board at the given explode factor
pub fn board_world_matrix(board: &Board, explode: f32) -> Mat4 {
    let [x, y, z] = board.exploded_position(explode as f64);
    let translation = Vec3::new(
        inches_to_meters(x) as f32,
        inches_to_meters(y) as f32,
        inches_to_meters(z) as f32,
    );
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        board.rotation[0] as f32,
        board.rotation[1] as f32,
        board.rotation[2] as f32,
    );
    let scale = Vec3::new(
        inches_to_meters(board.length) as f32,
        inches_to_meters(board.width) as f32,
        inches_to_meters(board.thickness) as f32,
    );
    Mat4::from_scale_rotation_translation(scale, rotation, translation)
}

/// Build meshes for a model
pub fn build_scene_meshes(model: &Model, explode: f32, hovered: Option<usize>) -> SceneMeshes {
    let unit = mesh::cube(1.0, 1.0, 1.0, [1.0; 3]);
    let edge_color = {
        let [r, g, b] = rgb(EDGE_COLOR);
        [r, g, b, 1.0]
    };

    let mut boards = Vec::with_capacity(model.boards.len());
    let mut bounds = Vec::with_capacity(model.boards.len());
    let mut edges = LineMeshData::default();

    for (index, board) in model.boards.iter().enumerate() {
        let world = board_world_matrix(board, explode);
        let color = if hovered == Some(index) {
            rgb(HOVER_COLOR)
        } else {
            rgb(board.color)
        };

        let mut data = unit.transformed(&world);
        recolor(&mut data, color);
        boards.push(data);

        mesh::push_box_edges(&mut edges, &world, edge_color);
        bounds.push(BoardBounds {
            index,
            world,
            inverse: world.inverse(),
        });
    }

    let ground = mesh::disc(
        inches_to_meters(GROUND_RADIUS) as f32,
        GROUND_SEGMENTS,
        rgb(GROUND_COLOR),
    );

    SceneMeshes {
        boards,
        edges,
        ground,
        bounds,
    }
}

fn recolor(data: &mut MeshData, color: [f32; 3]) {
    for v in data.vertices.chunks_exact_mut(9) {
        v[6..9].copy_from_slice(&color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{build_model, default_parameters, ModelKind, Stock, NINETY_DEGREES};

    fn platform() -> Model {
        build_model(ModelKind::Platform, &default_parameters(ModelKind::Platform)).unwrap()
    }

    fn single(board: Board) -> Model {
        Model {
            kind: ModelKind::Platform,
            boards: vec![board],
        }
    }

    #[test]
    fn test_one_mesh_per_board() {
        let model = platform();
        let scene = build_scene_meshes(&model, 1.0, None);
        assert_eq!(scene.boards.len(), model.boards.len());
        assert_eq!(scene.bounds.len(), model.boards.len());
        assert_eq!(scene.edges.segment_count(), 12 * model.boards.len());
        assert_eq!(scene.ground.vertex_count(), GROUND_SEGMENTS as usize + 1);
    }

    #[test]
    fn test_board_scaled_to_metres() {
        let model = single(Board::new("b", Stock::TwoBySix, 96.0));
        let scene = build_scene_meshes(&model, 1.0, None);
        let aabb = crate::viewport::picking::Aabb::from_mesh(&scene.boards[0]);
        let size = aabb.size();
        assert!((size.x - 96.0 * 0.0254).abs() < 1e-4);
        assert!((size.y - 5.5 * 0.0254).abs() < 1e-4);
        assert!((size.z - 1.5 * 0.0254).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_swaps_axes() {
        // Rotated 90° about Z: length now runs along Y
        let model = single(Board::new("leg", Stock::TwoByFour, 32.0).rotated(0.0, 0.0, NINETY_DEGREES));
        let scene = build_scene_meshes(&model, 1.0, None);
        let size = crate::viewport::picking::Aabb::from_mesh(&scene.boards[0]).size();
        assert!((size.y - 32.0 * 0.0254).abs() < 1e-4);
        assert!((size.x - 3.5 * 0.0254).abs() < 1e-4);
    }

    #[test]
    fn test_explode_moves_centres_only() {
        let model = single(Board::new("b", Stock::TwoByFour, 10.0).at(10.0, 20.0, -5.0));
        let a = build_scene_meshes(&model, 1.0, None);
        let b = build_scene_meshes(&model, 2.0, None);

        let ca = a.bounds[0].center();
        let cb = b.bounds[0].center();
        assert!((cb - ca * 2.0).length() < 1e-5);

        let sa = crate::viewport::picking::Aabb::from_mesh(&a.boards[0]).size();
        let sb = crate::viewport::picking::Aabb::from_mesh(&b.boards[0]).size();
        assert!((sa - sb).length() < 1e-6);
    }

    #[test]
    fn test_hovered_board_uses_hover_color() {
        let model = platform();
        let scene = build_scene_meshes(&model, 1.0, Some(3));
        let hover = rgb(HOVER_COLOR);
        let normal = rgb(shared::BOARD_COLOR);
        assert_eq!(&scene.boards[3].vertices[6..9], &hover);
        assert_eq!(&scene.boards[2].vertices[6..9], &normal);
    }

    #[test]
    fn test_ground_radius() {
        let scene = build_scene_meshes(&platform(), 1.0, None);
        let aabb = crate::viewport::picking::Aabb::from_mesh(&scene.ground);
        assert!((aabb.max.x - 240.0 * 0.0254).abs() < 1e-3);
        assert_eq!(aabb.max.y, 0.0);
    }
}
