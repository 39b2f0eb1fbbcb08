//! Mesh validation utilities.
//!
//! `MeshValidator` checks mesh data integrity: stride, in-range indices,
//! normalized normals, and bounding box size against a board's dimensions.

use glam::{EulerRot, Quat, Vec3};
use shared::{inches_to_meters, Board};

use crate::viewport::mesh::{rgb, MeshData};
use crate::viewport::picking::Aabb;

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len() / 9
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.indices.len() / 3
    }

    pub fn is_stride_valid(&self) -> bool {
        self.mesh.vertices.len() % 9 == 0
    }

    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    /// All vertex normals have unit length (within epsilon)
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        self.mesh
            .vertices
            .chunks_exact(9)
            .all(|v| (Vec3::new(v[3], v[4], v[5]).length() - 1.0).abs() <= epsilon)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_mesh(self.mesh)
    }

    /// Bounding box size (x, y, z)
    pub fn dimensions(&self) -> [f32; 3] {
        self.aabb().size().to_array()
    }

    pub fn dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        dims.iter()
            .zip(expected.iter())
            .all(|(a, b)| (a - b).abs() < tolerance)
    }

    /// Every vertex carries the given color
    pub fn has_uniform_color(&self, color: [u8; 3]) -> bool {
        let c = rgb(color);
        self.vertex_count() > 0
            && self
                .mesh
                .vertices
                .chunks_exact(9)
                .all(|v| (v[6] - c[0]).abs() < 1e-3 && (v[7] - c[1]).abs() < 1e-3 && (v[8] - c[2]).abs() < 1e-3)
    }

    /// Run all structural checks. An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_stride_valid() {
            errors.push(format!(
                "Vertex buffer length {} is not a multiple of 9",
                self.mesh.vertices.len()
            ));
        }

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range = self.mesh.indices.iter().filter(|&&i| i >= max_idx).count();
            errors.push(format!(
                "{} indices out of range (vertex count {})",
                out_of_range, max_idx
            ));
        }

        if !self.are_normals_normalized(1e-3) {
            errors.push("Some normals are not unit length".to_string());
        }

        if self.vertex_count() == 0 {
            errors.push("Mesh has no vertices".to_string());
        }

        errors
    }

    /// Structural checks plus the expected world-space size of `board`
    /// (ignores position, so any explode factor is fine).
    pub fn validate_board(&self, board: &Board) -> Vec<String> {
        let mut errors = self.validate_all();
        let expected = expected_extent(board);
        let dims = self.dimensions();
        if !self.dimensions_approx(expected, 1e-3) {
            errors.push(format!(
                "Board '{}' size {:?} m, expected {:?} m",
                board.name, dims, expected
            ));
        }
        errors
    }
}

/// World-space AABB size of a board in metres
pub fn expected_extent(board: &Board) -> [f32; 3] {
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        board.rotation[0] as f32,
        board.rotation[1] as f32,
        board.rotation[2] as f32,
    );
    let half = Vec3::new(
        inches_to_meters(board.length) as f32,
        inches_to_meters(board.width) as f32,
        inches_to_meters(board.thickness) as f32,
    ) * 0.5;

    // Extent of a rotated box: sum of |axis| * half-size per axis
    let x = (rotation * Vec3::X).abs() * half.x;
    let y = (rotation * Vec3::Y).abs() * half.y;
    let z = (rotation * Vec3::Z).abs() * half.z;
    ((x + y + z) * 2.0).to_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh::cube;
    use shared::{Stock, NINETY_DEGREES};

    #[test]
    fn test_valid_cube() {
        let mesh = cube(1.0, 2.0, 3.0, [0.5, 0.5, 0.5]);
        let v = MeshValidator::new(&mesh);
        assert!(v.validate_all().is_empty());
        assert_eq!(v.triangle_count(), 12);
        assert!(v.dimensions_approx([1.0, 2.0, 3.0], 1e-5));
    }

    #[test]
    fn test_bad_index_reported() {
        let mut mesh = cube(1.0, 1.0, 1.0, [0.5; 3]);
        mesh.indices.push(999);
        let errors = MeshValidator::new(&mesh).validate_all();
        assert!(errors.iter().any(|e| e.contains("out of range")));
        assert!(errors.iter().any(|e| e.contains("multiple of 3")));
    }

    #[test]
    fn test_expected_extent_rotated() {
        let board = Board::new("leg", Stock::TwoByFour, 32.0).rotated(0.0, 0.0, NINETY_DEGREES);
        let e = expected_extent(&board);
        assert!((e[0] - 3.5 * 0.0254).abs() < 1e-5);
        assert!((e[1] - 32.0 * 0.0254).abs() < 1e-5);
        assert!((e[2] - 1.5 * 0.0254).abs() < 1e-5);
    }

    #[test]
    fn test_uniform_color() {
        let mesh = cube(1.0, 1.0, 1.0, rgb(shared::BOARD_COLOR));
        assert!(MeshValidator::new(&mesh).has_uniform_color(shared::BOARD_COLOR));
        assert!(!MeshValidator::new(&mesh).has_uniform_color(shared::HOVER_COLOR));
    }
}
