use glam::{Mat3, Mat4, Vec3};

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 9
    }

    /// Transform positions by `world` and normals by its normal matrix
    pub fn transformed(&self, world: &Mat4) -> MeshData {
        let normal_matrix = Mat3::from_mat4(*world).inverse().transpose();
        let mut vertices = Vec::with_capacity(self.vertices.len());

        for v in self.vertices.chunks_exact(9) {
            let p = world.transform_point3(Vec3::new(v[0], v[1], v[2]));
            let n = (normal_matrix * Vec3::new(v[3], v[4], v[5])).normalize_or_zero();
            vertices.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z, v[6], v[7], v[8]]);
        }

        MeshData {
            vertices,
            indices: self.indices.clone(),
        }
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Clone, Debug, Default)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 14
    }
}

/// Convert an sRGB byte triple to linear-ish float color
pub fn rgb(c: [u8; 3]) -> [f32; 3] {
    [c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0]
}

// ── Primitive generation ─────────────────────────────────────

pub fn cube(w: f32, h: f32, d: f32, color: [f32; 3]) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [([Vec3; 4], Vec3); 6] = [
        // Front (+Z)
        ([Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)], Vec3::Z),
        // Back (-Z)
        ([Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)], Vec3::NEG_Z),
        // Right (+X)
        ([Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)], Vec3::X),
        // Left (-X)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)], Vec3::NEG_X),
        // Top (+Y)
        ([Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)], Vec3::Y),
        // Bottom (-Y)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)], Vec3::NEG_Y),
    ];

    let mut vertices = Vec::with_capacity(24 * 9);
    let mut indices = Vec::with_capacity(36);

    for (quad, normal) in &faces {
        let base = (vertices.len() / 9) as u32;
        for v in quad {
            push_vert(&mut vertices, v.x, v.y, v.z, *normal, color);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

/// Flat disc in the XZ plane facing +Y
pub fn disc(radius: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let mut vertices = Vec::with_capacity((segments as usize + 1) * 9);
    let mut indices = Vec::with_capacity(segments as usize * 3);

    push_vert(&mut vertices, 0.0, 0.0, 0.0, Vec3::Y, color);
    for i in 0..segments {
        let angle = (i as f32) * std::f32::consts::TAU / segments as f32;
        push_vert(&mut vertices, radius * angle.cos(), 0.0, radius * angle.sin(), Vec3::Y, color);
    }

    // Counter-clockwise seen from above
    for i in 0..segments {
        let next = (i + 1) % segments;
        indices.extend_from_slice(&[0, 1 + next, 1 + i]);
    }

    MeshData { vertices, indices }
}

/// Corners of the unit box, same order as the edge table below
const UNIT_CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
];

const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0), // back face
    (4, 5), (5, 6), (6, 7), (7, 4), // front face
    (0, 4), (1, 5), (2, 6), (3, 7), // connecting
];

/// World-space corners of a unit box under `world`
pub fn box_corners(world: &Mat4) -> [Vec3; 8] {
    UNIT_CORNERS.map(|c| world.transform_point3(Vec3::from(c)))
}

/// Append the 12 edges of a transformed unit box
pub fn push_box_edges(lines: &mut LineMeshData, world: &Mat4, color: [f32; 4]) {
    let corners = box_corners(world);
    for (a, b) in BOX_EDGES {
        push_line_vert(&mut lines.vertices, corners[a], color);
        push_line_vert(&mut lines.vertices, corners[b], color);
    }
}

// ── Helpers ──────────────────────────────────────────────────

fn push_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[px, py, pz, n.x, n.y, n.z, c[0], c[1], c[2]]);
}

fn push_line_vert(v: &mut Vec<f32>, p: Vec3, c: [f32; 4]) {
    v.extend_from_slice(&[p.x, p.y, p.z, c[0], c[1], c[2], c[3]]);
}
