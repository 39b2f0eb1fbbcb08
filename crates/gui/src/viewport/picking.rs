use glam::Vec3;

use super::mesh::MeshData;
use crate::build::BoardBounds;

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The unit box every board is scaled from
    pub const UNIT: Aabb = Aabb {
        min: Vec3::splat(-0.5),
        max: Vec3::splat(0.5),
    };

    /// Compute AABB from MeshData (9 floats per vertex: pos+normal+color)
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for v in data.vertices.chunks_exact(9) {
            let p = Vec3::new(v[0], v[1], v[2]);
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Ray against a rotated board.
///
/// The ray is moved into the board's local space, where the board is the
/// unit box. The direction is not renormalised there, so the hit parameter
/// is the world-space distance along the original ray.
pub fn ray_board(ray: &Ray, bounds: &BoardBounds) -> Option<f32> {
    let local = Ray {
        origin: bounds.inverse.transform_point3(ray.origin),
        direction: bounds.inverse.transform_vector3(ray.direction),
    };
    ray_aabb(&local, &Aabb::UNIT)
}

/// Index and distance of the front-most board hit by the ray
pub fn pick_board(ray: &Ray, bounds: &[BoardBounds]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for b in bounds {
        if let Some(dist) = ray_board(ray, b) {
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((b.index, dist));
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Quat};

    fn bounds(index: usize, world: Mat4) -> BoardBounds {
        BoardBounds {
            index,
            world,
            inverse: world.inverse(),
        }
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(ray_aabb(&ray, &Aabb::UNIT), Some(4.5));

        let miss = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(ray_aabb(&miss, &Aabb::UNIT), None);
    }

    #[test]
    fn test_ray_from_inside_returns_exit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray_aabb(&ray, &Aabb::UNIT), Some(0.5));
    }

    #[test]
    fn test_ray_board_respects_rotation() {
        // Long thin board along X, rotated 90° about Y so it runs along Z
        let world = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2)
            * Mat4::from_scale(Vec3::new(4.0, 0.2, 0.2));
        let b = bounds(0, world);

        // Along the old X axis there is nothing any more
        let side = Ray::new(Vec3::new(1.5, 0.0, 5.0), Vec3::NEG_Z);
        assert!(ray_board(&side, &b).is_none());

        // A ray down Z now travels the full length
        let along = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = ray_board(&along, &b).unwrap();
        assert!((t - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_board_distance_is_world_space() {
        let world = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 0.5, 0.1),
            Quat::IDENTITY,
            Vec3::new(0.0, 1.0, 0.0),
        );
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        let t = ray_board(&ray, &bounds(0, world)).unwrap();
        assert!((t - 3.75).abs() < 1e-4);
    }

    #[test]
    fn test_pick_board_prefers_nearest() {
        let far = bounds(0, Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)));
        let near = bounds(1, Mat4::from_translation(Vec3::new(0.0, 0.0, 1.0)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let (index, dist) = pick_board(&ray, &[far, near]).unwrap();
        assert_eq!(index, 1);
        assert!((dist - 3.5).abs() < 1e-4);
    }

    #[test]
    fn test_pick_board_nothing_hit() {
        let b = bounds(0, Mat4::IDENTITY);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(pick_board(&ray, &[b]).is_none());
    }
}
