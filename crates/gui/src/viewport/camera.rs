use glam::{Mat4, Vec3, Vec4};

use super::picking::Ray;

/// Initial eye position in metres
pub const DEFAULT_EYE: [f32; 3] = [1.0, 1.6, 2.0];

/// Arc-ball (orbit) camera for the 3D viewport
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self::looking_from(Vec3::from(DEFAULT_EYE), Vec3::ZERO)
    }

    /// Orbit camera placed at `eye` and looking at `target`
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(0.5);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-1.5, 1.5),
            distance,
            target,
            fov: 50.0_f32.to_radians(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 100.0);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right_vector();
        let up = self.up_vector();
        self.target += right * dx + up * dy;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.05, 200.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a 3D point to 2D screen coords (for overlay text)
    pub fn project(&self, point: [f32; 3], rect: egui::Rect) -> Option<egui::Pos2> {
        let aspect = rect.width() / rect.height();
        let vp = self.view_projection(aspect);
        let p = vp * Vec4::new(point[0], point[1], point[2], 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some(egui::pos2(screen_x, screen_y))
    }

    /// Screen-space size in pixels of a world length seen at `point`
    pub fn world_to_pixels(&self, length: f32, point: Vec3, rect: egui::Rect) -> f32 {
        let depth = (point - self.eye_position()).length().max(1e-3);
        let pixels_per_unit = rect.height() / (2.0 * depth * (self.fov * 0.5).tan());
        length * pixels_per_unit
    }

    /// Cast a ray from a screen position into the 3D scene
    pub fn screen_ray(&self, screen_pos: egui::Pos2, rect: egui::Rect) -> Ray {
        let aspect = rect.width() / rect.height();

        // Screen → NDC
        let ndc_x = (screen_pos.x - rect.center().x) / (rect.width() * 0.5);
        let ndc_y = -(screen_pos.y - rect.center().y) / (rect.height() * 0.5);

        let vp_inv = self.view_projection(aspect).inverse();

        let near_world = vp_inv * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.eye_position(),
            direction: (far - near).normalize_or_zero(),
        }
    }
}
