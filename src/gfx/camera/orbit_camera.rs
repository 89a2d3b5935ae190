use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Y-up arc-rotate camera orbiting `target`.
///
/// `alpha` is the longitudinal angle around the Y axis, `beta` the angle
/// down from the +Y pole and `radius` the distance to the target.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
    home: (f32, f32, f32, Vector3<f32>),
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(alpha: f32, beta: f32, radius: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            alpha,
            beta,
            radius,
            eye: Vector3::zero(), // Will be auto-calculated in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: cgmath::Rad(0.8),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
            home: (alpha, beta, radius, target),
        };
        camera.set_beta(beta);
        camera.set_radius(radius);
        camera.home = (camera.alpha, camera.beta, camera.radius, target);
        camera
    }

    /// Returns to the placement the camera was created with.
    pub fn reset_to_default(&mut self) {
        let (alpha, beta, radius, target) = self.home;
        self.alpha = alpha;
        self.beta = beta;
        self.radius = radius;
        self.target = target;
        self.update();
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.clamp(
            self.bounds.min_radius.unwrap_or(f32::EPSILON),
            self.bounds.max_radius.unwrap_or(f32::MAX),
        );
        self.update();
    }

    /// Zooms proportionally to the current distance.
    pub fn add_radius(&mut self, delta: f32) {
        self.set_radius(self.radius + self.radius * delta);
    }

    pub fn set_beta(&mut self, beta: f32) {
        self.beta = beta.clamp(self.bounds.min_beta, self.bounds.max_beta);
        self.update();
    }

    pub fn add_beta(&mut self, delta: f32) {
        self.set_beta(self.beta + delta);
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
        self.update();
    }

    pub fn add_alpha(&mut self, delta: f32) {
        self.set_alpha(self.alpha + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.radius * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.target += movement;
        self.update();
    }

    /// Updates the camera after changing `radius`, `alpha`, `beta` or `target`.
    fn update(&mut self) {
        self.eye = calculate_cartesian_eye_position(self.alpha, self.beta, self.radius, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_radius: Option<f32>,
    pub max_radius: Option<f32>,
    pub min_beta: f32,
    pub max_beta: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_radius: Some(0.5),
            max_radius: Some(100.0),
            min_beta: 0.01,
            max_beta: std::f32::consts::PI - 0.01,
        }
    }
}

fn calculate_cartesian_eye_position(
    alpha: f32,
    beta: f32,
    radius: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        radius * alpha.cos() * beta.sin(),
        radius * beta.cos(),
        radius * alpha.sin() * beta.sin(),
    ) + target
}
