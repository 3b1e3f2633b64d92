use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Perspective camera orbiting a target point, y-up
///
/// The pose is parameterized by distance/pitch/yaw around `target`; `eye` is
/// recomputed whenever one of those changes.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
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
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Recalculated in `update()`
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Deg(75.0).into(),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera
    }

    /// Constructs a camera from a cartesian eye position, recovering the
    /// spherical pose
    pub fn looking_at(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude();
        let pitch = if distance > f32::EPSILON {
            (offset.y / distance).asin()
        } else {
            0.0
        };
        let yaw = offset.x.atan2(offset.z);
        Self::new(distance, pitch, yaw, target, aspect)
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.0 + f32::EPSILON)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    ///
    /// `delta.0` is horizontal pan, `delta.1` vertical, both in view space.
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale by distance for a consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;

        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        // Move both eye and target to preserve the view direction
        self.eye += movement;
        self.target += movement;
    }

    /// Updates the eye after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: Some(120.0),
            min_pitch: -std::f32::consts::PI / 2.0 + f32::EPSILON,
            max_pitch: std::f32::consts::PI / 2.0 - f32::EPSILON,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn looking_at_recovers_pose() {
        let camera = OrbitCamera::looking_at(
            Vector3::new(0.0, 15.0, 30.0),
            Vector3::new(0.0, 0.0, 0.0),
            1.5,
        );
        assert_vec_close(camera.eye, Vector3::new(0.0, 15.0, 30.0));
        assert!((camera.distance - 33.541).abs() < 1e-3);
    }

    #[test]
    fn looking_at_off_axis_eye() {
        let eye = Vector3::new(12.0, 7.0, -4.0);
        let camera = OrbitCamera::looking_at(eye, Vector3::new(1.0, 2.0, 3.0), 1.0);
        assert_vec_close(camera.eye, eye);
    }

    #[test]
    fn pitch_is_clamped_to_bounds() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.set_pitch(10.0);
        assert!(camera.pitch <= camera.bounds.max_pitch);
        camera.set_pitch(-10.0);
        assert!(camera.pitch >= camera.bounds.min_pitch);
    }

    #[test]
    fn distance_is_clamped_to_bounds() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.bounds.min_distance = Some(2.0);
        camera.bounds.max_distance = Some(50.0);
        camera.set_distance(0.5);
        assert!((camera.distance - 2.0).abs() < 1e-6);
        camera.set_distance(500.0);
        assert!((camera.distance - 50.0).abs() < 1e-6);
    }

    #[test]
    fn pan_preserves_view_direction() {
        let mut camera = OrbitCamera::new(10.0, 0.3, 0.7, Vector3::zero(), 1.0);
        let before = (camera.target - camera.eye).normalize();
        camera.pan((0.5, -0.25));
        let after = (camera.target - camera.eye).normalize();
        assert_vec_close(before, after);
    }
}
