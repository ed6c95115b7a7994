//! Orbit camera, damped controller and pointer-to-ray projection.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Camera orbiting a fixed target at a fixed distance.
///
/// Yaw and pitch are spherical angles around the target; the default pose
/// puts the camera 4 units out on +Z looking at the origin.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Point3<f32>,
    pub distance: f32,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl OrbitCamera {
    pub fn new(target: Point3<f32>, distance: f32) -> Self {
        Self {
            target,
            distance,
            yaw: Rad(std::f32::consts::FRAC_PI_2),
            pitch: Rad(0.0),
        }
    }

    pub fn position(&self) -> Point3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        self.target
            + Vector3::new(
                cos_pitch * cos_yaw,
                sin_pitch,
                cos_pitch * sin_yaw,
            ) * self.distance
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position(), self.target, Vector3::unit_y())
    }

    /// Project a pointer position in normalized device coordinates
    /// (`x`, `y` in [-1, 1], y up) through the camera into a world ray.
    ///
    /// Built from the camera basis directly, so no matrix inversion is
    /// involved.
    pub fn cast_ray(&self, ndc_x: f32, ndc_y: f32, projection: &Projection) -> Ray {
        let origin = self.position();
        let forward = (self.target - origin).normalize();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward);

        let half_height = (projection.fovy.0 / 2.0).tan();
        let half_width = half_height * projection.aspect;
        let direction =
            (forward + right * (ndc_x * half_width) + up * (ndc_y * half_height)).normalize();
        Ray { origin, direction }
    }
}

/// Perspective projection state; aspect follows the surface size.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy: Rad<f32>, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy,
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// View-projection uniform uploaded once per frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::from_scale(1.0).into(),
            view_position: [0.0; 4],
        }
    }

    pub fn update_view_proj(&mut self, camera: &OrbitCamera, projection: &Projection) {
        let position = camera.position();
        self.view_position = [position.x, position.y, position.z, 1.0];
        self.view_proj = (projection.matrix() * camera.view_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Damped orbit control: pointer drags add angular velocity, velocity
/// decays exponentially each frame so the camera keeps gliding briefly
/// after the pointer stops.
#[derive(Debug)]
pub struct OrbitController {
    rotate_speed: f32,
    damping: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    pub dragging: bool,
}

impl OrbitController {
    pub fn new(rotate_speed: f32, damping: f32) -> Self {
        Self {
            rotate_speed,
            damping,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            dragging: false,
        }
    }

    /// Feed a pointer drag delta in physical pixels.
    pub fn handle_drag(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity += dx * self.rotate_speed;
        self.pitch_velocity += dy * self.rotate_speed;
    }

    pub fn update(&mut self, camera: &mut OrbitCamera, dt: f32) {
        camera.yaw += Rad(self.yaw_velocity * dt);
        camera.pitch += Rad(self.pitch_velocity * dt);
        // stop short of the poles so look_at keeps a usable up vector
        let limit = std::f32::consts::FRAC_PI_2 - 0.01;
        camera.pitch.0 = camera.pitch.0.clamp(-limit, limit);

        let decay = (-self.damping * dt).exp();
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
    }
}

/// A ray in world space.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Nearest non-negative intersection distance with a sphere, if any.
    pub fn intersect_sphere(&self, center: Point3<f32>, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let near = -b - sqrt_d;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + sqrt_d;
        (far >= 0.0).then_some(far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, EuclideanSpace};

    fn test_setup() -> (OrbitCamera, Projection) {
        let camera = OrbitCamera::new(Point3::origin(), 4.0);
        let projection = Projection::new(800, 600, Deg(75.0).into(), 0.1, 1000.0);
        (camera, projection)
    }

    #[test]
    fn default_pose_sits_on_positive_z() {
        let (camera, _) = test_setup();
        let position = camera.position();
        assert!((position.x).abs() < 1e-5);
        assert!((position.y).abs() < 1e-5);
        assert!((position.z - 4.0).abs() < 1e-5);
    }

    #[test]
    fn center_ray_hits_the_planet() {
        let (camera, projection) = test_setup();
        let ray = camera.cast_ray(0.0, 0.0, &projection);
        let t = ray.intersect_sphere(Point3::origin(), 1.0);
        // camera is 4 away, sphere radius 1: first hit at distance 3
        assert!((t.unwrap() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn corner_ray_misses_the_planet() {
        let (camera, projection) = test_setup();
        let ray = camera.cast_ray(1.0, 1.0, &projection);
        assert!(ray.intersect_sphere(Point3::origin(), 1.0).is_none());
    }

    #[test]
    fn ray_from_inside_reports_the_far_hit() {
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 0.0),
            direction: Vector3::unit_z(),
        };
        let t = ray.intersect_sphere(Point3::origin(), 1.0).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_behind_the_ray_is_not_hit() {
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 5.0),
            direction: Vector3::unit_z(),
        };
        assert!(ray.intersect_sphere(Point3::origin(), 1.0).is_none());
    }

    #[test]
    fn damping_bleeds_off_drag_velocity() {
        let (mut camera, _) = test_setup();
        let mut controller = OrbitController::new(0.005, 5.0);
        controller.handle_drag(100.0, 0.0);
        let yaw_before = camera.yaw;
        for _ in 0..240 {
            controller.update(&mut camera, 1.0 / 60.0);
        }
        let settled = camera.yaw;
        assert!(settled != yaw_before);
        // velocity has decayed to nothing: a further frame barely moves it
        controller.update(&mut camera, 1.0 / 60.0);
        assert!((camera.yaw.0 - settled.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let (mut camera, _) = test_setup();
        let mut controller = OrbitController::new(1.0, 0.0);
        controller.handle_drag(0.0, 10_000.0);
        controller.update(&mut camera, 1.0);
        assert!(camera.pitch.0 < std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn resize_updates_the_aspect_ratio() {
        let (_, mut projection) = test_setup();
        projection.resize(1000, 500);
        assert!((projection.aspect - 2.0).abs() < 1e-6);
    }
}
