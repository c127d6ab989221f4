use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use crate::config::CameraSettings;
use crate::ray::Ray;

/// Look orientation plus projection. The eye position belongs to the
/// player; every method that needs it takes it explicitly.
///
/// Yaw 0 looks down -Z, positive pitch looks up.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(settings: &CameraSettings, aspect: f32) -> Self {
        let mut camera = Self {
            yaw: 0.0,
            pitch: 0.0,
            fov_y: settings.fov_y_degrees.to_radians(),
            aspect,
            z_near: settings.near,
            z_far: settings.far,
        };
        camera.look_at(settings.start_position, settings.look_at);
        camera
    }

    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        let Some(dir) = (target - eye).try_normalize() else {
            return;
        };
        self.pitch = dir.y.clamp(-1.0, 1.0).asin();
        self.yaw = (-dir.x).atan2(-dir.z);
    }

    pub fn add_look(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    #[cfg(test)]
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Walking direction: forward flattened onto the ground plane.
    pub fn forward_flat(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    pub fn view(&self, eye: Vec3) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), eye).inverse()
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }

    pub fn view_proj(&self, eye: Vec3) -> Mat4 {
        self.projection() * self.view(eye)
    }

    /// Ray from the eye through a point in normalized device coordinates.
    pub fn ray_through(&self, eye: Vec3, ndc: Vec2) -> Option<Ray> {
        let tan_half = (self.fov_y * 0.5).tan();
        let local = Vec3::new(ndc.x * tan_half * self.aspect, ndc.y * tan_half, -1.0);
        Ray::new(eye, self.rotation() * local)
    }
}
