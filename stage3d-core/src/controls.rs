//! Orbit controls: rotate and dolly the camera around its target

use crate::projection::Camera;
use std::f32::consts::FRAC_PI_2;

/// Keeps the camera from flipping over the poles
const POLE_MARGIN: f32 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    delta_yaw: f32,
    delta_pitch: f32,
    scale: f32,
}

impl OrbitControls {
    pub fn new(min_distance: f32, max_distance: f32) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance,
            max_distance,
            delta_yaw: 0.0,
            delta_pitch: 0.0,
            scale: 1.0,
        }
    }

    /// Queue a rotation in radians; positive yaw swings right, positive pitch up
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        self.delta_yaw += yaw * self.rotate_speed;
        self.delta_pitch += pitch * self.rotate_speed;
    }

    /// Queue a dolly step; positive moves toward the target
    pub fn dolly(&mut self, amount: f32) {
        let factor = 1.0 + amount.abs() * self.zoom_speed;
        if amount > 0.0 {
            self.scale /= factor;
        } else {
            self.scale *= factor;
        }
    }

    /// Apply queued input to the camera and clear it
    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            self.reset();
            return;
        }

        let mut yaw = offset.x.atan2(offset.z);
        let mut pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        yaw += self.delta_yaw;
        pitch = (pitch + self.delta_pitch).clamp(-FRAC_PI_2 + POLE_MARGIN, FRAC_PI_2 - POLE_MARGIN);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.reset();

        camera.position = camera.target
            + nalgebra::Vector3::new(
                radius * pitch.cos() * yaw.sin(),
                radius * pitch.sin(),
                radius * pitch.cos() * yaw.cos(),
            );
    }

    pub fn reset(&mut self) {
        self.delta_yaw = 0.0;
        self.delta_pitch = 0.0;
        self.scale = 1.0;
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(1.0, 60.0)
    }
}
