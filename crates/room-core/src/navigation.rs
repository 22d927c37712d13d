//! First-person camera driven by WASD/QE while pointer capture is active

use glam::{Mat4, Vec3};

use crate::input::{Key, KeySet};

/// Pitch is kept just short of straight up/down
const MAX_PITCH: f32 = 89.0_f32 * std::f32::consts::PI / 180.0;

/// Camera position and orientation. Yaw 0 looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    /// Rotation about +Y in radians
    pub yaw: f32,
    /// Elevation in radians
    pub pitch: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(5.0, 5.0, 15.0), Vec3::new(0.0, 5.0, 0.0))
    }
}

impl FirstPersonCamera {
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let dir = (target - position).try_normalize().unwrap_or(Vec3::NEG_Z);
        Self {
            position,
            yaw: (-dir.x).atan2(-dir.z),
            pitch: dir.y.clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH),
        }
    }

    /// Viewing direction
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            -self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
    }

    /// Viewing direction flattened onto the floor plane
    pub fn ground_forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.ground_forward() * distance;
    }

    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    /// Apply pointer movement
    pub fn look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// One navigation step from the pressed keys
    pub fn step(&mut self, keys: &KeySet, speed: f32) {
        if keys.is_pressed(Key::W) {
            self.move_forward(speed);
        }
        if keys.is_pressed(Key::S) {
            self.move_forward(-speed);
        }
        if keys.is_pressed(Key::A) {
            self.move_right(-speed);
        }
        if keys.is_pressed(Key::D) {
            self.move_right(speed);
        }
        if keys.is_pressed(Key::Q) {
            self.position.y += speed;
        }
        if keys.is_pressed(Key::E) {
            self.position.y -= speed;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }
}
