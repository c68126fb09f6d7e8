//! Visual-only feedback: camera shake and ship banking.
//!
//! Nothing here feeds back into the simulation.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Decaying camera shake driven by hit/fire requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraShake {
    /// 0..1
    pub intensity: f32,
    pub max_pitch: f32,
    pub max_yaw: f32,
    pub max_roll: f32,
}

impl Default for CameraShake {
    fn default() -> Self {
        Self {
            intensity: 0.0,
            max_pitch: 0.05,
            max_yaw: 0.05,
            max_roll: 0.05,
        }
    }
}

impl CameraShake {
    /// Raise intensity to at least `amount` (clamped to 1)
    pub fn request(&mut self, amount: f32) {
        if amount.is_finite() && amount > self.intensity {
            self.intensity = amount.min(1.0);
        }
    }

    /// Per-tick decay
    pub fn decay(&mut self) {
        self.intensity *= 0.9;
        if self.intensity < 0.01 {
            self.intensity = 0.0;
        }
    }

    pub fn reset(&mut self) {
        self.intensity = 0.0;
    }

    /// Camera (pitch, yaw, roll) offsets at `time`; quadratic in intensity
    pub fn offsets(&self, time: f32) -> Vec3 {
        let k = self.intensity * self.intensity;
        Vec3::new(
            self.max_pitch * k * (time * 31.0).sin(),
            self.max_yaw * k * (time * 23.0 + 1.3).sin(),
            self.max_roll * k * (time * 17.0 + 2.1).sin(),
        )
    }
}

/// Smoothed ship banking toward the pointer
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ShipPose {
    pub roll: f32,
    pub pitch: f32,
}

impl ShipPose {
    pub fn update(&mut self, pos: Vec3, target: Vec3) {
        self.roll = crate::approach(self.roll, (pos.x - target.x) * 0.8, 0.1);
        self.pitch = crate::approach(self.pitch, (target.y - pos.y) * 0.4, 0.1);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.pitch, 0.0, self.roll)
    }
}
