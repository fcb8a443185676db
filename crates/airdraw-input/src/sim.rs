use crate::{Key, KeySet};
use airdraw_motion::WorldState;
use glam::Vec3;

/// Horizontal basis of the external camera, pushed by the presentation layer
/// so keyboard motion follows the view. World up stays fixed.
#[derive(Debug, Clone, Copy)]
pub struct ViewBasis {
    /// Unit forward vector, world frame.
    pub forward: Vec3,
    /// Unit right vector, world frame.
    pub right: Vec3,
}

impl Default for ViewBasis {
    fn default() -> Self {
        Self {
            forward: Vec3::NEG_Z,
            right: Vec3::X,
        }
    }
}

/// Speed constants for keyboard flight.
#[derive(Debug, Clone, Copy)]
pub struct KeyboardTuning {
    /// Base speed in m/s.
    pub speed_mps: f32,
    /// Speed multiplier without the boost modifier.
    pub normal_scale: f32,
    /// Speed multiplier while Shift is held.
    pub boost_scale: f32,
    /// Velocity blend factor toward the target, applied once per step.
    ///
    /// Known limitation: not time-scaled, so the smoothing is implicitly
    /// frame-rate-dependent.
    pub velocity_blend: f32,
}

impl Default for KeyboardTuning {
    fn default() -> Self {
        Self {
            speed_mps: 1.5,
            normal_scale: 1.5,
            boost_scale: 3.0,
            velocity_blend: 0.2,
        }
    }
}

/// Alternate position-update path driven by discrete key state instead of
/// sensors. Exact by construction: no gravity, no drift correction.
#[derive(Debug, Clone)]
pub struct KeyboardSimulator {
    tuning: KeyboardTuning,
}

impl KeyboardSimulator {
    pub fn new(tuning: KeyboardTuning) -> Self {
        Self { tuning }
    }

    /// Advance the world state by one frame from the pressed-key set.
    ///
    /// Builds a desired direction from the active movement keys, scales it
    /// to the target speed, smooths the velocity toward it, and integrates.
    pub fn step(&self, dt: f32, keys: &KeySet, view: &ViewBasis, state: &mut WorldState) {
        let mut dir = Vec3::ZERO;
        if keys.any_down(&[Key::W, Key::ArrowUp]) {
            dir += view.forward;
        }
        if keys.any_down(&[Key::S, Key::ArrowDown]) {
            dir -= view.forward;
        }
        if keys.any_down(&[Key::A, Key::ArrowLeft]) {
            dir -= view.right;
        }
        if keys.any_down(&[Key::D, Key::ArrowRight]) {
            dir += view.right;
        }
        if keys.is_down(Key::R) {
            dir += Vec3::Y;
        }
        if keys.is_down(Key::F) {
            dir -= Vec3::Y;
        }

        let scale = if keys.is_down(Key::Shift) {
            self.tuning.boost_scale
        } else {
            self.tuning.normal_scale
        };
        let speed = scale * self.tuning.speed_mps;

        let target = if dir.length_squared() > 0.0 {
            dir.normalize() * speed
        } else {
            Vec3::ZERO
        };

        state.velocity = state.velocity.lerp(target, self.tuning.velocity_blend);
        state.position += state.velocity * dt;
    }

    pub fn tuning(&self) -> &KeyboardTuning {
        &self.tuning
    }
}
