use crate::types::{RotationRate, WorldState};
use glam::{Quat, Vec3};
use tracing::warn;

/// World-frame gravity in m/s² (right-handed, Y up).
pub const GRAVITY_WORLD: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Tuning constants for the inertial dead-reckoning step. Empirically tuned;
/// the defaults are the values the system was calibrated with.
#[derive(Debug, Clone, Copy)]
pub struct IntegratorTuning {
    /// Whether raw samples include gravity. When false the gravity
    /// subtraction is skipped entirely (platform-dependent, see config).
    pub gravity_included: bool,
    /// Linear acceleration below this magnitude is treated as zero (m/s²).
    pub accel_deadband_mps2: f32,
    /// Acceleration ceiling for the at-rest judgement (m/s²).
    pub stable_accel_mps2: f32,
    /// Rotation-rate ceiling for the at-rest judgement (deg/s).
    pub stable_rot_dps: f32,
    /// How long the device must stay at rest before velocity is zeroed (ms).
    pub stable_time_ms: f64,
    /// Per-step exponential velocity decay standing in for unmodeled drag.
    pub velocity_damping: f32,
}

impl Default for IntegratorTuning {
    fn default() -> Self {
        Self {
            gravity_included: true,
            accel_deadband_mps2: 0.2,
            stable_accel_mps2: 0.12,
            stable_rot_dps: 5.0,
            stable_time_ms: 300.0,
            velocity_damping: 0.995,
        }
    }
}

/// Tracks how long the device has been judged at rest.
///
/// Set when both acceleration and rotation rate drop below their thresholds,
/// cleared the instant motion resumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StabilityWindow {
    stable_since_ms: Option<f64>,
}

impl StabilityWindow {
    /// Record stillness at `now_ms` and report whether it has lasted at
    /// least `hold_ms`.
    fn observe_still(&mut self, now_ms: f64, hold_ms: f64) -> bool {
        let since = *self.stable_since_ms.get_or_insert(now_ms);
        now_ms - since >= hold_ms
    }

    fn observe_motion(&mut self) {
        self.stable_since_ms = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.stable_since_ms.is_some()
    }
}

/// Dead-reckoning integrator: fuses the latest raw acceleration sample and
/// device orientation into the world-frame position/velocity estimate.
///
/// Drift suppression is a cheap stability heuristic (zero the velocity after
/// a sustained still window) plus per-step damping; there is no external
/// position reference.
#[derive(Debug, Clone)]
pub struct InertialIntegrator {
    tuning: IntegratorTuning,
    stability: StabilityWindow,
}

impl InertialIntegrator {
    pub fn new(tuning: IntegratorTuning) -> Self {
        Self {
            tuning,
            stability: StabilityWindow::default(),
        }
    }

    /// Advance the world state by one frame.
    ///
    /// `dt` must already be clamped by the frame clock. After this returns,
    /// `state.position` and `state.velocity` are finite: a sample that would
    /// produce a non-finite delta discards the whole step.
    pub fn step(
        &mut self,
        dt: f32,
        raw_accel: Vec3,
        rotation_rate: RotationRate,
        device_to_world: Quat,
        state: &mut WorldState,
        now_ms: f64,
    ) {
        // Rotate the device-frame sample into the world frame, then strip
        // gravity to recover linear acceleration.
        let mut accel = device_to_world * raw_accel;
        if self.tuning.gravity_included {
            accel -= GRAVITY_WORLD;
        }

        if !accel.is_finite() {
            warn!(?raw_accel, "Discarding step: non-finite acceleration");
            return;
        }

        // Deadband: sensor noise must not become perpetual slow drift.
        if accel.length() < self.tuning.accel_deadband_mps2 {
            accel = Vec3::ZERO;
        }

        // Zero-velocity reset once the device has been still long enough.
        let rot_mag = rotation_rate.max_dps();
        if accel.length() < self.tuning.stable_accel_mps2 && rot_mag < self.tuning.stable_rot_dps {
            if self
                .stability
                .observe_still(now_ms, self.tuning.stable_time_ms)
            {
                state.velocity = Vec3::ZERO;
            }
        } else {
            self.stability.observe_motion();
        }

        let velocity = (state.velocity + accel * dt) * self.tuning.velocity_damping;
        let position = state.position + velocity * dt;

        if !velocity.is_finite() || !position.is_finite() {
            warn!(?velocity, ?position, "Discarding step: non-finite integration result");
            return;
        }

        state.velocity = velocity;
        state.position = position;
    }

    pub fn tuning(&self) -> &IntegratorTuning {
        &self.tuning
    }
}
