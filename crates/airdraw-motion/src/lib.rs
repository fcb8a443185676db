//! Inertial dead-reckoning core.
//!
//! Converts asynchronously-arriving orientation and motion samples into a
//! world-frame position/velocity estimate. Sensor callbacks only write the
//! latest raw sample into [`SensorInputs`]; all integration happens inside
//! the per-frame step, which reads whatever the last write left behind
//! (last-value-wins, no queuing of missed samples).

pub mod clock;
pub mod integrator;
pub mod orientation;
pub mod types;

pub use clock::{FrameClock, MAX_FRAME_DT};
pub use integrator::{InertialIntegrator, IntegratorTuning, GRAVITY_WORLD};
pub use types::{
    AxisReading, MotionEvent, OrientationAngles, OrientationEvent, RateReading, RotationRate,
    WorldState,
};

use glam::{Quat, Vec3};
use types::sensor_field;

/// Latest raw sensor samples, written by event callbacks and read once per
/// simulation step.
///
/// The fused device-to-world rotation is recomputed on every orientation or
/// screen-rotation event, never on a timer: a stale rotation would misdirect
/// subsequent acceleration samples.
#[derive(Debug, Clone, Copy)]
pub struct SensorInputs {
    orientation: OrientationAngles,
    screen_rotation_deg: f32,
    device_to_world: Quat,
    accel_including_gravity: Vec3,
    rotation_rate: RotationRate,
}

impl SensorInputs {
    pub fn new() -> Self {
        let orientation = OrientationAngles::default();
        let screen_rotation_deg = 0.0;
        Self {
            orientation,
            screen_rotation_deg,
            device_to_world: orientation::device_to_world(&orientation, screen_rotation_deg),
            accel_including_gravity: Vec3::ZERO,
            rotation_rate: RotationRate::default(),
        }
    }

    /// Apply an orientation event. Missing fields default to 0 degrees.
    pub fn apply_orientation(&mut self, event: OrientationEvent) {
        self.orientation = OrientationAngles {
            alpha: sensor_field(event.alpha),
            beta: sensor_field(event.beta),
            gamma: sensor_field(event.gamma),
        };
        self.refresh_rotation();
    }

    /// Apply a screen-rotation event (degrees). Absent angle defaults to 0.
    pub fn apply_screen_rotation(&mut self, angle_deg: Option<f32>) {
        self.screen_rotation_deg = sensor_field(angle_deg);
        self.refresh_rotation();
    }

    /// Apply a motion event. An absent group keeps the previous cell value;
    /// rotation-rate signs are discarded.
    pub fn apply_motion(&mut self, event: MotionEvent) {
        if let Some(accel) = event.accel_including_gravity {
            self.accel_including_gravity = Vec3::new(
                sensor_field(accel.x),
                sensor_field(accel.y),
                sensor_field(accel.z),
            );
        }
        if let Some(rate) = event.rotation_rate {
            self.rotation_rate = RotationRate {
                alpha: sensor_field(rate.alpha).abs(),
                beta: sensor_field(rate.beta).abs(),
                gamma: sensor_field(rate.gamma).abs(),
            };
        }
    }

    fn refresh_rotation(&mut self) {
        self.device_to_world =
            orientation::device_to_world(&self.orientation, self.screen_rotation_deg);
    }

    pub fn device_to_world(&self) -> Quat {
        self.device_to_world
    }

    pub fn accel_including_gravity(&self) -> Vec3 {
        self.accel_including_gravity
    }

    pub fn rotation_rate(&self) -> RotationRate {
        self.rotation_rate
    }

    pub fn orientation(&self) -> OrientationAngles {
        self.orientation
    }

    pub fn screen_rotation_deg(&self) -> f32 {
        self.screen_rotation_deg
    }
}

impl Default for SensorInputs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_event_recomputes_rotation() {
        let mut inputs = SensorInputs::new();
        let initial = inputs.device_to_world();

        inputs.apply_orientation(OrientationEvent {
            alpha: Some(90.0),
            beta: None,
            gamma: None,
        });
        assert!(initial.angle_between(inputs.device_to_world()) > 0.1);
        assert_eq!(inputs.orientation().alpha, 90.0);
        assert_eq!(inputs.orientation().beta, 0.0);
    }

    #[test]
    fn screen_rotation_event_recomputes_rotation() {
        let mut inputs = SensorInputs::new();
        let portrait = inputs.device_to_world();
        inputs.apply_screen_rotation(Some(90.0));
        assert!(portrait.angle_between(inputs.device_to_world()) > 0.1);

        inputs.apply_screen_rotation(None);
        assert_eq!(inputs.screen_rotation_deg(), 0.0);
    }

    #[test]
    fn motion_event_groups_are_last_value_wins() {
        let mut inputs = SensorInputs::new();
        inputs.apply_motion(MotionEvent {
            accel_including_gravity: Some(AxisReading {
                x: Some(1.0),
                y: Some(2.0),
                z: Some(3.0),
            }),
            rotation_rate: Some(RateReading {
                alpha: Some(-10.0),
                beta: None,
                gamma: Some(4.0),
            }),
        });
        assert_eq!(inputs.accel_including_gravity(), Vec3::new(1.0, 2.0, 3.0));
        // Signs discarded, missing axes zero.
        assert_eq!(
            inputs.rotation_rate(),
            RotationRate {
                alpha: 10.0,
                beta: 0.0,
                gamma: 4.0
            }
        );

        // An event without an acceleration group keeps the previous sample.
        inputs.apply_motion(MotionEvent {
            accel_including_gravity: None,
            rotation_rate: Some(RateReading::default()),
        });
        assert_eq!(inputs.accel_including_gravity(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(inputs.rotation_rate(), RotationRate::default());
    }

    #[test]
    fn malformed_fields_never_poison_the_cells() {
        let mut inputs = SensorInputs::new();
        inputs.apply_motion(MotionEvent {
            accel_including_gravity: Some(AxisReading {
                x: Some(f32::NAN),
                y: Some(f32::NEG_INFINITY),
                z: Some(9.81),
            }),
            rotation_rate: None,
        });
        assert_eq!(inputs.accel_including_gravity(), Vec3::new(0.0, 0.0, 9.81));

        inputs.apply_orientation(OrientationEvent {
            alpha: Some(f32::NAN),
            beta: Some(45.0),
            gamma: None,
        });
        assert!(inputs.device_to_world().is_finite());
    }
}
