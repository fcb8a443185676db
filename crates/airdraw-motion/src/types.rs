use glam::Vec3;

/// Device-reported orientation angles in degrees (yaw/pitch/roll as the
/// platform delivers them: alpha about Z, beta about X, gamma about Y).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationAngles {
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

/// Payload of an orientation event. Fields the platform did not report
/// arrive as `None` and are treated as 0 degrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationEvent {
    pub alpha: Option<f32>,
    pub beta: Option<f32>,
    pub gamma: Option<f32>,
}

/// One axis group of a motion event. Individual axes may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisReading {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

/// Rotation-rate group of a motion event, in deg/s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateReading {
    pub alpha: Option<f32>,
    pub beta: Option<f32>,
    pub gamma: Option<f32>,
}

/// Payload of a motion event. An absent group means the platform did not
/// include that sensor in the event; the previous cell value is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionEvent {
    /// Device-frame acceleration in m/s², gravity included.
    pub accel_including_gravity: Option<AxisReading>,
    /// Device-frame angular rates in deg/s.
    pub rotation_rate: Option<RateReading>,
}

/// Latest device-frame angular rates in deg/s. Signs are discarded at
/// ingestion; only magnitudes matter for the stability check.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationRate {
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

impl RotationRate {
    /// Largest per-axis rate magnitude in deg/s.
    pub fn max_dps(&self) -> f32 {
        self.alpha.max(self.beta).max(self.gamma)
    }
}

/// World-frame position and velocity of the tracked point.
///
/// Invariant: both vectors are finite at all times. The integrators discard
/// any step that would violate this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldState {
    /// Position in meters.
    pub position: Vec3,
    /// Velocity in m/s.
    pub velocity: Vec3,
}

impl WorldState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }

    /// Instantaneous speed in m/s.
    pub fn speed_mps(&self) -> f32 {
        self.velocity.length()
    }

    /// Straight-line distance from the world origin in meters.
    pub fn distance_m(&self) -> f32 {
        self.position.length()
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Sanitize one optional sensor field: absent or non-finite values become 0.
pub(crate) fn sensor_field(value: Option<f32>) -> f32 {
    match value {
        Some(v) if v.is_finite() => v,
        Some(v) => {
            tracing::warn!(value = v, "Non-finite sensor field, substituting 0");
            0.0
        }
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_rate_max_is_largest_axis() {
        let rate = RotationRate {
            alpha: 1.0,
            beta: 7.5,
            gamma: 3.0,
        };
        assert_eq!(rate.max_dps(), 7.5);
    }

    #[test]
    fn sensor_field_defaults_and_sanitizes() {
        assert_eq!(sensor_field(None), 0.0);
        assert_eq!(sensor_field(Some(2.5)), 2.5);
        assert_eq!(sensor_field(Some(f32::NAN)), 0.0);
        assert_eq!(sensor_field(Some(f32::INFINITY)), 0.0);
    }

    #[test]
    fn world_state_stats() {
        let mut state = WorldState::at(Vec3::new(0.0, 3.0, 4.0));
        state.velocity = Vec3::new(0.6, 0.0, 0.8);
        assert!((state.distance_m() - 5.0).abs() < 1e-6);
        assert!((state.speed_mps() - 1.0).abs() < 1e-6);
    }
}
