use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("motion.velocity_damping must be in (0, 1], got {0}")]
    DampingOutOfRange(f32),
    #[error("motion threshold `{name}` must be non-negative, got {value}")]
    NegativeThreshold { name: &'static str, value: f32 },
    #[error("keyboard.speed_mps must be positive, got {0}")]
    NonPositiveSpeed(f32),
    #[error("keyboard.velocity_blend must be in (0, 1], got {0}")]
    BlendOutOfRange(f32),
    #[error("stroke.min_spacing_m must be non-negative, got {0}")]
    NegativeSpacing(f32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// World-frame start position in meters (about 1 m above ground).
    #[serde(with = "vec3_serde")]
    pub start_position: Vec3,
    /// Inertial integrator tuning.
    pub motion: MotionConfig,
    /// Keyboard flight tuning.
    pub keyboard: KeyboardConfig,
    /// Stroke recording defaults.
    pub stroke: StrokeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 1.0, 0.0),
            motion: MotionConfig::default(),
            keyboard: KeyboardConfig::default(),
            stroke: StrokeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reject values that would destabilize the integrators.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.motion;
        if !(m.velocity_damping > 0.0 && m.velocity_damping <= 1.0) {
            return Err(ConfigError::DampingOutOfRange(m.velocity_damping));
        }
        for (name, value) in [
            ("accel_deadband_mps2", m.accel_deadband_mps2),
            ("stable_accel_mps2", m.stable_accel_mps2),
            ("stable_rot_dps", m.stable_rot_dps),
            ("stable_time_ms", m.stable_time_ms as f32),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeThreshold { name, value });
            }
        }
        if !(self.keyboard.speed_mps > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(self.keyboard.speed_mps));
        }
        let blend = self.keyboard.velocity_blend;
        if !(blend > 0.0 && blend <= 1.0) {
            return Err(ConfigError::BlendOutOfRange(blend));
        }
        if !(self.stroke.min_spacing_m >= 0.0) {
            return Err(ConfigError::NegativeSpacing(self.stroke.min_spacing_m));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Whether the platform reports acceleration including gravity.
    /// Platform-dependent; when false the gravity subtraction is skipped.
    pub gravity_included: bool,
    /// Deadband on linear acceleration magnitude (m/s²).
    pub accel_deadband_mps2: f32,
    /// Acceleration ceiling for the at-rest judgement (m/s²).
    pub stable_accel_mps2: f32,
    /// Rotation-rate ceiling for the at-rest judgement (deg/s).
    pub stable_rot_dps: f32,
    /// Still time required before the velocity reset fires (ms).
    pub stable_time_ms: f64,
    /// Per-step exponential velocity decay.
    pub velocity_damping: f32,
}

impl Default for MotionConfig {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Base speed in m/s.
    pub speed_mps: f32,
    /// Speed multiplier without the boost modifier.
    pub normal_scale: f32,
    /// Speed multiplier while Shift is held.
    pub boost_scale: f32,
    /// Per-step velocity blend factor toward the key-derived target.
    pub velocity_blend: f32,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            speed_mps: 1.5,
            normal_scale: 1.5,
            boost_scale: 3.0,
            velocity_blend: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeConfig {
    /// Minimum spacing between recorded stroke points (meters).
    pub min_spacing_m: f32,
    /// Default stroke color, linear RGB.
    pub color: [f32; 3],
    /// Default stroke width in pixels.
    pub width_px: f32,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            min_spacing_m: 0.02,
            color: [1.0, 1.0, 1.0],
            width_px: 4.0,
        }
    }
}

// Serde helper keeping Vec3 as a clean TOML array.

mod vec3_serde {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Vec3, s: S) -> Result<S::Ok, S::Error> {
        [v.x, v.y, v.z].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec3, D::Error> {
        let [x, y, z] = <[f32; 3]>::deserialize(d)?;
        Ok(Vec3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AppConfig::default().validate().expect("defaults must validate");
    }

    #[test]
    fn damping_bounds_are_enforced() {
        let mut config = AppConfig::default();
        config.motion.velocity_damping = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DampingOutOfRange(_))
        ));
        config.motion.velocity_damping = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nan_thresholds_are_rejected() {
        let mut config = AppConfig::default();
        config.motion.stable_accel_mps2 = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeThreshold { name: "stable_accel_mps2", .. })
        ));
    }

    #[test]
    fn keyboard_bounds_are_enforced() {
        let mut config = AppConfig::default();
        config.keyboard.speed_mps = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::NonPositiveSpeed(_))));

        let mut config = AppConfig::default();
        config.keyboard.velocity_blend = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::BlendOutOfRange(_))));
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.start_position, config.start_position);
        assert_eq!(back.motion.velocity_damping, config.motion.velocity_damping);
        assert_eq!(back.stroke.color, config.stroke.color);
    }
}
