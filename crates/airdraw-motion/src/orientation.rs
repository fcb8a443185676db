use crate::types::OrientationAngles;
use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::FRAC_1_SQRT_2;

/// Fixed correction aligning the device's screen-facing axis with world up:
/// a -90 degree rotation about X.
const SCREEN_UP_CORRECTION: Quat = Quat::from_xyzw(-FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2);

/// Build the device-frame to world-frame rotation from the latest
/// orientation angles and the screen's rotation angle.
///
/// The device reports an intrinsic Y-X-Z rotation with yaw=alpha,
/// pitch=beta, roll=-gamma. The screen-rotation compensation (portrait vs
/// landscape) is a rotation of -screen_rotation about world Z.
///
/// No smoothing is applied; the output tracks raw input directly and must be
/// recomputed on every orientation or screen-rotation event.
pub fn device_to_world(angles: &OrientationAngles, screen_rotation_deg: f32) -> Quat {
    let alpha = angles.alpha.to_radians();
    let beta = angles.beta.to_radians();
    let gamma = angles.gamma.to_radians();
    let screen = screen_rotation_deg.to_radians();

    Quat::from_euler(EulerRot::YXZ, alpha, beta, -gamma)
        * SCREEN_UP_CORRECTION
        * Quat::from_axis_angle(Vec3::Z, -screen)
}
