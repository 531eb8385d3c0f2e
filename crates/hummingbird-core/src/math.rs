//! Small 3D vector and angle helpers shared by the simulation core.
//!
//! Positions are `[f64; 3]` with Y up. Angles are degrees; pitch follows the
//! convention that positive pitch tilts the nose toward -Y (downward) and yaw
//! rotates about the world up axis, `atan2(x, z)` style.

pub fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(v: [f64; 3], s: f64) -> [f64; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn length(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    length(sub(a, b))
}

/// Normalize `v`, returning the zero vector when `v` has zero length.
pub fn normalize_or_zero(v: [f64; 3]) -> [f64; 3] {
    let len = length(v);
    if len == 0.0 {
        [0.0, 0.0, 0.0]
    } else {
        scale(v, 1.0 / len)
    }
}

/// Move `current` toward `target` by at most `max_delta` (linear ramp, not
/// exponential smoothing).
pub fn move_toward(current: f64, target: f64, max_delta: f64) -> f64 {
    debug_assert!(max_delta >= 0.0, "max_delta cannot be negative");
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(diff)
    }
}

/// Wrap an angle in degrees into `(-180, 180]`, so a reading like 359 becomes -1.
pub fn wrap_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Unit forward vector for a heading rotated about the world up axis.
pub fn yaw_forward(yaw_deg: f64) -> [f64; 3] {
    let rad = yaw_deg.to_radians();
    [rad.sin(), 0.0, rad.cos()]
}

/// Pitch and yaw (degrees) that orient the forward axis along `dir`, with the
/// world up axis as the secondary axis and roll fixed at zero.
///
/// A zero-length direction yields `(0, 0)`.
pub fn look_at_pitch_yaw(dir: [f64; 3]) -> (f64, f64) {
    let len = length(dir);
    if len == 0.0 {
        return (0.0, 0.0);
    }
    let pitch = (-(dir[1] / len).clamp(-1.0, 1.0)).asin().to_degrees();
    let yaw = dir[0].atan2(dir[2]).to_degrees();
    (pitch, yaw)
}

/// Unit quaternion `[x, y, z, w]` for a yaw-then-pitch rotation with roll zero.
pub fn quat_from_pitch_yaw(pitch_deg: f64, yaw_deg: f64) -> [f32; 4] {
    let hp = pitch_deg.to_radians() * 0.5;
    let hy = yaw_deg.to_radians() * 0.5;
    let (sp, cp) = (hp.sin(), hp.cos());
    let (sy, cy) = (hy.sin(), hy.cos());
    [
        (cy * sp) as f32,
        (sy * cp) as f32,
        (-sy * sp) as f32,
        (cy * cp) as f32,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_toward_reaches_target_within_delta() {
        assert_eq!(move_toward(0.0, 0.05, 0.1), 0.05);
        assert_eq!(move_toward(0.0, -0.05, 0.1), -0.05);
    }

    #[test]
    fn move_toward_is_rate_limited() {
        assert_eq!(move_toward(0.0, 1.0, 0.1), 0.1);
        assert_eq!(move_toward(0.0, -1.0, 0.1), -0.1);
    }

    #[test]
    fn wrap_deg_maps_into_half_open_range() {
        assert_eq!(wrap_deg(359.0), -1.0);
        assert_eq!(wrap_deg(180.0), 180.0);
        assert_eq!(wrap_deg(-180.0), 180.0);
        assert_eq!(wrap_deg(540.0), 180.0);
        assert_eq!(wrap_deg(0.0), 0.0);
    }

    #[test]
    fn look_at_straight_down_pitches_positive() {
        let (pitch, yaw) = look_at_pitch_yaw([0.0, -1.0, 0.0]);
        assert!((pitch - 90.0).abs() < 1e-9);
        assert_eq!(yaw, 0.0);
    }

    #[test]
    fn look_at_along_x_yaws_ninety() {
        let (pitch, yaw) = look_at_pitch_yaw([1.0, 0.0, 0.0]);
        assert_eq!(pitch, 0.0);
        assert!((yaw - 90.0).abs() < 1e-9);
    }

    #[test]
    fn look_at_zero_direction_is_identity() {
        assert_eq!(look_at_pitch_yaw([0.0, 0.0, 0.0]), (0.0, 0.0));
    }

    #[test]
    fn quat_is_unit_length() {
        let q = quat_from_pitch_yaw(45.0, -120.0);
        let norm: f32 = q.iter().map(|c| c * c).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_or_zero_handles_zero_vector() {
        assert_eq!(normalize_or_zero([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
        let n = normalize_or_zero([3.0, 0.0, 4.0]);
        assert!((length(n) - 1.0).abs() < 1e-12);
    }
}
