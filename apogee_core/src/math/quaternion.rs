// apogee_core/src/math/quaternion.rs

//! Quaternion and vector operations used by the attitude estimator.
//!
//! Components are exposed to consumers in (x, y, z, w) order, which is the
//! storage order of `nalgebra::Quaternion::coords`. Every orientation rotates
//! body-frame vectors into the world frame: `v_world = q ⊗ (v, 0) ⊗ q*`.
//!
//! All fallible functions funnel through [`normalize`], so a NaN that slips
//! past the input checks is reported as a [`MathError`] instead of being
//! handed back inside a "unit" quaternion.

use nalgebra::{Quaternion, Vector3};

use crate::error::MathError;
use crate::types::{Quat, Vec3};

/// Dot product below which [`alignment`] treats two directions as antipodal.
pub const ANTIPODAL_DOT: f64 = -0.999_999;

/// Cosine above which [`slerp`] falls back to normalized linear interpolation.
pub const SLERP_LINEAR_THRESHOLD: f64 = 0.9995;

/// Shortest vector treated as having a direction.
pub const MIN_NORM: f64 = 1e-12;

fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Returns `v / ‖v‖`, rejecting non-finite and zero-length input.
pub fn unit(v: &Vec3, context: &'static str) -> Result<Vec3, MathError> {
    if !is_finite(v) {
        return Err(MathError::NonFinite(context));
    }
    let norm = v.norm();
    if norm < MIN_NORM {
        return Err(MathError::ZeroNorm(context));
    }
    Ok(v / norm)
}

/// The single renormalization point for every orientation this module returns.
pub fn normalize(q: Quaternion<f64>) -> Result<Quat, MathError> {
    let norm = q.norm();
    if !norm.is_finite() || norm < MIN_NORM {
        return Err(MathError::Renormalization(norm));
    }
    Ok(Quat::new_unchecked(q / norm))
}

/// Hamilton product `q ⊗ r`. Applies `r` first, then `q`.
pub fn multiply(q: &Quat, r: &Quat) -> Result<Quat, MathError> {
    normalize(q.quaternion() * r.quaternion())
}

/// `(−x, −y, −z, w)`; the inverse of a unit quaternion.
pub fn conjugate(q: &Quat) -> Quat {
    q.conjugate()
}

/// Rotates `v` by `q` with the sandwich product `q ⊗ (v, 0) ⊗ q*`.
pub fn rotate(v: &Vec3, q: &Quat) -> Result<Vec3, MathError> {
    if !is_finite(v) || !q.coords.iter().all(|c| c.is_finite()) {
        return Err(MathError::NonFinite("rotate"));
    }
    let pure = Quaternion::from_imag(*v);
    Ok((q.quaternion() * pure * q.conjugate().quaternion()).imag())
}

/// First-order gyro integration over `dt` seconds.
///
/// Builds the small-angle increment `(½ωx·dt, ½ωy·dt, ½ωz·dt, 1)`,
/// right-multiplies it into `q` (ω is a body rate) and renormalizes.
/// Only accurate while `‖ω‖·dt` stays small; callers stepping at more than
/// about 10 ms accept the resulting drift.
pub fn integrate(q: &Quat, omega: &Vec3, dt: f64) -> Result<Quat, MathError> {
    if !dt.is_finite() || !is_finite(omega) {
        return Err(MathError::NonFinite("integrate"));
    }
    let half_dt = 0.5 * dt;
    let delta = Quaternion::new(
        1.0,
        half_dt * omega.x,
        half_dt * omega.y,
        half_dt * omega.z,
    );
    normalize(q.quaternion() * delta)
}

/// Minimal-angle rotation taking direction `from` onto direction `to`.
///
/// Both inputs are normalized here. For near-antipodal directions the
/// rotation axis is undefined, so a 180° turn is made about `from × helper`,
/// where the helper is world X unless `from` is nearly parallel to it, in
/// which case world Y is used.
pub fn alignment(from: &Vec3, to: &Vec3) -> Result<Quat, MathError> {
    let from = unit(from, "alignment")?;
    let to = unit(to, "alignment")?;
    let dot = from.dot(&to);

    if dot < ANTIPODAL_DOT {
        let helper = if from.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let axis = unit(&from.cross(&helper), "alignment")?;
        return normalize(Quaternion::from_imag(axis));
    }

    let cross = from.cross(&to);
    let s = (2.0 * (1.0 + dot)).sqrt();
    normalize(Quaternion::new(
        0.5 * s,
        cross.x / s,
        cross.y / s,
        cross.z / s,
    ))
}

/// Shortest-arc spherical interpolation from `q1` (t = 0) to `q2` (t = 1).
///
/// `t` is clamped into `[0, 1]`. When the two orientations are within a
/// fraction of a degree the sine in the denominator vanishes, so normalized
/// linear interpolation is used instead.
pub fn slerp(q1: &Quat, q2: &Quat, t: f64) -> Result<Quat, MathError> {
    if !t.is_finite() {
        return Err(MathError::NonFinite("slerp"));
    }
    let t = t.clamp(0.0, 1.0);

    let a = q1.coords;
    let mut b = q2.coords;
    let mut cos_theta = a.dot(&b);
    if cos_theta < 0.0 {
        b = -b;
        cos_theta = -cos_theta;
    }

    if cos_theta > SLERP_LINEAR_THRESHOLD {
        return normalize(Quaternion::from_vector(a + (b - a) * t));
    }

    let theta_0 = cos_theta.acos();
    let sin_theta_0 = theta_0.sin();
    let theta = theta_0 * t;

    let s1 = theta.sin() / sin_theta_0;
    let s0 = theta.cos() - cos_theta * s1;

    normalize(Quaternion::from_vector(a * s0 + b * s1))
}
