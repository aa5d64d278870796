//! Angle helpers shared by the course classifier and the GPS tracker.
//!
//! All angles are in degrees. Bearings are normalized to `[0, 360)`.

/// Normalizes any finite degree value into `[0, 360)`.
pub fn wrap_angle(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// The minimum rotation between two bearings, in `[0, 180]`.
pub fn smallest_angle_between(a: f64, b: f64) -> f64 {
    let diff = (wrap_angle(a) - wrap_angle(b)).abs();
    diff.min(360.0 - diff)
}

/// Great-circle initial bearing from point 1 to point 2, in `[0, 360)`.
///
/// Identical points yield `0.0` (north): `atan2(0, 0)` is zero.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    wrap_angle(y.atan2(x).to_degrees())
}
