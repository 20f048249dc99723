//! Polar (hyperspherical) coordinates
//!
//! A polar vector in d-space stores the radius in component 0 and the
//! angles theta-1 .. theta-(d-1) in the remaining components:
//!
//! ```text
//! x_0     = r cos(t_1)
//! x_k     = r sin(t_1) ... sin(t_k) cos(t_(k+1))
//! x_(d-1) = r sin(t_1) ... sin(t_(d-1))
//! ```

use crate::VecN;

/// Convert a polar vector to cartesian coordinates
pub fn to_cartesian(polar: &VecN) -> VecN {
    let d = polar.dim();
    let mut out = VecN::zeros(d);
    if d == 0 {
        return out;
    }

    let mut sines = polar[0];
    for k in 0..d {
        if k + 1 < d {
            let angle = polar[k + 1];
            out[k] = sines * angle.cos();
            sines *= angle.sin();
        } else {
            out[k] = sines;
        }
    }
    out
}

/// Convert a cartesian vector to polar coordinates
///
/// The inverse of [`to_cartesian`]; angles other than the last lie in [0, pi],
/// the last lies in (-pi, pi].
pub fn from_cartesian(cartesian: &VecN) -> VecN {
    let d = cartesian.dim();
    let mut out = VecN::zeros(d);
    if d == 0 {
        return out;
    }

    out[0] = cartesian.length();
    for k in 1..d {
        if k + 1 == d {
            out[k] = cartesian[k].atan2(cartesian[k - 1]);
        } else {
            let tail: f64 = cartesian.as_slice()[k..].iter().map(|c| c * c).sum();
            out[k] = tail.sqrt().atan2(cartesian[k - 1]);
        }
    }
    out
}
