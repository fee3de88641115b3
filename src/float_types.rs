//! Scalar precision and the plane tolerance.
//!
//! Exactly one of the `f64` and `f32` features picks `Real`; the matching parry
//! build is re-exported as `parry3d` so `Aabb` always agrees with it.

#[cfg(feature = "f64")]
pub use parry3d_f64 as parry3d;

#[cfg(feature = "f32")]
pub use parry3d;

#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Distance within which a vertex counts as lying on a cutting plane.
///
/// Fixed on first read. `GRIDCUT_TOLERANCE` at build time replaces the default,
/// and [`set_tolerance`] replaces both if it runs before the first cut.
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    #[cfg(feature = "f32")]
    {
        1e-4
    }
    #[cfg(feature = "f64")]
    {
        1e-6
    }
}

/// The plane tolerance in effect, never below `Real::EPSILON`
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        option_env!("GRIDCUT_TOLERANCE")
            .and_then(|raw| Real::from_str(raw).ok())
            .map_or(default_tolerance(), |value| value.max(Real::EPSILON))
    })
}

/// Fix the plane tolerance. Returns `false` and changes nothing once the
/// tolerance has been set or read.
pub fn set_tolerance(value: Real) -> bool {
    TOLERANCE_CELL.set(value.max(Real::EPSILON)).is_ok()
}

/// Quarter turn in radians
#[cfg(feature = "f32")]
pub const FRAC_PI_2: Real = core::f32::consts::FRAC_PI_2;
#[cfg(feature = "f64")]
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;
