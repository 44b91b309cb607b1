//! Max-chroma solver: the largest in-gamut chroma at a given lightness and hue.
//!
//! Relies on gamut membership being monotonic in chroma at fixed (L, h),
//! which holds for convex RGB gamuts such as sRGB and Display-P3.

use crate::color::OkLch;
use crate::gamut::{color_in_gamut, Gamut};

/// Upper end of the chroma search interval.
pub const CHROMA_SEARCH_MAX: f64 = 0.5;
/// Bisection stops once the bracket is narrower than this.
const CHROMA_TOLERANCE: f64 = 1e-4;

/// Returns the largest chroma in [0, 0.5] still inside `gamut` at `(l, h)`.
///
/// Degenerate lightness (`l <= 0` or `l >= 1`) has no displayable chroma and
/// returns 0. The result is always a confirmed in-gamut value.
pub fn max_chroma(l: f64, h: f64, gamut: Gamut) -> f64 {
    if l.is_nan() || l <= 0.0 || l >= 1.0 {
        return 0.0;
    }
    let inside = |c: f64| color_in_gamut(OkLch { l, c, h }, gamut);

    if inside(CHROMA_SEARCH_MAX) {
        return CHROMA_SEARCH_MAX;
    }

    let mut low = 0.0;
    let mut high = CHROMA_SEARCH_MAX;
    while high - low > CHROMA_TOLERANCE {
        let mid = 0.5 * (low + high);
        if inside(mid) {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}
