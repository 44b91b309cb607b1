//! Plane sampler: maps a normalized `(u, v)` coordinate plus a picker state to
//! one OKLCH sample.
//!
//! Standard planes are a direct formula. APCA-derived planes put a contrast
//! target on one axis and solve for the lightness that meets it.

use chroma_plane_core::apca::{contrast, LC_TARGET_MAX, LC_TARGET_MIN};
use chroma_plane_core::color::{normalize_hue, OkLch, C_MAX_DISPLAY};
use chroma_plane_core::gamut::color_in_gamut;
use chroma_plane_core::solver::solve_for_target;
use chroma_plane_core::state::{PickerState, Plane};

/// Result of sampling one point of the active plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerSample {
    /// `None` only when a contrast-target solve fails or lands out of gamut.
    pub color: Option<OkLch>,
    pub in_gamut: bool,
    /// Contrast against the state's background, when requested.
    pub lc: Option<f64>,
    /// Target `Lc` used by APCA-derived planes.
    pub apca_value: Option<f64>,
    pub u: f64,
    pub v: f64,
}

/// What a plane puts at one coordinate, before any gamut test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PlanePoint {
    /// Standard planes: the color straight from the plane formula.
    Direct(OkLch),
    /// APCA-derived planes: the solver's answer for `target` Lc.
    Solved { color: Option<OkLch>, target: f64 },
}

fn unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

fn target_from_axis(t: f64) -> f64 {
    LC_TARGET_MIN + t * (LC_TARGET_MAX - LC_TARGET_MIN)
}

/// Evaluates the active plane at already-clamped `(u, v)`.
///
/// Standard planes are a direct formula; the APCA-derived planes solve for the
/// lightness meeting their contrast target.
pub(crate) fn plane_point(u: f64, v: f64, state: &PickerState) -> PlanePoint {
    let (target, chroma, hue) = match state.plane() {
        Plane::HcAtL => {
            return PlanePoint::Direct(OkLch {
                l: state.l(),
                c: v * C_MAX_DISPLAY,
                h: normalize_hue(u * 360.0),
            });
        }
        Plane::LcAtH => {
            return PlanePoint::Direct(OkLch {
                l: v,
                c: u * C_MAX_DISPLAY,
                h: state.h(),
            });
        }
        Plane::HlAtC => {
            return PlanePoint::Direct(OkLch {
                l: v,
                c: state.c(),
                h: normalize_hue(u * 360.0),
            });
        }
        Plane::AhAtC => (target_from_axis(v), state.c(), u * 360.0),
        Plane::AcAtH => (target_from_axis(v), u * C_MAX_DISPLAY, state.h()),
        Plane::HcAtApca => (state.apca_fixed(), v * C_MAX_DISPLAY, u * 360.0),
    };
    let color = solve_for_target(
        target,
        chroma,
        normalize_hue(hue),
        state.apca_bg(),
        state.gamut(),
    );
    PlanePoint::Solved { color, target }
}

/// Samples the active plane at `(u, v)`, each clamped to [0, 1].
///
/// `lc` is left empty; see [`sample_with_lc`].
pub fn sample(u: f64, v: f64, state: &PickerState) -> PickerSample {
    let u = unit(u);
    let v = unit(v);
    match plane_point(u, v, state) {
        PlanePoint::Direct(color) => PickerSample {
            color: Some(color),
            in_gamut: color_in_gamut(color, state.gamut()),
            lc: None,
            apca_value: None,
            u,
            v,
        },
        PlanePoint::Solved { color, target } => PickerSample {
            color,
            in_gamut: color.is_some(),
            lc: None,
            apca_value: Some(target),
            u,
            v,
        },
    }
}

/// Like [`sample`], plus the contrast against the state's background whenever
/// the sampled color exists and is in gamut.
pub fn sample_with_lc(u: f64, v: f64, state: &PickerState) -> PickerSample {
    let mut s = sample(u, v, state);
    if let (Some(color), true) = (s.color, s.in_gamut) {
        s.lc = Some(contrast(color, state.apca_bg(), state.gamut()));
    }
    s
}
