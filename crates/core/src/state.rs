//! Picker configuration: which plane is shown, how it is dimmed, and the fixed
//! coordinates the plane does not vary.
//!
//! `PickerState` keeps its fields private and clamps or wraps every value on
//! the way in, so the sampler and renderer never see an illegal state.

use crate::apca::{LC_TARGET_MAX, LC_TARGET_MIN};
use crate::color::{normalize_hue, OkLch, C_MAX_DISPLAY};
use crate::error::PickerError;
use crate::gamut::Gamut;
use crate::params::{param_f64, param_f64_list, param_str, param_usize};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Resolutions a caller may request.
pub const RESOLUTIONS: [u32; 3] = [256, 512, 1024];

const DEFAULT_RESOLUTION: u32 = 256;
const DEFAULT_L: f64 = 0.7;
const DEFAULT_C: f64 = 0.1;
const DEFAULT_H: f64 = 250.0;
const DEFAULT_APCA_TARGET: f64 = 60.0;
const DEFAULT_MAX_CHROMA_THRESHOLD: f64 = 0.9;
const MAX_CHROMA_THRESHOLD_MIN: f64 = 0.5;

/// A 2D slice through OKLCH (or OKLCH crossed with APCA contrast).
///
/// Names read `<x axis><y axis>_at_<fixed>`: `HC_at_L` puts hue on `u`,
/// chroma on `v` and holds lightness fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Plane {
    #[default]
    #[serde(rename = "HC_at_L")]
    HcAtL,
    #[serde(rename = "LC_at_H")]
    LcAtH,
    #[serde(rename = "HL_at_C")]
    HlAtC,
    #[serde(rename = "AH_at_C")]
    AhAtC,
    #[serde(rename = "AC_at_H")]
    AcAtH,
    #[serde(rename = "HC_at_APCA")]
    HcAtApca,
}

impl Plane {
    pub const ALL: [Plane; 6] = [
        Plane::HcAtL,
        Plane::LcAtH,
        Plane::HlAtC,
        Plane::AhAtC,
        Plane::AcAtH,
        Plane::HcAtApca,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Plane::HcAtL => "HC_at_L",
            Plane::LcAtH => "LC_at_H",
            Plane::HlAtC => "HL_at_C",
            Plane::AhAtC => "AH_at_C",
            Plane::AcAtH => "AC_at_H",
            Plane::HcAtApca => "HC_at_APCA",
        }
    }

    /// Standard planes slice OKLCH directly; the others solve for lightness
    /// against a contrast target.
    pub fn is_standard(self) -> bool {
        matches!(self, Plane::HcAtL | Plane::LcAtH | Plane::HlAtC)
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Plane {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Plane::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PickerError::UnknownPlane(s.to_string()))
    }
}

/// Dimming rule applied to standard planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Show the gamut shape only.
    #[default]
    Shape,
    /// Dim colors below a fraction of the maximum in-gamut chroma.
    MaxChroma,
    /// Dim colors below the lowest APCA target.
    Apca,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Shape, Mode::MaxChroma, Mode::Apca];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Shape => "shape",
            Mode::MaxChroma => "max-chroma",
            Mode::Apca => "apca",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "shape" => Ok(Mode::Shape),
            "max-chroma" | "maxchroma" => Ok(Mode::MaxChroma),
            "apca" => Ok(Mode::Apca),
            _ => Err(PickerError::UnknownMode(s.to_string())),
        }
    }
}

/// Snaps a requested resolution to the nearest supported one.
///
/// Ties resolve to the smaller resolution.
pub fn snap_resolution(requested: usize) -> u32 {
    RESOLUTIONS
        .into_iter()
        .min_by_key(|&r| (requested as u64).abs_diff(u64::from(r)))
        .unwrap_or(DEFAULT_RESOLUTION)
}

fn clamp_finite(x: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if x.is_nan() {
        fallback
    } else {
        x.clamp(lo, hi)
    }
}

fn clamp_target(lc: f64) -> f64 {
    clamp_finite(lc, LC_TARGET_MIN, LC_TARGET_MAX, DEFAULT_APCA_TARGET)
}

/// Full configuration driving the sampler and the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerState {
    plane: Plane,
    mode: Mode,
    gamut: Gamut,
    resolution: u32,
    l: f64,
    c: f64,
    h: f64,
    apca_bg: OkLch,
    apca_targets: BTreeSet<u32>,
    apca_fixed: f64,
    max_chroma_threshold: f64,
}

impl Default for PickerState {
    fn default() -> Self {
        Self {
            plane: Plane::default(),
            mode: Mode::default(),
            gamut: Gamut::default(),
            resolution: DEFAULT_RESOLUTION,
            l: DEFAULT_L,
            c: DEFAULT_C,
            h: DEFAULT_H,
            apca_bg: OkLch::WHITE,
            apca_targets: BTreeSet::from([DEFAULT_APCA_TARGET as u32]),
            apca_fixed: DEFAULT_APCA_TARGET,
            max_chroma_threshold: DEFAULT_MAX_CHROMA_THRESHOLD,
        }
    }
}

impl PickerState {
    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn gamut(&self) -> Gamut {
        self.gamut
    }

    /// Requested resolution; the renderer may cap it.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn l(&self) -> f64 {
        self.l
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn apca_bg(&self) -> OkLch {
        self.apca_bg
    }

    pub fn apca_targets(&self) -> &BTreeSet<u32> {
        &self.apca_targets
    }

    /// Lowest pass/fail threshold, or `None` when no targets are set.
    pub fn min_apca_target(&self) -> Option<f64> {
        self.apca_targets.first().map(|&t| t as f64)
    }

    pub fn apca_fixed(&self) -> f64 {
        self.apca_fixed
    }

    pub fn max_chroma_threshold(&self) -> f64 {
        self.max_chroma_threshold
    }

    pub fn set_plane(&mut self, plane: Plane) -> &mut Self {
        self.plane = plane;
        self
    }

    pub fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn set_gamut(&mut self, gamut: Gamut) -> &mut Self {
        self.gamut = gamut;
        self
    }

    /// Snaps to 256, 512 or 1024.
    pub fn set_resolution(&mut self, requested: usize) -> &mut Self {
        self.resolution = snap_resolution(requested);
        self
    }

    pub fn set_l(&mut self, l: f64) -> &mut Self {
        self.l = clamp_finite(l, 0.0, 1.0, DEFAULT_L);
        self
    }

    pub fn set_c(&mut self, c: f64) -> &mut Self {
        self.c = clamp_finite(c, 0.0, C_MAX_DISPLAY, DEFAULT_C);
        self
    }

    pub fn set_h(&mut self, h: f64) -> &mut Self {
        self.h = normalize_hue(h);
        self
    }

    pub fn set_apca_bg(&mut self, bg: OkLch) -> &mut Self {
        self.apca_bg = bg.normalized();
        self
    }

    /// Replaces the threshold set; each value is clamped to [15, 105] and
    /// rounded to an integer. Non-finite values are dropped.
    pub fn set_apca_targets<I>(&mut self, targets: I) -> &mut Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.apca_targets = targets
            .into_iter()
            .filter(|t| t.is_finite())
            .map(|t| clamp_target(t).round() as u32)
            .collect();
        self
    }

    pub fn set_apca_fixed(&mut self, lc: f64) -> &mut Self {
        self.apca_fixed = clamp_target(lc);
        self
    }

    pub fn set_max_chroma_threshold(&mut self, ratio: f64) -> &mut Self {
        self.max_chroma_threshold = clamp_finite(
            ratio,
            MAX_CHROMA_THRESHOLD_MIN,
            1.0,
            DEFAULT_MAX_CHROMA_THRESHOLD,
        );
        self
    }

    /// Builds a state from a JSON object, falling back to defaults for missing
    /// or mistyped numeric keys.
    ///
    /// Unknown plane, mode or gamut names and malformed `apca_bg` hex strings
    /// are errors.
    pub fn from_json(params: &Value) -> Result<Self, PickerError> {
        let defaults = Self::default();
        let mut state = Self::default();

        if let Some(name) = param_str(params, "plane") {
            state.set_plane(name.parse()?);
        }
        if let Some(name) = param_str(params, "mode") {
            state.set_mode(name.parse()?);
        }
        if let Some(name) = param_str(params, "gamut") {
            state.set_gamut(name.parse()?);
        }
        state
            .set_resolution(param_usize(params, "resolution", defaults.resolution as usize))
            .set_l(param_f64(params, "l", defaults.l))
            .set_c(param_f64(params, "c", defaults.c))
            .set_h(param_f64(params, "h", defaults.h))
            .set_apca_fixed(param_f64(params, "apca_fixed", defaults.apca_fixed))
            .set_max_chroma_threshold(param_f64(
                params,
                "max_chroma_threshold",
                defaults.max_chroma_threshold,
            ));
        if let Some(targets) = param_f64_list(params, "apca_targets") {
            state.set_apca_targets(targets);
        }
        match params.get("apca_bg") {
            Some(Value::String(hex)) => {
                state.set_apca_bg(OkLch::from_hex(hex)?);
            }
            Some(obj @ Value::Object(_)) => {
                let bg = defaults.apca_bg;
                state.set_apca_bg(OkLch {
                    l: param_f64(obj, "l", bg.l),
                    c: param_f64(obj, "c", bg.c),
                    h: param_f64(obj, "h", bg.h),
                });
            }
            _ => {}
        }
        Ok(state)
    }

    /// Current state as a JSON object readable by [`PickerState::from_json`].
    pub fn to_json(&self) -> Value {
        json!({
            "plane": self.plane.name(),
            "mode": self.mode.name(),
            "gamut": self.gamut.name(),
            "resolution": self.resolution,
            "l": self.l,
            "c": self.c,
            "h": self.h,
            "apca_bg": {"l": self.apca_bg.l, "c": self.apca_bg.c, "h": self.apca_bg.h},
            "apca_targets": self.apca_targets.iter().collect::<Vec<_>>(),
            "apca_fixed": self.apca_fixed,
            "max_chroma_threshold": self.max_chroma_threshold,
        })
    }

    /// Describes every configurable key: type, default, range, description.
    pub fn param_schema() -> Value {
        let planes: Vec<&str> = Plane::ALL.iter().map(|p| p.name()).collect();
        let modes: Vec<&str> = Mode::ALL.iter().map(|m| m.name()).collect();
        let gamuts: Vec<&str> = Gamut::ALL.iter().map(|g| g.name()).collect();
        json!({
            "plane": {
                "type": "string",
                "default": Plane::default().name(),
                "values": planes,
                "description": "Which 2D slice of color space to show"
            },
            "mode": {
                "type": "string",
                "default": Mode::default().name(),
                "values": modes,
                "description": "Dimming rule for standard planes"
            },
            "gamut": {
                "type": "string",
                "default": Gamut::default().name(),
                "values": gamuts,
                "description": "Target display gamut"
            },
            "resolution": {
                "type": "integer",
                "default": DEFAULT_RESOLUTION,
                "values": RESOLUTIONS,
                "description": "Requested raster size; capped per plane and mode"
            },
            "l": {
                "type": "number",
                "default": DEFAULT_L,
                "min": 0.0,
                "max": 1.0,
                "description": "Fixed OKLCH lightness"
            },
            "c": {
                "type": "number",
                "default": DEFAULT_C,
                "min": 0.0,
                "max": C_MAX_DISPLAY,
                "description": "Fixed OKLCH chroma"
            },
            "h": {
                "type": "number",
                "default": DEFAULT_H,
                "min": 0.0,
                "max": 360.0,
                "description": "Fixed OKLCH hue in degrees, wrapped"
            },
            "apca_bg": {
                "type": "color",
                "default": "#ffffff",
                "description": "Background for contrast; hex string or {l, c, h}"
            },
            "apca_targets": {
                "type": "array",
                "default": [DEFAULT_APCA_TARGET as u32],
                "min": LC_TARGET_MIN,
                "max": LC_TARGET_MAX,
                "description": "Lc thresholds for pass/fail dimming in apca mode"
            },
            "apca_fixed": {
                "type": "number",
                "default": DEFAULT_APCA_TARGET,
                "min": LC_TARGET_MIN,
                "max": LC_TARGET_MAX,
                "description": "Target Lc for the HC_at_APCA plane"
            },
            "max_chroma_threshold": {
                "type": "number",
                "default": DEFAULT_MAX_CHROMA_THRESHOLD,
                "min": MAX_CHROMA_THRESHOLD_MIN,
                "max": 1.0,
                "description": "Fraction of max chroma below which max-chroma mode dims"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_hc_at_l_shape_srgb() {
        let s = PickerState::default();
        assert_eq!(s.plane(), Plane::HcAtL);
        assert_eq!(s.mode(), Mode::Shape);
        assert_eq!(s.gamut(), Gamut::Srgb);
        assert_eq!(s.resolution(), 256);
        assert_eq!(s.apca_bg(), OkLch::WHITE);
        assert_eq!(s.min_apca_target(), Some(60.0));
    }

    #[test]
    fn setters_clamp_and_wrap() {
        let mut s = PickerState::default();
        s.set_l(1.5)
            .set_c(0.9)
            .set_h(-90.0)
            .set_apca_fixed(200.0)
            .set_max_chroma_threshold(0.1);
        assert_eq!(s.l(), 1.0);
        assert_eq!(s.c(), C_MAX_DISPLAY);
        assert_eq!(s.h(), 270.0);
        assert_eq!(s.apca_fixed(), LC_TARGET_MAX);
        assert_eq!(s.max_chroma_threshold(), MAX_CHROMA_THRESHOLD_MIN);

        s.set_l(f64::NAN).set_c(-1.0);
        assert_eq!(s.l(), DEFAULT_L);
        assert_eq!(s.c(), 0.0);
    }

    #[test]
    fn resolution_snaps_to_supported_values() {
        assert_eq!(snap_resolution(0), 256);
        assert_eq!(snap_resolution(300), 256);
        assert_eq!(snap_resolution(384), 256);
        assert_eq!(snap_resolution(400), 512);
        assert_eq!(snap_resolution(1024), 1024);
        assert_eq!(snap_resolution(100_000), 1024);
    }

    #[test]
    fn targets_clamp_round_and_dedupe() {
        let mut s = PickerState::default();
        s.set_apca_targets([5.0, 45.4, 45.0, 120.0, f64::NAN]);
        let targets: Vec<u32> = s.apca_targets().iter().copied().collect();
        assert_eq!(targets, vec![15, 45, 105]);
        assert_eq!(s.min_apca_target(), Some(15.0));

        s.set_apca_targets(std::iter::empty());
        assert_eq!(s.min_apca_target(), None);
    }

    #[test]
    fn apca_bg_is_normalized() {
        let mut s = PickerState::default();
        s.set_apca_bg(OkLch::new(2.0, 0.6, 400.0));
        let bg = s.apca_bg();
        assert_eq!(bg.l, 1.0);
        assert_eq!(bg.c, C_MAX_DISPLAY);
        assert!((bg.h - 40.0).abs() < 1e-9);
    }

    #[test]
    fn plane_names_round_trip() {
        for plane in Plane::ALL {
            assert_eq!(plane.name().parse::<Plane>().unwrap(), plane);
        }
        assert!(matches!(
            "XY_at_Z".parse::<Plane>(),
            Err(PickerError::UnknownPlane(_))
        ));
        assert!(Plane::LcAtH.is_standard());
        assert!(!Plane::HcAtApca.is_standard());
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.name().parse::<Mode>().unwrap(), mode);
        }
        assert_eq!("MaxChroma".parse::<Mode>().unwrap(), Mode::MaxChroma);
        assert_eq!("max_chroma".parse::<Mode>().unwrap(), Mode::MaxChroma);
        assert!("contrast".parse::<Mode>().is_err());
    }

    #[test]
    fn serde_uses_stable_names() {
        assert_eq!(serde_json::to_string(&Plane::HcAtApca).unwrap(), "\"HC_at_APCA\"");
        assert_eq!(serde_json::to_string(&Mode::MaxChroma).unwrap(), "\"max-chroma\"");
        assert_eq!(serde_json::to_string(&Gamut::DisplayP3).unwrap(), "\"display-p3\"");
    }

    #[test]
    fn from_json_empty_is_default() {
        let s = PickerState::from_json(&json!({})).unwrap();
        assert_eq!(s, PickerState::default());
    }

    #[test]
    fn from_json_reads_every_key() {
        let s = PickerState::from_json(&json!({
            "plane": "AC_at_H",
            "mode": "apca",
            "gamut": "display-p3",
            "resolution": 1024,
            "l": 0.4,
            "c": 0.2,
            "h": 380.0,
            "apca_bg": "#000000",
            "apca_targets": [75, 45],
            "apca_fixed": 90,
            "max_chroma_threshold": 0.75
        }))
        .unwrap();
        assert_eq!(s.plane(), Plane::AcAtH);
        assert_eq!(s.mode(), Mode::Apca);
        assert_eq!(s.gamut(), Gamut::DisplayP3);
        assert_eq!(s.resolution(), 1024);
        assert_eq!(s.l(), 0.4);
        assert_eq!(s.c(), 0.2);
        assert!((s.h() - 20.0).abs() < 1e-9);
        assert!(s.apca_bg().l.abs() < 1e-9);
        assert_eq!(s.min_apca_target(), Some(45.0));
        assert_eq!(s.apca_fixed(), 90.0);
        assert_eq!(s.max_chroma_threshold(), 0.75);
    }

    #[test]
    fn from_json_accepts_object_background() {
        let s = PickerState::from_json(&json!({"apca_bg": {"l": 0.2, "c": 0.05}})).unwrap();
        assert_eq!(s.apca_bg(), OkLch::new(0.2, 0.05, 0.0));
    }

    #[test]
    fn from_json_rejects_bad_names_and_colors() {
        assert!(matches!(
            PickerState::from_json(&json!({"plane": "nope"})),
            Err(PickerError::UnknownPlane(_))
        ));
        assert!(matches!(
            PickerState::from_json(&json!({"mode": "nope"})),
            Err(PickerError::UnknownMode(_))
        ));
        assert!(matches!(
            PickerState::from_json(&json!({"gamut": "nope"})),
            Err(PickerError::UnknownGamut(_))
        ));
        assert!(matches!(
            PickerState::from_json(&json!({"apca_bg": "#12"})),
            Err(PickerError::InvalidColor(_))
        ));
    }

    #[test]
    fn to_json_round_trips() {
        let mut s = PickerState::default();
        s.set_plane(Plane::HlAtC)
            .set_mode(Mode::MaxChroma)
            .set_gamut(Gamut::DisplayP3)
            .set_resolution(512)
            .set_c(0.15)
            .set_apca_targets([30.0, 90.0]);
        let back = PickerState::from_json(&s.to_json()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn param_schema_covers_every_json_key() {
        let schema = PickerState::param_schema();
        let state = PickerState::default().to_json();
        for key in state.as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_numeric_input_yields_a_legal_state(
                l in proptest::num::f64::ANY,
                c in proptest::num::f64::ANY,
                h in proptest::num::f64::ANY,
                fixed in proptest::num::f64::ANY,
                ratio in proptest::num::f64::ANY,
                res in 0usize..5000,
            ) {
                let mut s = PickerState::default();
                s.set_l(l).set_c(c).set_h(h).set_apca_fixed(fixed)
                    .set_max_chroma_threshold(ratio).set_resolution(res);
                prop_assert!((0.0..=1.0).contains(&s.l()));
                prop_assert!((0.0..=C_MAX_DISPLAY).contains(&s.c()));
                prop_assert!((0.0..360.0).contains(&s.h()));
                prop_assert!((LC_TARGET_MIN..=LC_TARGET_MAX).contains(&s.apca_fixed()));
                prop_assert!((0.5..=1.0).contains(&s.max_chroma_threshold()));
                prop_assert!(RESOLUTIONS.contains(&s.resolution()));
            }
        }
    }
}
