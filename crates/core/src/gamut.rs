//! Target display gamuts and the OKLCH gamut tester.
//!
//! Conversions never clamp: a color outside the gamut shows up as a channel
//! below 0 or above 1, and [`in_gamut`] reports it. Clamping only happens when
//! producing something displayable (bytes, CSS strings, hex).

use crate::color::{
    encode_rgb, linear_srgb_to_linear_p3, oklab_to_linear_srgb, oklch_to_oklab, LinearRgb, OkLch,
    Rgb,
};
use crate::error::PickerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tolerance for gamut membership at the channel boundaries.
pub const GAMUT_EPSILON: f64 = 1e-6;

/// A target display gamut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gamut {
    #[default]
    #[serde(rename = "srgb")]
    Srgb,
    #[serde(rename = "display-p3")]
    DisplayP3,
}

impl Gamut {
    pub const ALL: [Gamut; 2] = [Gamut::Srgb, Gamut::DisplayP3];

    pub fn name(self) -> &'static str {
        match self {
            Gamut::Srgb => "srgb",
            Gamut::DisplayP3 => "display-p3",
        }
    }
}

impl fmt::Display for Gamut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gamut {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "srgb" => Ok(Gamut::Srgb),
            "display-p3" | "p3" | "displayp3" => Ok(Gamut::DisplayP3),
            _ => Err(PickerError::UnknownGamut(s.to_string())),
        }
    }
}

/// Converts OKLCH to linear-light RGB with the primaries of `gamut`.
pub fn to_linear_rgb(color: OkLch, gamut: Gamut) -> LinearRgb {
    let linear = oklab_to_linear_srgb(oklch_to_oklab(color));
    match gamut {
        Gamut::Srgb => linear,
        Gamut::DisplayP3 => linear_srgb_to_linear_p3(linear),
    }
}

/// Converts OKLCH to gamma-encoded RGB in `gamut`, unclamped.
///
/// The transfer curve maps [0, 1] onto itself, so gamut membership reads the
/// same on these values as on the linear ones.
pub fn to_gamut_rgb(color: OkLch, gamut: Gamut) -> Rgb {
    encode_rgb(to_linear_rgb(color, gamut))
}

/// True iff every channel lies within `[-GAMUT_EPSILON, 1 + GAMUT_EPSILON]`.
pub fn in_gamut(rgb: Rgb) -> bool {
    [rgb.r, rgb.g, rgb.b]
        .iter()
        .all(|&c| (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(&c))
}

/// Shorthand for `in_gamut(to_gamut_rgb(color, gamut))`.
pub fn color_in_gamut(color: OkLch, gamut: Gamut) -> bool {
    in_gamut(to_gamut_rgb(color, gamut))
}

/// Clamps each channel to [0, 1] and rounds to `0..=255`.
pub fn clamp_to_bytes(rgb: Rgb) -> [u8; 3] {
    rgb.to_bytes()
}

/// Formats `color` as a CSS color for `gamut`, paired with its in-gamut flag.
///
/// sRGB yields `rgb(r,g,b)` with 8-bit channels; Display-P3 yields
/// `color(display-p3 r g b)` with four decimals. Out-of-gamut colors are
/// clamped so the string always renders.
pub fn display_css(color: OkLch, gamut: Gamut) -> (String, bool) {
    let rgb = to_gamut_rgb(color, gamut);
    let ok = in_gamut(rgb);
    let css = match gamut {
        Gamut::Srgb => {
            let [r, g, b] = clamp_to_bytes(rgb);
            format!("rgb({r},{g},{b})")
        }
        Gamut::DisplayP3 => {
            let c = rgb.clamped();
            format!("color(display-p3 {:.4} {:.4} {:.4})", c.r, c.g, c.b)
        }
    };
    (css, ok)
}

/// Formats `color` as an sRGB `#rrggbb` string, whatever gamut is active.
pub fn to_hex(color: OkLch) -> String {
    to_gamut_rgb(color, Gamut::Srgb).to_hex()
}
