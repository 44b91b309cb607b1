//! APCA contrast engine.
//!
//! Implements the APCA-W3 0.0.98G-4g lightness contrast (`Lc`). The metric is
//! polarity-aware: dark text on a light background and light text on a dark
//! background use different exponents, so `contrast(a, b) != contrast(b, a)`.

use crate::color::OkLch;
use crate::gamut::{to_gamut_rgb, Gamut};

/// Luminance coefficients for sRGB.
const SRGB_COEFFICIENTS: [f64; 3] = [0.2126729, 0.7151522, 0.0721750];
/// Luminance coefficients for Display-P3.
#[allow(clippy::excessive_precision)]
const P3_COEFFICIENTS: [f64; 3] = [0.2289829594805780, 0.6917492625852380, 0.0792677779341829];
const MAIN_TRC: f64 = 2.4;

const NORM_BG: f64 = 0.56;
const NORM_TXT: f64 = 0.57;
const REV_TXT: f64 = 0.62;
const REV_BG: f64 = 0.65;

const BLACK_THRESHOLD: f64 = 0.022;
const BLACK_CLAMP: f64 = 1.414;
const SCALE: f64 = 1.14;
const OFFSET: f64 = 0.027;
const DELTA_Y_MIN: f64 = 0.0005;
const LOW_CLIP: f64 = 0.1;

/// Practical ceiling of `|Lc|`.
pub const LC_MAX: f64 = 106.0;
/// Lowest contrast target the picker accepts.
pub const LC_TARGET_MIN: f64 = 15.0;
/// Highest contrast target the picker accepts.
pub const LC_TARGET_MAX: f64 = 105.0;

/// Screen luminance `Y` of `color` as APCA sees it in `gamut`.
///
/// Channels are clamped to [0, 1] first. sRGB goes through 8-bit quantization
/// as the APCA sRGB path does; Display-P3 uses the float channels directly.
pub fn relative_luminance(color: OkLch, gamut: Gamut) -> f64 {
    let rgb = to_gamut_rgb(color, gamut).clamped();
    let (coefficients, channels) = match gamut {
        Gamut::Srgb => (SRGB_COEFFICIENTS, rgb.to_bytes().map(|b| b as f64 / 255.0)),
        Gamut::DisplayP3 => (P3_COEFFICIENTS, [rgb.r, rgb.g, rgb.b]),
    };
    coefficients
        .iter()
        .zip(channels)
        .map(|(k, c)| k * c.powf(MAIN_TRC))
        .sum()
}

fn soft_clamp_black(y: f64) -> f64 {
    if y < BLACK_THRESHOLD {
        y + (BLACK_THRESHOLD - y).powf(BLACK_CLAMP)
    } else {
        y
    }
}

/// Signed APCA `Lc` for text luminance `fg_y` over background luminance `bg_y`.
///
/// Positive for dark text on a light background, negative for light text on a
/// dark background. Invalid luminances and near-identical pairs give 0.
pub fn signed_contrast(fg_y: f64, bg_y: f64) -> f64 {
    if fg_y.is_nan() || bg_y.is_nan() || fg_y.min(bg_y) < 0.0 || fg_y.max(bg_y) > 1.1 {
        return 0.0;
    }
    let txt = soft_clamp_black(fg_y);
    let bg = soft_clamp_black(bg_y);

    if (bg - txt).abs() < DELTA_Y_MIN {
        return 0.0;
    }

    let lc = if bg > txt {
        let sapc = (bg.powf(NORM_BG) - txt.powf(NORM_TXT)) * SCALE;
        if sapc < LOW_CLIP {
            0.0
        } else {
            sapc - OFFSET
        }
    } else {
        let sapc = (bg.powf(REV_BG) - txt.powf(REV_TXT)) * SCALE;
        if sapc > -LOW_CLIP {
            0.0
        } else {
            sapc + OFFSET
        }
    };
    lc * 100.0
}

/// Background luminance to reuse across many [`contrast_with_bg_y`] calls.
pub fn precompute_bg_y(background: OkLch, gamut: Gamut) -> f64 {
    relative_luminance(background, gamut)
}

/// `|Lc|` of `foreground` over a background of precomputed luminance `bg_y`.
///
/// Non-finite results collapse to 0.
pub fn contrast_with_bg_y(foreground: OkLch, bg_y: f64, gamut: Gamut) -> f64 {
    let lc = signed_contrast(relative_luminance(foreground, gamut), bg_y).abs();
    if lc.is_finite() {
        lc
    } else {
        0.0
    }
}

/// `|Lc|` of `foreground` text over `background` in `gamut`.
pub fn contrast(foreground: OkLch, background: OkLch, gamut: Gamut) -> f64 {
    contrast_with_bg_y(foreground, precompute_bg_y(background, gamut), gamut)
}
