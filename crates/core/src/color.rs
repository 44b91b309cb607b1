//! Color types and conversion functions for chroma-plane.
//!
//! Provides four color types (`Rgb`, `LinearRgb`, `OkLab`, `OkLch`) and pure
//! conversion functions between them. Uses `f64` throughout for precision.
//!
//! RGB values are never clamped here: out-of-range channels are how the gamut
//! tester recognizes colors a display cannot show.

use crate::error::PickerError;
use serde::{Deserialize, Serialize};

/// Largest chroma the picker surfaces display.
pub const C_MAX_DISPLAY: f64 = 0.4;

/// Gamma-encoded RGB channels, nominally in [0, 1].
///
/// The primaries are those of whichever [`Gamut`](crate::Gamut) produced the
/// value; hex strings are always sRGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Linear-light RGB (gamma-decoded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// OKLab perceptual color space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// OKLCh (cylindrical form of OKLab).
///
/// A value object: operations return new colors rather than mutating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OkLch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl OkLch {
    pub const WHITE: OkLch = OkLch {
        l: 1.0,
        c: 0.0,
        h: 0.0,
    };

    pub const BLACK: OkLch = OkLch {
        l: 0.0,
        c: 0.0,
        h: 0.0,
    };

    pub fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    /// Clamps lightness to [0, 1], chroma to [0, `C_MAX_DISPLAY`] and wraps
    /// hue into [0, 360). NaN components collapse to 0.
    pub fn normalized(self) -> Self {
        Self {
            l: finite_or_zero(self.l).clamp(0.0, 1.0),
            c: finite_or_zero(self.c).clamp(0.0, C_MAX_DISPLAY),
            h: normalize_hue(self.h),
        }
    }

    /// Parses an sRGB hex string (`"#rrggbb"` or `"rrggbb"`) into OKLCh.
    pub fn from_hex(hex: &str) -> Result<Self, PickerError> {
        Rgb::from_hex(hex).map(srgb_to_oklch)
    }
}

impl Rgb {
    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `PickerError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Rgb, PickerError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(PickerError::InvalidColor(format!(
                "expected 6 hex digits, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| PickerError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        let r = channel(0..2, "red")?;
        let g = channel(2..4, "green")?;
        let b = channel(4..6, "blue")?;
        Ok(Rgb {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        })
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    ///
    /// Components are clamped and quantized to 8-bit with rounding.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Clamps each channel to [0, 1] and rounds to `0..=255`.
    pub fn to_bytes(self) -> [u8; 3] {
        [
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b),
        ]
    }

    /// Clamps each channel to [0, 1].
    pub fn clamped(self) -> Rgb {
        Rgb {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }
}

fn channel_to_byte(c: f64) -> u8 {
    (finite_or_zero(c).clamp(0.0, 1.0) * 255.0).round() as u8
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Wraps a hue angle into [0, 360). Non-finite input maps to 0.
pub fn normalize_hue(h: f64) -> f64 {
    let h = finite_or_zero(h).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Applies the inverse sRGB transfer curve to one component.
///
/// Display-P3 shares this curve. Negative inputs stay on the linear segment.
fn decode_component(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Applies the sRGB transfer curve to one linear component.
fn encode_component(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Converts gamma-encoded RGB to linear RGB.
pub fn decode_rgb(c: Rgb) -> LinearRgb {
    LinearRgb {
        r: decode_component(c.r),
        g: decode_component(c.g),
        b: decode_component(c.b),
    }
}

/// Converts linear RGB to gamma-encoded RGB.
pub fn encode_rgb(c: LinearRgb) -> Rgb {
    Rgb {
        r: encode_component(c.r),
        g: encode_component(c.g),
        b: encode_component(c.b),
    }
}

/// Converts linear sRGB to OKLab via the OKLab matrix transform.
pub fn linear_srgb_to_oklab(c: LinearRgb) -> OkLab {
    let l_ = 0.4122214708 * c.r + 0.5363325363 * c.g + 0.0514459929 * c.b;
    let m_ = 0.2119034982 * c.r + 0.6806995451 * c.g + 0.1073969566 * c.b;
    let s_ = 0.0883024619 * c.r + 0.2817188376 * c.g + 0.6299787005 * c.b;

    let l_c = l_.cbrt();
    let m_c = m_.cbrt();
    let s_c = s_.cbrt();

    OkLab {
        l: 0.2104542553 * l_c + 0.7936177850 * m_c - 0.0040720468 * s_c,
        a: 1.9779984951 * l_c - 2.4285922050 * m_c + 0.4505937099 * s_c,
        b: 0.0259040371 * l_c + 0.7827717662 * m_c - 0.8086757660 * s_c,
    }
}

/// Converts OKLab to linear sRGB via the inverse OKLab matrix transform.
pub fn oklab_to_linear_srgb(c: OkLab) -> LinearRgb {
    let l_ = c.l + 0.3963377774 * c.a + 0.2158037573 * c.b;
    let m_ = c.l - 0.1055613458 * c.a - 0.0638541728 * c.b;
    let s_ = c.l - 0.0894841775 * c.a - 1.2914855480 * c.b;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    LinearRgb {
        r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    }
}

// Linear sRGB -> XYZ (D65) -> linear Display-P3, folded into one matrix.
#[rustfmt::skip]
const LINEAR_SRGB_TO_LINEAR_P3: [[f64; 3]; 3] = [
    [0.8224619687143621, 0.1775380312856376, 0.0000000000000000],
    [0.0331941988509616, 0.9668058011490382, 0.0000000000000000],
    [0.0170826307211200, 0.0723974406639634, 0.9105199286149166],
];

/// Re-expresses a linear sRGB color with Display-P3 primaries.
pub fn linear_srgb_to_linear_p3(c: LinearRgb) -> LinearRgb {
    let m = &LINEAR_SRGB_TO_LINEAR_P3;
    LinearRgb {
        r: m[0][0] * c.r + m[0][1] * c.g + m[0][2] * c.b,
        g: m[1][0] * c.r + m[1][1] * c.g + m[1][2] * c.b,
        b: m[2][0] * c.r + m[2][1] * c.g + m[2][2] * c.b,
    }
}

/// Converts OKLab to OKLCh (cylindrical form).
///
/// NaN guard: if chroma is less than 1e-10, hue is set to 0.0 to avoid
/// indeterminate `atan2(0, 0)` results.
pub fn oklab_to_oklch(c: OkLab) -> OkLch {
    let ch = (c.a * c.a + c.b * c.b).sqrt();
    let h = if ch < 1e-10 {
        0.0
    } else {
        normalize_hue(c.b.atan2(c.a).to_degrees())
    };
    OkLch { l: c.l, c: ch, h }
}

/// Converts OKLCh to OKLab.
pub fn oklch_to_oklab(c: OkLch) -> OkLab {
    let h_rad = c.h.to_radians();
    OkLab {
        l: c.l,
        a: c.c * h_rad.cos(),
        b: c.c * h_rad.sin(),
    }
}

/// Convenience: sRGB to OKLCh via the chain sRGB -> linear -> OKLab -> OKLCh.
pub fn srgb_to_oklch(c: Rgb) -> OkLch {
    oklab_to_oklch(linear_srgb_to_oklab(decode_rgb(c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn lin(r: f64, g: f64, b: f64) -> LinearRgb {
        LinearRgb { r, g, b }
    }

    #[test]
    fn decode_boundary_at_0_04045() {
        let lin = decode_rgb(Rgb {
            r: 0.04045,
            g: 0.0,
            b: 0.0,
        });
        assert!(approx_eq(lin.r, 0.04045 / 12.92));

        let above = decode_rgb(Rgb {
            r: 0.04046,
            g: 0.0,
            b: 0.0,
        });
        let expected = ((0.04046 + 0.055) / 1.055_f64).powf(2.4);
        assert!(approx_eq(above.r, expected));
    }

    #[test]
    fn encode_keeps_sign_of_negative_channels() {
        let rgb = encode_rgb(lin(-0.01, 0.5, 1.2));
        assert!(rgb.r < 0.0, "negative linear channel must stay negative");
        assert!(rgb.b > 1.0, "overflowing channel must stay above 1");
    }

    #[test]
    fn white_in_oklab_has_l_near_one_and_zero_chroma() {
        let lab = linear_srgb_to_oklab(lin(1.0, 1.0, 1.0));
        assert!(approx_eq(lab.l, 1.0), "expected L~1.0, got {}", lab.l);
        assert!(approx_eq(lab.a, 0.0), "expected a~0.0, got {}", lab.a);
        assert!(approx_eq(lab.b, 0.0), "expected b~0.0, got {}", lab.b);
    }

    #[test]
    fn oklab_linear_round_trip_primaries() {
        for primary in [lin(1.0, 0.0, 0.0), lin(0.0, 1.0, 0.0), lin(0.0, 0.0, 1.0)] {
            let back = oklab_to_linear_srgb(linear_srgb_to_oklab(primary));
            assert!(approx_eq(back.r, primary.r), "r: {}", back.r);
            assert!(approx_eq(back.g, primary.g), "g: {}", back.g);
            assert!(approx_eq(back.b, primary.b), "b: {}", back.b);
        }
    }

    #[test]
    fn white_keeps_unit_channels_in_p3() {
        let p3 = linear_srgb_to_linear_p3(lin(1.0, 1.0, 1.0));
        assert!(approx_eq(p3.r, 1.0), "r: {}", p3.r);
        assert!(approx_eq(p3.g, 1.0), "g: {}", p3.g);
        assert!(approx_eq(p3.b, 1.0), "b: {}", p3.b);
    }

    #[test]
    fn srgb_red_sits_inside_p3() {
        let p3 = linear_srgb_to_linear_p3(lin(1.0, 0.0, 0.0));
        assert!(p3.r < 1.0 && p3.g > 0.0 && p3.b > 0.0, "{p3:?}");
    }

    #[test]
    fn oklch_pure_red_has_hue_near_29_degrees() {
        let lch = srgb_to_oklch(Rgb {
            r: 1.0,
            g: 0.0,
            b: 0.0,
        });
        assert!((lch.h - 29.2).abs() < 1.0, "expected red hue ~29.2, got {}", lch.h);
        assert!(lch.c > 0.0, "expected positive chroma for red");
    }

    #[test]
    fn oklch_nan_guard_zero_chroma_sets_hue_to_zero() {
        let lch = oklab_to_oklch(OkLab {
            l: 0.5,
            a: 0.0,
            b: 0.0,
        });
        assert_eq!(lch.h, 0.0, "achromatic color should have hue=0");
        assert!(!lch.h.is_nan(), "hue must not be NaN");
    }

    #[test]
    fn oklch_oklab_round_trip() {
        let original = OkLch::new(0.7, 0.15, 250.0);
        let back = oklab_to_oklch(oklch_to_oklab(original));
        assert!(approx_eq(back.l, original.l));
        assert!(approx_eq(back.c, original.c));
        assert!(approx_eq(back.h, original.h));
    }

    #[test]
    fn normalized_clamps_and_wraps() {
        let n = OkLch::new(1.3, 0.9, -30.0).normalized();
        assert_eq!(n.l, 1.0);
        assert_eq!(n.c, C_MAX_DISPLAY);
        assert!(approx_eq(n.h, 330.0));

        let nan = OkLch::new(f64::NAN, -0.1, f64::INFINITY).normalized();
        assert_eq!(nan, OkLch::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn normalize_hue_never_returns_360() {
        assert_eq!(normalize_hue(-1e-15), 0.0);
        assert_eq!(normalize_hue(720.0), 0.0);
    }

    #[test]
    fn from_hex_parses_and_rejects() {
        let red = Rgb::from_hex("#ff0000").unwrap();
        assert!(approx_eq(red.r, 1.0) && approx_eq(red.g, 0.0));
        let upper = Rgb::from_hex("C0FFEE").unwrap();
        assert_eq!(upper.to_hex(), "#c0ffee");

        assert!(Rgb::from_hex("#gggggg").is_err());
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("#ff00ff00").is_err());
        assert!(Rgb::from_hex("#ffé0f").is_err());
    }

    #[test]
    fn to_hex_clamps_out_of_range() {
        let color = Rgb {
            r: 1.5,
            g: -0.1,
            b: 0.5,
        };
        assert_eq!(color.to_hex(), "#ff0080");
    }

    #[test]
    fn oklch_from_hex_white_and_black() {
        let white = OkLch::from_hex("#ffffff").unwrap();
        assert!(approx_eq(white.l, 1.0) && white.c < 1e-6);
        let black = OkLch::from_hex("#000000").unwrap();
        assert!(approx_eq(black.l, 0.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hue_wrap_is_idempotent(
                l in 0.0_f64..=1.0,
                c in 0.0_f64..=0.4,
                h in -720.0_f64..720.0,
            ) {
                let a = OkLch::new(l, c, h).normalized();
                let b = OkLch::new(l, c, h + 360.0).normalized();
                prop_assert!((a.h - b.h).abs() < 1e-9 || (a.h - b.h).abs() > 360.0 - 1e-9,
                    "{} vs {}", a.h, b.h);
                prop_assert_eq!(a.l, b.l);
                prop_assert_eq!(a.c, b.c);
                prop_assert!(a.h >= 0.0 && a.h < 360.0);
            }

            #[test]
            fn encode_decode_round_trip(
                r in 0.0_f64..=1.0,
                g in 0.0_f64..=1.0,
                b in 0.0_f64..=1.0,
            ) {
                let original = Rgb { r, g, b };
                let back = encode_rgb(decode_rgb(original));
                prop_assert!((back.r - r).abs() < 1e-10);
                prop_assert!((back.g - g).abs() < 1e-10);
                prop_assert!((back.b - b).abs() < 1e-10);
            }

            #[test]
            fn oklch_hue_is_never_nan(
                l in 0.0_f64..=1.0,
                a in -0.5_f64..=0.5,
                b_val in -0.5_f64..=0.5,
            ) {
                let lch = oklab_to_oklch(OkLab { l, a, b: b_val });
                prop_assert!(!lch.h.is_nan(), "hue is NaN for a={a}, b={b_val}");
                prop_assert!(lch.h >= 0.0 && lch.h < 360.0);
            }
        }
    }
}
