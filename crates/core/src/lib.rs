#![deny(unsafe_code)]
//! Core color math for the chroma-plane color picker engine.
//!
//! Provides OKLCH color types and conversions (`OkLch`, `OkLab`, `Rgb`),
//! gamut testing against sRGB and Display-P3 (`Gamut`), the max-chroma
//! solver, the APCA contrast engine, the contrast-target solver, and the
//! `PickerState` configuration shared by the sampler and renderer.
//!
//! Every color function is pure and total: out-of-gamut is a flag, not an
//! error.

pub mod apca;
pub mod chroma;
pub mod color;
pub mod error;
pub mod gamut;
pub mod params;
pub mod solver;
pub mod state;

pub use apca::{contrast, contrast_with_bg_y, precompute_bg_y, relative_luminance};
pub use chroma::max_chroma;
pub use color::{OkLab, OkLch, Rgb, C_MAX_DISPLAY};
pub use error::PickerError;
pub use gamut::{clamp_to_bytes, display_css, in_gamut, to_gamut_rgb, to_hex, Gamut};
pub use solver::{solve_for_target, solve_for_target_in, SearchDirection};
pub use state::{Mode, PickerState, Plane};
