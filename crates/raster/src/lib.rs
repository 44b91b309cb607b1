#![deny(unsafe_code)]
//! Plane sampling and raster rendering for the chroma-plane picker engine.
//!
//! This crate sits between `chroma-plane-core` (color math and picker state)
//! and the UI shells that consume it. A shell calls [`sample`] on pointer
//! events and [`render`] whenever the state changes; the RGBA buffer in a
//! [`Raster`] uploads directly to a texture or canvas bitmap.

pub mod render;
pub mod sampler;

#[cfg(feature = "png")]
pub mod snapshot;

pub use render::{effective_resolution, render, Raster, DIMMED_ALPHA};
pub use sampler::{sample, sample_with_lc, PickerSample};
