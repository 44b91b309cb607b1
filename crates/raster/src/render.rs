//! Raster renderer: evaluates the active plane over a square grid and packs
//! the result into an RGBA8 buffer.
//!
//! Rows are independent, so they are filled in parallel when the `parallel`
//! feature is on. The only cross-pixel state is the max-chroma cache and the
//! APCA pass counters, both of which reduce cleanly per row.

use chroma_plane_core::apca::{contrast_with_bg_y, precompute_bg_y};
use chroma_plane_core::chroma::max_chroma;
use chroma_plane_core::color::{normalize_hue, OkLch};
use chroma_plane_core::gamut::{in_gamut, to_gamut_rgb};
use chroma_plane_core::state::{Mode, PickerState, Plane};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::sampler::{plane_point, PlanePoint};

/// Alpha for pixels that are in gamut but fail the active mode's rule.
pub const DIMMED_ALPHA: u8 = 48;

const MAX_CHROMA_CAP: usize = 256;
const APCA_MODE_CAP: usize = 192;
const APCA_PLANE_CAP: usize = 96;

/// A rendered plane: tightly packed RGBA8, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
    pub effective_resolution: usize,
    /// Share of evaluated pixels meeting the lowest APCA target; only set for
    /// standard planes in APCA mode.
    pub apca_pass_ratio: Option<f64>,
}

impl Raster {
    /// RGBA of the pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Grid size actually rendered for `state`, capped by per-pixel cost.
pub fn effective_resolution(state: &PickerState) -> usize {
    let requested = state.resolution() as usize;
    if !state.plane().is_standard() {
        return requested.min(APCA_PLANE_CAP);
    }
    match state.mode() {
        Mode::Shape => requested,
        Mode::MaxChroma => requested.min(MAX_CHROMA_CAP),
        Mode::Apca => requested.min(APCA_MODE_CAP),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PassCount {
    passing: u64,
    total: u64,
}

impl PassCount {
    fn merge(self, other: PassCount) -> PassCount {
        PassCount {
            passing: self.passing + other.passing,
            total: self.total + other.total,
        }
    }
}

/// Read-only inputs shared by every row job.
struct Frame<'a> {
    state: &'a PickerState,
    size: usize,
    bg_y: f64,
    min_target: Option<f64>,
    /// Max chroma per column, filled for `HC_at_L` in max-chroma mode.
    column_max: Vec<f64>,
}

/// Position of grid index `i` along a `size`-cell axis, in [0, 1].
fn axis(i: usize, size: usize) -> f64 {
    if size > 1 {
        i as f64 / (size - 1) as f64
    } else {
        0.0
    }
}

impl<'a> Frame<'a> {
    /// Per-render inputs for `state`, including the column cache when the
    /// plane and mode need one.
    fn new(state: &'a PickerState) -> Self {
        let size = effective_resolution(state);
        let gamut = state.gamut();
        let column_max = if state.plane() == Plane::HcAtL && state.mode() == Mode::MaxChroma {
            (0..size)
                .map(|x| max_chroma(state.l(), normalize_hue(axis(x, size) * 360.0), gamut))
                .collect()
        } else {
            Vec::new()
        };
        Frame {
            state,
            size,
            bg_y: precompute_bg_y(state.apca_bg(), gamut),
            min_target: state.min_apca_target(),
            column_max,
        }
    }

    fn axis(&self, i: usize) -> f64 {
        axis(i, self.size)
    }

    fn fill_row(&self, y: usize, row: &mut [u8]) -> PassCount {
        let state = self.state;
        let v = 1.0 - self.axis(y);
        let dims_by_chroma = state.mode() == Mode::MaxChroma;
        let row_max = (dims_by_chroma && state.plane() == Plane::LcAtH)
            .then(|| max_chroma(v, state.h(), state.gamut()));

        let mut counts = PassCount::default();
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let u = self.axis(x);
            let color = match plane_point(u, v, state) {
                PlanePoint::Direct(color) => color,
                PlanePoint::Solved { color, .. } => {
                    // The contrast axis is the plane itself; no secondary dimming.
                    match color {
                        Some(color) => write_opaque(px, color, state),
                        None => px.copy_from_slice(&[0, 0, 0, 0]),
                    }
                    continue;
                }
            };

            let rgb = to_gamut_rgb(color, state.gamut());
            if !in_gamut(rgb) {
                px.copy_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            let [r, g, b] = rgb.to_bytes();
            px.copy_from_slice(&[r, g, b, 255]);

            match state.mode() {
                Mode::Shape => {}
                Mode::MaxChroma => {
                    let c_max = match (state.plane(), row_max) {
                        (Plane::HcAtL, _) => self.column_max[x],
                        (_, Some(c_max)) => c_max,
                        _ => max_chroma(color.l, color.h, state.gamut()),
                    };
                    let ratio = if c_max > 0.0 { color.c / c_max } else { 1.0 };
                    if ratio < state.max_chroma_threshold() {
                        px[3] = DIMMED_ALPHA;
                    }
                }
                Mode::Apca => {
                    let lc = contrast_with_bg_y(color, self.bg_y, state.gamut());
                    counts.total += 1;
                    if self.min_target.map_or(true, |t| lc >= t) {
                        counts.passing += 1;
                    } else {
                        px[3] = DIMMED_ALPHA;
                    }
                }
            }
        }
        counts
    }
}

fn write_opaque(px: &mut [u8], color: OkLch, state: &PickerState) {
    let [r, g, b] = to_gamut_rgb(color, state.gamut()).to_bytes();
    px.copy_from_slice(&[r, g, b, 255]);
}

/// Renders the active plane of `state`.
///
/// Pixel `(x, y)` samples `u = x / (w - 1)` and `v = 1 - y / (h - 1)`, so the
/// top row holds the high end of the `v` axis. Out-of-gamut and unsolvable
/// pixels are fully transparent.
pub fn render(state: &PickerState) -> Raster {
    let frame = Frame::new(state);
    let size = frame.size;
    let gamut = state.gamut();

    let mut rgba = vec![0u8; size * size * 4];
    let row_bytes = (size * 4).max(1);

    #[cfg(feature = "parallel")]
    let counts = rgba
        .par_chunks_mut(row_bytes)
        .enumerate()
        .map(|(y, row)| frame.fill_row(y, row))
        .reduce(PassCount::default, PassCount::merge);
    #[cfg(not(feature = "parallel"))]
    let counts = rgba
        .chunks_mut(row_bytes)
        .enumerate()
        .map(|(y, row)| frame.fill_row(y, row))
        .fold(PassCount::default(), PassCount::merge);

    let apca_pass_ratio = (state.plane().is_standard() && state.mode() == Mode::Apca).then(|| {
        if counts.total == 0 {
            0.0
        } else {
            counts.passing as f64 / counts.total as f64
        }
    });

    debug!(
        plane = %state.plane(),
        mode = %state.mode(),
        %gamut,
        requested = state.resolution(),
        effective = size,
        ?apca_pass_ratio,
        "rendered picker plane"
    );

    Raster {
        width: size,
        height: size,
        rgba,
        effective_resolution: size,
        apca_pass_ratio,
    }
}
