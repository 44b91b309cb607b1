//! PNG snapshot of a rendered [`Raster`].
//!
//! Feature-gated behind `png` (default on) so embedders that upload the RGBA
//! buffer straight to a texture do not pull in the `image` crate.

use chroma_plane_core::error::PickerError;
use std::path::Path;

use crate::render::Raster;

/// Writes `raster` as an RGBA PNG, keeping transparent and dimmed pixels.
///
/// Returns `PickerError::InvalidDimensions` if the raster dimensions overflow
/// `u32`, or `PickerError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), PickerError> {
    let w = u32::try_from(raster.width).map_err(|_| PickerError::InvalidDimensions)?;
    let h = u32::try_from(raster.height).map_err(|_| PickerError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, raster.rgba.clone())
        .ok_or_else(|| PickerError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| PickerError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use chroma_plane_core::state::{Mode, PickerState, Plane};

    #[test]
    fn write_png_round_trip() {
        let mut state = PickerState::default();
        state.set_plane(Plane::HcAtL).set_mode(Mode::Shape);
        let raster = render(&state);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plane.png");

        write_png(&raster, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 256);
        assert_eq!(img.height(), 256);
        assert_eq!(img.into_raw(), raster.rgba);
    }

    #[test]
    fn write_png_rejects_short_buffer() {
        let raster = Raster {
            width: 4,
            height: 4,
            rgba: vec![0; 8],
            effective_resolution: 4,
            apca_pass_ratio: None,
        };
        let dir = tempfile::tempdir().unwrap();
        let err = write_png(&raster, &dir.path().join("bad.png")).unwrap_err();
        assert!(matches!(err, PickerError::Io(_)));
    }

    #[test]
    fn write_png_reports_unwritable_path() {
        let mut state = PickerState::default();
        state.set_plane(Plane::AhAtC);
        let raster = render(&state);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("plane.png");
        assert!(matches!(write_png(&raster, &path), Err(PickerError::Io(_))));
    }
}
