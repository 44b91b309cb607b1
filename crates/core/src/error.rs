//! Error types for the chroma-plane core.
//!
//! The color math itself never fails; these errors only surface at the
//! configuration and I/O boundaries.

use thiserror::Error;

/// Errors produced while building a picker state or writing its output.
#[derive(Debug, Error)]
pub enum PickerError {
    /// A raster's dimensions could not be represented by the output format.
    #[error("invalid dimensions: raster does not fit the output image")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A plane name was not recognized.
    #[error("unknown plane: {0}")]
    UnknownPlane(String),

    /// A mode name was not recognized.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// A gamut name was not recognized.
    #[error("unknown gamut: {0}")]
    UnknownGamut(String),

    /// Writing an output file failed.
    #[error("I/O error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = format!("{}", PickerError::InvalidDimensions);
        assert!(msg.contains("dimensions"), "got: {msg}");
    }

    #[test]
    fn invalid_color_includes_message() {
        let err = PickerError::InvalidColor("bad hex".into());
        let msg = format!("{err}");
        assert!(msg.contains("bad hex"), "missing message in: {msg}");
    }

    #[test]
    fn unknown_names_include_the_offending_name() {
        let cases = [
            PickerError::UnknownPlane("XY_at_Z".into()),
            PickerError::UnknownMode("XY_at_Z".into()),
            PickerError::UnknownGamut("XY_at_Z".into()),
        ];
        for err in cases {
            let msg = format!("{err}");
            assert!(msg.contains("XY_at_Z"), "missing name in: {msg}");
        }
    }

    #[test]
    fn io_includes_message() {
        let msg = format!("{}", PickerError::Io("disk full".into()));
        assert!(msg.contains("disk full"), "got: {msg}");
    }

    #[test]
    fn picker_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PickerError>();
    }

    #[test]
    fn picker_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<PickerError>();
    }
}
