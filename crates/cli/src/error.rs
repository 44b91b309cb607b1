//! CLI errors and their process exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: picker configuration error (unknown plane, mode or gamut; thread pool)
//! - 11: I/O error (PNG write)
//! - 12: input error (bad hex color, bad `--state` JSON)
//! - 13: serialization error

use chroma_plane_core::PickerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// The requested picker state names something that does not exist.
    #[error(transparent)]
    Config(PickerError),

    #[error("failed to configure render threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Writing the rendered plane failed.
    #[error("snapshot failed: {0}")]
    Snapshot(String),

    #[error("invalid --state JSON: {0}")]
    StateJson(serde_json::Error),

    /// A hex color argument or `apca_bg` value did not parse.
    #[error(transparent)]
    Color(PickerError),

    #[error("failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::ThreadPool(_) => 10,
            CliError::Snapshot(_) => 11,
            CliError::StateJson(_) | CliError::Color(_) => 12,
            CliError::Output(_) => 13,
        }
    }

    /// Short machine-readable category for `--json` error reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::Config(_) => "config",
            CliError::ThreadPool(_) => "thread-pool",
            CliError::Snapshot(_) => "snapshot",
            CliError::StateJson(_) => "state-json",
            CliError::Color(_) => "color",
            CliError::Output(_) => "output",
        }
    }
}

impl From<PickerError> for CliError {
    fn from(e: PickerError) -> Self {
        match e {
            PickerError::Io(msg) => CliError::Snapshot(msg),
            e @ PickerError::InvalidColor(_) => CliError::Color(e),
            other => CliError::Config(other),
        }
    }
}
