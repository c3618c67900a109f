use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a run. Per-group and per-check problems are not errors
/// here: they are recorded on the scan results and the run carries on.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("target list '{}' could not be read: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target list '{}' contains no resource groups", path.display())]
    EmptyInput { path: PathBuf },

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("a look-back of {days} days plus {buffer_hours}h reaches past the earliest supported date")]
    WindowOutOfRange { days: u32, buffer_hours: u32 },

    #[error("no checks were requested")]
    NoChecks,

    #[error("unknown check '{0}' (expected one of: resources, deployments, activity)")]
    UnknownCheck(String),

    #[error("'{program}' failed: {message}")]
    Command { program: String, message: String },

    #[error("'{program}' did not finish within {seconds}s")]
    CommandTimedOut { program: String, seconds: u64 },

    #[error("failed to write report '{}': {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScanError>;
