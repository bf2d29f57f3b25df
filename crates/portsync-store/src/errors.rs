//! Error handling for portsync-store
//!
//! Wraps portsync-core ExError with path-aware helpers

use std::path::Path;

use portsync_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error; a missing file maps to `NotFound`
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    let kind = match err.kind() {
        std::io::ErrorKind::NotFound => ExErrorKind::NotFound,
        _ => ExErrorKind::Io,
    };
    ExError::new(kind)
        .with_op(operation.to_string())
        .with_resource(path.display().to_string())
        .with_message(err.to_string())
}

/// Re-tag a decode failure with the file it came from
pub fn parse_error(operation: &str, path: &Path, err: ExError) -> ExError {
    let message = err.message().to_string();
    err.with_op(operation.to_string())
        .with_resource(path.display().to_string())
        .with_message(message)
}
