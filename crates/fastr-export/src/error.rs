//! Export error types.

use thiserror::Error;

/// Receipt export errors.
///
/// Either variant leaves the cart untouched; the caller decides whether to
/// retry.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Directory creation, open, write or flush failed.
    #[error("Receipt export I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded.
    #[error("Receipt CSV encoding failed: {0}")]
    Csv(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => ExportError::Io(io),
                other => ExportError::Csv(format!("{:?}", other)),
            }
        } else {
            ExportError::Csv(err.to_string())
        }
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_io_error_unwraps_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: ExportError = csv::Error::from(io).into();
        assert!(matches!(err, ExportError::Io(ref e) if e.kind() == std::io::ErrorKind::PermissionDenied));
    }
}
