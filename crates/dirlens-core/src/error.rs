//! Error and warning types for scanning and hashing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors raised by the scan and analysis stages.
///
/// Everything else that can go wrong mid-scan (an entry vanishing between
/// discovery and stat, a permission race) is recovered locally by skipping
/// the entry and recording a [`ScanWarning`].
#[derive(Debug, Error)]
pub enum ScanError {
    /// The supplied root does not exist or is not a directory.
    /// Raised before any traversal begins.
    #[error("invalid root {}: not an existing directory", .path.display())]
    InvalidRoot { path: PathBuf },

    /// A file could not be fully read while hashing.
    #[error("cannot read {}: {source}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Entry disappeared between discovery and stat.
    NotFound,
    /// Error reading a directory entry.
    ReadError,
    /// Error reading metadata.
    MetadataError,
}

/// Non-fatal warning recorded when an entry is skipped during a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Warning for a failed metadata lookup, classified by I/O error kind.
    pub fn metadata_error(path: impl Into<PathBuf>, kind: std::io::ErrorKind, message: &str) -> Self {
        let warning_kind = match kind {
            std::io::ErrorKind::PermissionDenied => WarningKind::PermissionDenied,
            std::io::ErrorKind::NotFound => WarningKind::NotFound,
            _ => WarningKind::MetadataError,
        };
        Self::new(path, message, warning_kind)
    }

    /// Warning for a directory entry that could not be read.
    pub fn read_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningKind::ReadError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_root_message() {
        let err = ScanError::InvalidRoot {
            path: PathBuf::from("/no/such/dir"),
        };
        assert!(err.to_string().contains("/no/such/dir"));
    }

    #[test]
    fn test_metadata_warning_classification() {
        let denied = ScanWarning::metadata_error("/p", std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(denied.kind, WarningKind::PermissionDenied);

        let gone = ScanWarning::metadata_error("/p", std::io::ErrorKind::NotFound, "gone");
        assert_eq!(gone.kind, WarningKind::NotFound);

        let other = ScanWarning::metadata_error("/p", std::io::ErrorKind::Other, "odd");
        assert_eq!(other.kind, WarningKind::MetadataError);
    }
}
