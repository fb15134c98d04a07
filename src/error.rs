//! Error types for the bmi-tracker library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the bmi-tracker application.
#[derive(Error, Debug)]
pub enum BmiError {
    /// The storage file exists but could not be parsed into records
    #[error("Storage file {path} is corrupt: {reason}")]
    StorageCorrupt {
        /// Path of the storage file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// The storage file exists but could not be read
    #[error("Storage file {path} exists but cannot be read: {source}")]
    StorageUnreadable {
        /// Path of the storage file
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// Submission rejected before reaching the record store
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for Result with `BmiError`
pub type Result<T> = std::result::Result<T, BmiError>;

impl BmiError {
    /// Create a storage corruption error for `path`.
    #[must_use]
    pub fn storage_corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::StorageCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Check if this error means the submission was rejected.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this error means the storage file could not be parsed.
    #[must_use]
    pub const fn is_storage_corrupt(&self) -> bool {
        matches!(self, Self::StorageCorrupt { .. })
    }
}

impl From<config::ConfigError> for BmiError {
    fn from(err: config::ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_corrupt_display() {
        let err = BmiError::storage_corrupt("/tmp/bmi_data.csv", "bad header");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/bmi_data.csv"));
        assert!(msg.contains("bad header"));
        assert!(err.is_storage_corrupt());
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_storage_unreadable_display() {
        let err = BmiError::StorageUnreadable {
            path: PathBuf::from("/tmp/bmi_data.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/bmi_data.csv"));
        assert!(msg.contains("access denied"));
        assert!(!err.is_storage_corrupt());
    }

    #[test]
    fn test_invalid_input_display() {
        let err = BmiError::invalid_input("Name cannot be empty");
        assert_eq!(err.to_string(), "Invalid input: Name cannot be empty");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BmiError = io_err.into();
        assert!(matches!(err, BmiError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> = serde_json::from_str("nope");
        if let Err(json_err) = json_result {
            let err: BmiError = json_err.into();
            assert!(matches!(err, BmiError::Serialization(_)));
        }
    }
}
