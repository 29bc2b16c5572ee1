//! Progress error types

use thiserror::Error;

/// Errors that can occur while evaluating, rendering or splicing progress data
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("Unsupported progress data version {found}, please update the progress file to version {minimum} or higher")]
    UnsupportedVersion { found: u32, minimum: u32 },

    #[error("Content split at '{marker}' didn't match exactly once (found {count} occurrences)")]
    MarkerMismatch { marker: String, count: usize },

    #[error("Invalid submission date '{value}' for exercise {exercise}")]
    InvalidDate { exercise: String, value: String },

    #[error("Invalid progress data: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProgressError {
    /// Check if this error was caused by the target document rather than the progress data
    pub fn is_document_error(&self) -> bool {
        matches!(self, ProgressError::MarkerMismatch { .. })
    }
}

/// Result alias for progress operations
pub type Result<T> = std::result::Result<T, ProgressError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_version_message_names_minimum() {
        let err = ProgressError::UnsupportedVersion { found: 3, minimum: 5 };
        let msg = err.to_string();
        assert!(msg.contains("version 3"));
        assert!(msg.contains("version 5 or higher"));
    }

    #[test]
    fn test_marker_mismatch_message_names_marker() {
        let err = ProgressError::MarkerMismatch {
            marker: "[//]: # (Progress X begin)".to_string(),
            count: 0,
        };
        assert!(err.to_string().contains("[//]: # (Progress X begin)"));
        assert!(err.is_document_error());
    }

    #[test]
    fn test_json_error_is_not_document_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ProgressError::from(json_err);
        assert!(!err.is_document_error());
        assert!(err.to_string().starts_with("Invalid progress data"));
    }
}
