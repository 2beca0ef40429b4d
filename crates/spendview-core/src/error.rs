//! Error types for spendview-core
//!
//! The fetch layer's "no data right now" (`Ok(None)`) outcome is not an
//! error and never reaches this module; stores absorb it by keeping their
//! prior state.

use serde::{Deserialize, Serialize};
use spendview_source::SourceError;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Load-more requested while the employee-filtered feed is active
    LoadMoreUnavailable,
    /// Data source error
    SourceError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::LoadMoreUnavailable => write!(f, "LOAD_MORE_UNAVAILABLE"),
            ErrorCode::SourceError => write!(f, "SOURCE_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation was refused, state untouched
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            suggestions: vec![],
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for spendview-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Load more is unavailable while an employee filter is active")]
    LoadMoreUnavailable,

    #[error("Data source error: {0}")]
    Source(#[from] SourceError),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::LoadMoreUnavailable => ErrorCode::LoadMoreUnavailable,
            CoreError::Source(_) => ErrorCode::SourceError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::LoadMoreUnavailable => ErrorSeverity::Warning,
            CoreError::Source(SourceError::UnknownEmployee { .. }) => ErrorSeverity::Info,
            CoreError::Source(SourceError::UnknownTransaction { .. }) => ErrorSeverity::Info,
            CoreError::Source(_) => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::LoadMoreUnavailable => {
                details = details.with_suggestion(
                    "Switch back to the all-employees feed to page through further transactions."
                        .to_string(),
                );
            }
            CoreError::Source(SourceError::UnknownEmployee { id }) => {
                details = details.with_suggestion(format!(
                    "Check that employee '{}' exists; the /api/employees endpoint lists the roster.",
                    id
                ));
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(
            ErrorCode::LoadMoreUnavailable.to_string(),
            "LOAD_MORE_UNAVAILABLE"
        );
        assert_eq!(ErrorCode::SourceError.to_string(), "SOURCE_ERROR");
    }

    #[test]
    fn test_core_error_code() {
        assert_eq!(
            CoreError::LoadMoreUnavailable.code(),
            ErrorCode::LoadMoreUnavailable
        );

        let error = CoreError::Source(SourceError::UnknownEmployee {
            id: "7".to_string(),
        });
        assert_eq!(error.code(), ErrorCode::SourceError);
    }

    #[test]
    fn test_core_error_severity() {
        assert_eq!(
            CoreError::LoadMoreUnavailable.severity(),
            ErrorSeverity::Warning
        );
        assert_eq!(
            CoreError::Source(SourceError::UnknownEmployee {
                id: "7".to_string()
            })
            .severity(),
            ErrorSeverity::Info
        );
        assert_eq!(
            CoreError::Source(SourceError::InvalidDataset {
                message: "bad".to_string()
            })
            .severity(),
            ErrorSeverity::Error
        );
    }

    #[test]
    fn test_error_details_load_more() {
        let details = CoreError::LoadMoreUnavailable.to_details();
        assert_eq!(details.code, ErrorCode::LoadMoreUnavailable);
        assert!(!details.suggestions.is_empty());
        assert!(details.to_string().contains("LOAD_MORE_UNAVAILABLE"));
    }

    #[test]
    fn test_error_details_unknown_employee() {
        let error = CoreError::Source(SourceError::UnknownEmployee {
            id: "7".to_string(),
        });
        let details = error.to_details();
        assert!(details.message.contains("7"));
        assert!(details.suggestions[0].contains("/api/employees"));
    }
}
