//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`],
//! and the JSON body printed for a failed command.

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind as Io;

        let kind = match err.kind() {
            Io::NotFound => ErrorKind::NotFound,
            Io::PermissionDenied => ErrorKind::PermissionDenied,
            Io::TimedOut | Io::Interrupted | Io::WouldBlock => ErrorKind::TemporaryFailure,
            _ => ErrorKind::Io,
        };
        AppError::new(kind, format!("I/O operation failed: {err}")).with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            AppError::new(ErrorKind::Io, "Could not write JSON output").with_source(err)
        } else {
            AppError::invalid_input(format!("Malformed JSON: {err}")).with_source(err)
        }
    }
}

// ============================================================================
// Machine-readable output
// ============================================================================

impl AppError {
    /// Body printed in JSON output mode
    ///
    /// ```rust
    /// use kernel::error::app_error::AppError;
    /// let body = AppError::config("Radius must not be negative").to_json();
    /// assert_eq!(body["exitCode"], 78);
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.kind().as_str(),
            "exitCode": self.exit_code(),
            "message": self.message(),
            "action": self.action(),
        })
    }
}
