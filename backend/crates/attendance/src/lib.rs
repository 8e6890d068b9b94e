//! Classroom QR Attendance Module
//!
//! Clean Architecture structure:
//! - `domain/` - Geofence math, token shape, countdown and scan latch state machines, device ports
//! - `application/` - Use cases (issue token, countdown runner, scan, verify, theme)
//! - `infra/` - Device adapters (image-file camera, QR decoder, fixed location)
//! - `presentation/` - Status messages and JSON DTOs
//!
//! ## Trust Model
//! - The token is a fixed prefix plus an issue timestamp; it carries no signature
//! - Location is whatever the device reports; spoofed positions are accepted
//! - Countdown expiry only hides the code on the issuing side

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AttendanceConfig;
pub use application::countdown::{CountdownHandle, start_countdown};
pub use application::issue_token::{IssueTokenOutput, IssueTokenUseCase};
pub use application::scan_attendance::{ScanAttendanceUseCase, ScanOutcome};
pub use application::theme_preference::ThemePreferenceUseCase;
pub use application::verify_attendance::VerifyAttendanceUseCase;
pub use domain::entities::{DeviceFailure, InvalidReason, RejectReason, VerificationOutcome};
pub use domain::value_objects::{ClassroomConfig, GeoCoordinate, TokenPrefix};
pub use error::{AttendanceError, AttendanceResult};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult, OptionExt, ResultExt},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
