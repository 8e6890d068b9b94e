//! Attendance Error Types
//!
//! This module provides attendance-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use crate::domain::entities::{DeviceFailure, InvalidReason, VerificationOutcome};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::kv_store::StoreError;
use platform::qr::QrError;
use std::fmt;
use thiserror::Error;

/// Attendance-specific result type alias
pub type AttendanceResult<T> = Result<T, AttendanceError>;

/// Device a permission was refused for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Camera,
    Location,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Camera => f.write_str("camera"),
            Device::Location => f.write_str("location"),
        }
    }
}

/// Attendance-specific error variants
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// Camera or location permission refused
    #[error("Permission denied: {0}")]
    PermissionDenied(Device),

    /// Scanned text does not carry the token prefix
    #[error("Malformed token")]
    MalformedToken,

    /// No geolocation capability on this device
    #[error("Device unsupported: {0}")]
    DeviceUnsupported(&'static str),

    /// Location fix could not be obtained right now
    #[error("Location temporarily unavailable")]
    LocationUnavailable,

    /// Valid scan, but too far from the classroom
    #[error("Out of range: {distance_m:.0} m from classroom, allowed {radius_m} m")]
    OutOfRange { distance_m: f64, radius_m: f64 },

    /// Configuration value missing or invalid
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Preference storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// QR rendering failure
    #[error("QR rendering error: {0}")]
    Qr(#[from] QrError),
}

impl AttendanceError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AttendanceError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            AttendanceError::MalformedToken => ErrorKind::InvalidInput,
            AttendanceError::DeviceUnsupported(_) => ErrorKind::Unavailable,
            AttendanceError::LocationUnavailable => ErrorKind::TemporaryFailure,
            AttendanceError::OutOfRange { .. } => ErrorKind::Rejected,
            AttendanceError::Config(_) => ErrorKind::Config,
            AttendanceError::Storage(_) => ErrorKind::Io,
            AttendanceError::Qr(_) => ErrorKind::Internal,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AttendanceError::Storage(e) => {
                tracing::error!(error = %e, "Preference storage error");
            }
            AttendanceError::Qr(e) => {
                tracing::error!(error = %e, "QR rendering error");
            }
            AttendanceError::Config(msg) => {
                tracing::error!(message = %msg, "Attendance configuration error");
            }
            AttendanceError::MalformedToken | AttendanceError::PermissionDenied(_) => {
                tracing::warn!(error = %self, "Attendance attempt invalid");
            }
            _ => {
                tracing::debug!(error = %self, "Attendance error");
            }
        }
    }
}

impl From<DeviceFailure> for AttendanceError {
    fn from(failure: DeviceFailure) -> Self {
        match failure {
            DeviceFailure::CameraUnavailable => AttendanceError::PermissionDenied(Device::Camera),
            DeviceFailure::LocationDenied => AttendanceError::PermissionDenied(Device::Location),
            DeviceFailure::LocationUnavailable => AttendanceError::LocationUnavailable,
            DeviceFailure::GeolocationUnsupported => {
                AttendanceError::DeviceUnsupported("geolocation")
            }
        }
    }
}

impl From<AttendanceError> for AppError {
    fn from(err: AttendanceError) -> Self {
        let kind = err.kind();
        let action = match &err {
            AttendanceError::PermissionDenied(Device::Location) => {
                Some("Please enable location services")
            }
            AttendanceError::LocationUnavailable => Some("Please try again"),
            AttendanceError::MalformedToken => Some("Please scan the correct code"),
            _ => None,
        };
        let app = AppError::new(kind, err.to_string());
        match action {
            Some(action) => app.with_action(action),
            None => app,
        }
    }
}

impl VerificationOutcome {
    /// Accepted distance, or the error that describes the failure
    pub fn into_result(self) -> AttendanceResult<f64> {
        match self {
            VerificationOutcome::Accepted { distance_m } => Ok(distance_m),
            VerificationOutcome::Rejected {
                distance_m,
                radius_m,
                ..
            } => Err(AttendanceError::OutOfRange {
                distance_m,
                radius_m,
            }),
            VerificationOutcome::Invalid {
                reason: InvalidReason::MalformedToken,
            } => Err(AttendanceError::MalformedToken),
            VerificationOutcome::Invalid {
                reason: InvalidReason::DeviceUnavailable(failure),
            } => Err(failure.into()),
        }
    }
}
