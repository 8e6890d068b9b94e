//! User-facing status text
//!
//! Maps outcomes and device failures to the messages shown beside the
//! scanner, plus the countdown label under the session code.

use crate::domain::countdown::CountdownState;
use crate::domain::entities::{DeviceFailure, InvalidReason, VerificationOutcome};
use crate::domain::services::display_meters;
use serde::Serialize;
use std::fmt;

pub const MSG_DETECTED: &str = "QR Code detected. Verifying your location...";
pub const MSG_INVALID_CODE: &str = "Invalid QR Code. Please scan the correct one.";
pub const MSG_CAMERA: &str = "Error: Could not access camera.";
pub const MSG_NO_GEOLOCATION: &str = "Geolocation is not supported by your device.";
pub const MSG_LOCATION_DENIED: &str =
    "Unable to retrieve your location. Please enable location services.";
pub const MSG_LOCATION_RETRY: &str = "Unable to retrieve your location. Please try again.";
pub const MSG_EXPIRED: &str = "Code has expired.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Neutral,
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub tone: StatusTone,
    pub text: String,
}

impl StatusMessage {
    fn new(tone: StatusTone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    /// Interim status between detection and verdict
    pub fn detected() -> Self {
        Self::new(StatusTone::Neutral, MSG_DETECTED)
    }

    pub fn for_failure(failure: DeviceFailure) -> Self {
        let text = match failure {
            DeviceFailure::CameraUnavailable => MSG_CAMERA,
            DeviceFailure::GeolocationUnsupported => MSG_NO_GEOLOCATION,
            DeviceFailure::LocationDenied => MSG_LOCATION_DENIED,
            DeviceFailure::LocationUnavailable => MSG_LOCATION_RETRY,
        };
        Self::new(StatusTone::Danger, text)
    }

    pub fn for_outcome(outcome: &VerificationOutcome) -> Self {
        match outcome {
            VerificationOutcome::Accepted { distance_m } => Self::new(
                StatusTone::Success,
                format!(
                    "Success! Attendance marked. You are {} meters away.",
                    display_meters(*distance_m)
                ),
            ),
            VerificationOutcome::Rejected {
                distance_m,
                radius_m,
                ..
            } => Self::new(
                StatusTone::Danger,
                format!(
                    "Failed! You are {} meters away, which is outside the allowed range of {}m.",
                    display_meters(*distance_m),
                    radius_m
                ),
            ),
            VerificationOutcome::Invalid {
                reason: InvalidReason::MalformedToken,
            } => Self::new(StatusTone::Danger, MSG_INVALID_CODE),
            VerificationOutcome::Invalid {
                reason: InvalidReason::DeviceUnavailable(failure),
            } => Self::for_failure(*failure),
        }
    }

    /// Text with an ANSI colour for the tone when `ansi` is set
    pub fn render(&self, ansi: bool) -> String {
        if !ansi {
            return self.text.clone();
        }
        let code = match self.tone {
            StatusTone::Neutral => return self.text.clone(),
            StatusTone::Success => "32",
            StatusTone::Danger => "31",
        };
        format!("\x1b[{code}m{}\x1b[0m", self.text)
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// `M:SS`
pub fn format_clock(total_secs: u32) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Expiry shows the zeroed clock followed by the expiry notice
pub fn countdown_text(state: CountdownState) -> String {
    let clock = format!("Code expires in {}", format_clock(state.remaining_secs()));
    if state.is_expired() {
        format!("{clock}\n{MSG_EXPIRED}")
    } else {
        clock
    }
}
