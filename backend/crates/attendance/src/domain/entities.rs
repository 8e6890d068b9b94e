//! Domain Entities
//!
//! Core business entities for the attendance domain.

use crate::domain::value_objects::TokenPrefix;
use derive_more::Display;
use std::fmt;

/// Session token - `<prefix>_<issued_at_ms>`
///
/// Carries no expiry and no signature. Two tokens issued within the same
/// millisecond are identical.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{prefix}_{issued_at_ms}")]
pub struct SessionToken {
    prefix: TokenPrefix,
    issued_at_ms: i64,
}

impl SessionToken {
    pub fn issue(prefix: TokenPrefix, issued_at_ms: i64) -> Self {
        Self {
            prefix,
            issued_at_ms,
        }
    }

    pub fn prefix(&self) -> &TokenPrefix {
        &self.prefix
    }

    pub fn issued_at_ms(&self) -> i64 {
        self.issued_at_ms
    }
}

/// Why a well-formed attempt was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    OutsideRadius,
}

impl RejectReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RejectReason::OutsideRadius => "outside radius",
        }
    }
}

/// Camera or location acquisition failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFailure {
    /// Camera permission denied or no camera present
    CameraUnavailable,
    /// Location permission denied
    LocationDenied,
    /// A fix could not be obtained this time
    LocationUnavailable,
    /// No geolocation capability at all
    GeolocationUnsupported,
}

impl DeviceFailure {
    /// Whether retrying the same attempt later could succeed
    pub const fn is_transient(&self) -> bool {
        matches!(self, DeviceFailure::LocationUnavailable)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            DeviceFailure::CameraUnavailable => "camera unavailable",
            DeviceFailure::LocationDenied => "location denied",
            DeviceFailure::LocationUnavailable => "location unavailable",
            DeviceFailure::GeolocationUnsupported => "geolocation unsupported",
        }
    }
}

impl fmt::Display for DeviceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an attempt never reached the distance check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    MalformedToken,
    DeviceUnavailable(DeviceFailure),
}

impl InvalidReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            InvalidReason::MalformedToken => "malformed token",
            InvalidReason::DeviceUnavailable(_) => "camera/location unavailable",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one verification attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerificationOutcome {
    Accepted {
        distance_m: f64,
    },
    Rejected {
        distance_m: f64,
        radius_m: f64,
        reason: RejectReason,
    },
    Invalid {
        reason: InvalidReason,
    },
}

impl VerificationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, VerificationOutcome::Accepted { .. })
    }

    /// Computed distance, absent when the attempt was invalid
    pub fn distance_m(&self) -> Option<f64> {
        match self {
            VerificationOutcome::Accepted { distance_m }
            | VerificationOutcome::Rejected { distance_m, .. } => Some(*distance_m),
            VerificationOutcome::Invalid { .. } => None,
        }
    }

    /// Distance rounded to the nearest meter, for display only
    pub fn display_distance_m(&self) -> Option<i64> {
        self.distance_m().map(crate::domain::services::display_meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        let token = SessionToken::issue(TokenPrefix::default(), 1_700_000_000_123);
        assert_eq!(token.to_string(), "ATTENDANCE_TOKEN_1700000000123");
        assert_eq!(token.issued_at_ms(), 1_700_000_000_123);
    }

    #[test]
    fn test_same_millisecond_tokens_collide() {
        let a = SessionToken::issue(TokenPrefix::default(), 5);
        let b = SessionToken::issue(TokenPrefix::default(), 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_reason_strings() {
        assert_eq!(InvalidReason::MalformedToken.to_string(), "malformed token");
        assert_eq!(
            InvalidReason::DeviceUnavailable(DeviceFailure::LocationDenied).to_string(),
            "camera/location unavailable"
        );
        assert_eq!(RejectReason::OutsideRadius.as_str(), "outside radius");
    }

    #[test]
    fn test_outcome_distance_accessors() {
        let accepted = VerificationOutcome::Accepted { distance_m: 12.5 };
        assert!(accepted.is_accepted());
        assert_eq!(accepted.display_distance_m(), Some(13));

        let invalid = VerificationOutcome::Invalid {
            reason: InvalidReason::MalformedToken,
        };
        assert!(!invalid.is_accepted());
        assert_eq!(invalid.distance_m(), None);
    }
}
