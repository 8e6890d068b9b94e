//! Verify Attendance Use Case

use crate::application::config::AttendanceConfig;
use crate::domain::entities::{DeviceFailure, InvalidReason, VerificationOutcome};
use crate::domain::services::{display_meters, evaluate};
use crate::domain::value_objects::GeoCoordinate;
use std::sync::Arc;

/// Verify Attendance Use Case
#[derive(Debug, Clone)]
pub struct VerifyAttendanceUseCase {
    config: Arc<AttendanceConfig>,
}

impl VerifyAttendanceUseCase {
    pub fn new(config: Arc<AttendanceConfig>) -> Self {
        Self { config }
    }

    /// Token shape check, then geofence
    pub fn verify(&self, token: &str, position: GeoCoordinate) -> VerificationOutcome {
        let outcome = evaluate(
            token,
            position,
            &self.config.token_prefix,
            &self.config.classroom,
        );

        match &outcome {
            VerificationOutcome::Accepted { distance_m } => {
                tracing::info!(
                    distance_m = display_meters(*distance_m),
                    "Attendance accepted"
                );
            }
            VerificationOutcome::Rejected {
                distance_m,
                radius_m,
                reason,
            } => {
                tracing::info!(
                    distance_m = display_meters(*distance_m),
                    radius_m = *radius_m,
                    reason = reason.as_str(),
                    "Attendance rejected"
                );
            }
            VerificationOutcome::Invalid { reason } => {
                tracing::warn!(reason = %reason, "Scanned code is not a session token");
            }
        }

        outcome
    }

    /// Same as [`verify`](Self::verify) but for a location request that may
    /// have failed; a failure short-circuits before the token is examined
    pub fn verify_located(
        &self,
        token: &str,
        location: Result<GeoCoordinate, DeviceFailure>,
    ) -> VerificationOutcome {
        match location {
            Ok(position) => self.verify(token, position),
            Err(failure) => {
                tracing::warn!(
                    failure = %failure,
                    transient = failure.is_transient(),
                    "Location unavailable for verification"
                );
                VerificationOutcome::Invalid {
                    reason: InvalidReason::DeviceUnavailable(failure),
                }
            }
        }
    }
}
