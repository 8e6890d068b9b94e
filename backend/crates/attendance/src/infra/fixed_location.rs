//! Pre-determined location source

use crate::domain::device::LocationProvider;
use crate::domain::entities::DeviceFailure;
use crate::domain::value_objects::GeoCoordinate;

/// Answers every position request with the same result
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider {
    result: Result<GeoCoordinate, DeviceFailure>,
}

impl FixedLocationProvider {
    pub fn at(position: GeoCoordinate) -> Self {
        Self {
            result: Ok(position),
        }
    }

    pub fn failing(failure: DeviceFailure) -> Self {
        Self {
            result: Err(failure),
        }
    }
}

impl LocationProvider for FixedLocationProvider {
    async fn current_position(&self) -> Result<GeoCoordinate, DeviceFailure> {
        match self.result {
            Ok(position) => tracing::debug!(position = %position, "Location fix"),
            Err(failure) => tracing::debug!(failure = %failure, "Location request failed"),
        }
        self.result
    }
}
