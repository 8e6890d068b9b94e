//! Domain Services
//!
//! Pure geofence logic.

use crate::domain::entities::{InvalidReason, RejectReason, VerificationOutcome};
use crate::domain::value_objects::{ClassroomConfig, GeoCoordinate, TokenPrefix};

/// Mean Earth radius in meters
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points, in meters
pub fn haversine_distance_m(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_MEAN_RADIUS_M * c
}

/// Threshold decision, inclusive at the boundary
pub fn classify_distance(distance_m: f64, classroom: &ClassroomConfig) -> VerificationOutcome {
    if distance_m <= classroom.acceptable_radius_m {
        VerificationOutcome::Accepted { distance_m }
    } else {
        VerificationOutcome::Rejected {
            distance_m,
            radius_m: classroom.acceptable_radius_m,
            reason: RejectReason::OutsideRadius,
        }
    }
}

/// Shape check, then distance, then threshold
pub fn evaluate(
    token: &str,
    position: GeoCoordinate,
    prefix: &TokenPrefix,
    classroom: &ClassroomConfig,
) -> VerificationOutcome {
    if !prefix.matches(token) {
        return VerificationOutcome::Invalid {
            reason: InvalidReason::MalformedToken,
        };
    }

    let distance_m = haversine_distance_m(classroom.location, position);
    classify_distance(distance_m, classroom)
}

/// Round to the nearest meter for presentation
pub fn display_meters(distance_m: f64) -> i64 {
    distance_m.round() as i64
}
