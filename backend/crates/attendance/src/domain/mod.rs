//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (SessionToken, VerificationOutcome)
//! - Domain value objects (GeoCoordinate, ClassroomConfig, TokenPrefix, Frame)
//! - Domain services (haversine distance, geofence classification)
//! - State machines (Countdown, ScanLatch) and the Theme preference
//! - Device port traits (camera, decoder, location)

pub mod countdown;
pub mod device;
pub mod entities;
pub mod scan_latch;
pub mod services;
pub mod theme;
pub mod value_objects;
