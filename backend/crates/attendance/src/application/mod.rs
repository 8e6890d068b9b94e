//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod capture;
pub mod config;
pub mod countdown;
pub mod issue_token;
pub mod scan_attendance;
pub mod theme_preference;
pub mod verify_attendance;
