//! Domain Value Objects
//!
//! Immutable value types for the attendance domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Latitude/longitude pair in degrees
///
/// Ranges are not checked; out-of-range values flow into the distance
/// formula unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Fixed literal every session token starts with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPrefix(String);

impl TokenPrefix {
    pub const DEFAULT: &'static str = "ATTENDANCE_TOKEN";

    /// Rejects empty and whitespace-containing prefixes
    pub fn new(prefix: impl Into<String>) -> Option<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            None
        } else {
            Some(Self(prefix))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shape check: the candidate starts with this prefix
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.starts_with(&self.0)
    }
}

impl Default for TokenPrefix {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for TokenPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geofence: reference coordinate plus acceptable radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassroomConfig {
    pub location: GeoCoordinate,
    pub acceptable_radius_m: f64,
}

impl ClassroomConfig {
    /// Demo classroom in Bhopal, 50 m radius
    pub const DEMO: ClassroomConfig = ClassroomConfig {
        location: GeoCoordinate::new(23.2599, 77.4126),
        acceptable_radius_m: 50.0,
    };

    /// Radius must be finite and non-negative
    pub fn new(location: GeoCoordinate, acceptable_radius_m: f64) -> Option<Self> {
        if acceptable_radius_m.is_finite() && acceptable_radius_m >= 0.0 {
            Some(Self {
                location,
                acceptable_radius_m,
            })
        } else {
            None
        }
    }
}

impl Default for ClassroomConfig {
    fn default() -> Self {
        Self::DEMO
    }
}

/// Which camera to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraFacing {
    /// Rear camera
    #[default]
    Environment,
    /// Front camera
    User,
}

/// One captured greyscale frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    luma: Vec<u8>,
}

impl Frame {
    /// `luma` must hold exactly `width * height` row-major samples
    pub fn new(width: u32, height: u32, luma: Vec<u8>) -> Option<Self> {
        if luma.len() == width as usize * height as usize {
            Some(Self {
                width,
                height,
                luma,
            })
        } else {
            None
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn luma_at(&self, x: u32, y: u32) -> u8 {
        self.luma[y as usize * self.width as usize + x as usize]
    }

    pub fn inverted(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            luma: self.luma.iter().map(|v| 255 - v).collect(),
        }
    }
}
