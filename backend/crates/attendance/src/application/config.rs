//! Application Configuration
//!
//! Configuration for the attendance application layer. Defaults describe
//! the demo classroom; every constant can be overridden from the
//! environment.

use crate::domain::countdown::DEFAULT_COUNTDOWN_SECS;
use crate::domain::value_objects::{CameraFacing, ClassroomConfig, GeoCoordinate, TokenPrefix};
use crate::error::{AttendanceError, AttendanceResult};
use platform::qr::{Color, ErrorCorrection, QrPalette, QrStyle};
use std::str::FromStr;
use std::time::Duration;

pub const ENV_CLASSROOM_LAT: &str = "ATTENDANCE_CLASSROOM_LAT";
pub const ENV_CLASSROOM_LON: &str = "ATTENDANCE_CLASSROOM_LON";
pub const ENV_RADIUS_M: &str = "ATTENDANCE_RADIUS_M";
pub const ENV_COUNTDOWN_SECS: &str = "ATTENDANCE_COUNTDOWN_SECS";
pub const ENV_TOKEN_PREFIX: &str = "ATTENDANCE_TOKEN_PREFIX";
pub const ENV_FRAME_INTERVAL_MS: &str = "ATTENDANCE_FRAME_INTERVAL_MS";

/// Token palette: light modules on a dark background
pub const TOKEN_PALETTE: QrPalette = QrPalette {
    dark: Color([0xe5, 0xe7, 0xeb]),
    light: Color([0x24, 0x21, 0x32]),
};

/// Attendance application configuration
#[derive(Debug, Clone)]
pub struct AttendanceConfig {
    /// Reference coordinate and acceptable radius
    pub classroom: ClassroomConfig,
    /// Literal every token starts with
    pub token_prefix: TokenPrefix,
    /// Lifetime of the visual countdown
    pub countdown: Duration,
    /// Countdown tick period
    pub tick_period: Duration,
    /// Frame polling cadence (display refresh rate)
    pub frame_interval: Duration,
    /// Camera requested for scanning
    pub camera_facing: CameraFacing,
    /// Rendering of the token code
    pub qr_style: QrStyle,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            classroom: ClassroomConfig::DEMO,
            token_prefix: TokenPrefix::default(),
            countdown: Duration::from_secs(DEFAULT_COUNTDOWN_SECS as u64),
            tick_period: Duration::from_secs(1),
            frame_interval: Duration::from_millis(16),
            camera_facing: CameraFacing::Environment,
            qr_style: QrStyle {
                size_px: 256,
                palette: TOKEN_PALETTE,
                error_correction: ErrorCorrection::High,
                ..QrStyle::default()
            },
        }
    }
}

impl AttendanceConfig {
    /// Defaults overridden by process environment variables
    pub fn from_env() -> AttendanceResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> AttendanceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(lat) = parse_var::<f64, _>(&lookup, ENV_CLASSROOM_LAT)? {
            config.classroom.location.latitude = lat;
        }
        if let Some(lon) = parse_var::<f64, _>(&lookup, ENV_CLASSROOM_LON)? {
            config.classroom.location.longitude = lon;
        }
        if let Some(radius) = parse_var::<f64, _>(&lookup, ENV_RADIUS_M)? {
            config.classroom.acceptable_radius_m = radius;
        }
        if let Some(secs) = parse_var::<u32, _>(&lookup, ENV_COUNTDOWN_SECS)? {
            config.countdown = Duration::from_secs(secs as u64);
        }
        if let Some(prefix) = lookup(ENV_TOKEN_PREFIX) {
            config.token_prefix = TokenPrefix::new(prefix.trim()).ok_or_else(|| {
                AttendanceError::Config(format!("{ENV_TOKEN_PREFIX} must be a non-empty word"))
            })?;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_FRAME_INTERVAL_MS)? {
            config.frame_interval = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the constructors of the domain types enforce
    pub fn validate(&self) -> AttendanceResult<()> {
        ClassroomConfig::new(self.classroom.location, self.classroom.acceptable_radius_m)
            .ok_or_else(|| {
                AttendanceError::Config(format!(
                    "acceptable radius must be a finite, non-negative number of meters (got {})",
                    self.classroom.acceptable_radius_m
                ))
            })?;
        if self.countdown.is_zero() {
            return Err(AttendanceError::Config(
                "countdown must last at least one second".to_string(),
            ));
        }
        if self.tick_period.is_zero() || self.frame_interval.is_zero() {
            return Err(AttendanceError::Config(
                "tick period and frame interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_classroom(mut self, location: GeoCoordinate, radius_m: f64) -> Self {
        self.classroom = ClassroomConfig {
            location,
            acceptable_radius_m: radius_m,
        };
        self
    }

    pub fn countdown_secs(&self) -> u32 {
        u32::try_from(self.countdown.as_secs()).unwrap_or(u32::MAX)
    }

    pub fn acceptable_radius_m(&self) -> f64 {
        self.classroom.acceptable_radius_m
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> AttendanceResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AttendanceError::Config(format!("{key}={raw:?}: {e}"))),
    }
}
