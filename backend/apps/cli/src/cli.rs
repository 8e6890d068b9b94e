//! Command line definition

use attendance::domain::theme::Theme;
use attendance::{AttendanceConfig, AttendanceError, AttendanceResult, GeoCoordinate, TokenPrefix};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "attendance")]
#[command(version, about = "Classroom QR attendance demo", long_about = None)]
pub struct Cli {
    /// Print JSON instead of status text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub classroom: ClassroomArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides applied on top of defaults and `ATTENDANCE_*` variables
#[derive(Args, Default)]
pub struct ClassroomArgs {
    /// Classroom position as LAT,LON
    #[arg(long, global = true, value_parser = parse_position, allow_hyphen_values = true)]
    pub classroom: Option<GeoCoordinate>,

    /// Acceptable radius in meters
    #[arg(long, global = true)]
    pub radius: Option<f64>,

    /// Session token prefix
    #[arg(long, global = true)]
    pub prefix: Option<String>,
}

impl ClassroomArgs {
    pub fn apply(&self, mut config: AttendanceConfig) -> AttendanceResult<AttendanceConfig> {
        if let Some(location) = self.classroom {
            config.classroom.location = location;
        }
        if let Some(radius) = self.radius {
            config.classroom.acceptable_radius_m = radius;
        }
        if let Some(prefix) = &self.prefix {
            config.token_prefix = TokenPrefix::new(prefix.as_str())
                .ok_or_else(|| AttendanceError::Config("--prefix must be a non-empty word".into()))?;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Issue a session code and run its countdown
    Teacher(TeacherArgs),

    /// Scan a code from an image and check in
    Student(StudentArgs),

    /// Check a token against a reported position
    Verify {
        /// Scanned token text
        #[arg(long)]
        token: String,

        /// Reported position as LAT,LON
        #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
        position: GeoCoordinate,
    },

    /// Show or change the saved theme
    Theme {
        /// Preference file
        #[arg(long, default_value = "attendance-prefs.json")]
        store: PathBuf,

        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Args)]
pub struct TeacherArgs {
    /// Where to write the session code image
    #[arg(long, default_value = "attendance-qr.png")]
    pub qr_out: PathBuf,

    #[arg(long, value_enum, default_value_t = QrFormat::Png)]
    pub format: QrFormat,

    /// Countdown length in seconds
    #[arg(long)]
    pub duration: Option<u32>,

    /// Leave the code image in place once the countdown ends
    #[arg(long)]
    pub keep: bool,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum QrFormat {
    #[default]
    Png,
    Svg,
}

impl QrFormat {
    pub fn mime(self) -> &'static str {
        match self {
            QrFormat::Png => "image/png",
            QrFormat::Svg => "image/svg+xml",
        }
    }
}

#[derive(Args)]
pub struct StudentArgs {
    /// Image the camera sees (PNG or JPEG)
    #[arg(long, required_unless_present = "deny_camera")]
    pub image: Option<PathBuf>,

    /// Polls before the first frame arrives
    #[arg(long, default_value_t = 0)]
    pub warmup: u32,

    /// Simulate a refused camera permission
    #[arg(long, conflicts_with = "image")]
    pub deny_camera: bool,

    #[command(flatten)]
    pub location: LocationArgs,
}

/// What the location request answers
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct LocationArgs {
    /// Reported position as LAT,LON
    #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
    pub position: Option<GeoCoordinate>,

    /// Location permission refused
    #[arg(long)]
    pub deny_location: bool,

    /// No fix this time
    #[arg(long)]
    pub location_unavailable: bool,

    /// Device has no geolocation at all
    #[arg(long)]
    pub no_geolocation: bool,
}

#[derive(Subcommand, Clone, Copy)]
pub enum ThemeAction {
    /// Print the effective theme
    Show,
    /// Save a theme
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
    /// Flip between light and dark
    Toggle,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

/// `LAT,LON` in degrees
pub fn parse_position(value: &str) -> Result<GeoCoordinate, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {value:?}"))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("latitude: {e}"))?;
    let lon = lon
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("longitude: {e}"))?;
    Ok(GeoCoordinate::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        assert_eq!(
            parse_position("23.2599, 77.4126").unwrap(),
            GeoCoordinate::new(23.2599, 77.4126)
        );
        assert_eq!(
            parse_position("-33.5,-70.25").unwrap(),
            GeoCoordinate::new(-33.5, -70.25)
        );
        assert!(parse_position("23.2599").is_err());
        assert!(parse_position("north,77").is_err());
    }

    #[test]
    fn test_student_requires_one_location_source() {
        assert!(Cli::try_parse_from(["attendance", "student", "--image", "a.png"]).is_err());
        assert!(
            Cli::try_parse_from([
                "attendance",
                "student",
                "--image",
                "a.png",
                "--deny-location",
                "--no-geolocation",
            ])
            .is_err()
        );

        let cli = Cli::try_parse_from([
            "attendance",
            "student",
            "--deny-camera",
            "--position",
            "23.2599,77.4126",
        ])
        .unwrap();
        let Command::Student(args) = cli.command else {
            panic!("expected student command");
        };
        assert!(args.deny_camera);
        assert!(args.image.is_none());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from([
            "attendance",
            "verify",
            "--token",
            "ATTENDANCE_TOKEN_1",
            "--position",
            "0,0",
            "--radius",
            "125",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);

        let config = cli.classroom.apply(AttendanceConfig::default()).unwrap();
        assert_eq!(config.acceptable_radius_m(), 125.0);
    }

    #[test]
    fn test_invalid_overrides_are_config_errors() {
        let args = ClassroomArgs {
            radius: Some(-1.0),
            ..ClassroomArgs::default()
        };
        assert!(matches!(
            args.apply(AttendanceConfig::default()),
            Err(AttendanceError::Config(_))
        ));

        let args = ClassroomArgs {
            prefix: Some("two words".to_string()),
            ..ClassroomArgs::default()
        };
        assert!(args.apply(AttendanceConfig::default()).is_err());
    }
}
