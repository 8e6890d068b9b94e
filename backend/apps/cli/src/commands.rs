//! Subcommand handlers

use crate::cli::{LocationArgs, QrFormat, StudentArgs, TeacherArgs, ThemeAction};
use attendance::application::scan_attendance::{ScanAttendanceUseCase, ScanOutcome};
use attendance::domain::countdown::CountdownState;
use attendance::domain::device::Camera;
use attendance::domain::scan_latch::ScanState;
use attendance::infra::fixed_location::FixedLocationProvider;
use attendance::infra::image_camera::{ImageFileCamera, UnavailableCamera};
use attendance::infra::qr_decoder::{InversionAttempts, QrDecoder};
use attendance::presentation::display::{StatusMessage, countdown_text};
use attendance::presentation::dto::{IssuedTokenResponse, ThemeResponse, VerificationResponse};
use attendance::{
    AppError, AppResult, AttendanceConfig, AttendanceError, DeviceFailure, ErrorKind,
    GeoCoordinate, IssueTokenUseCase, OptionExt, ResultExt, ThemePreferenceUseCase,
    VerificationOutcome, VerifyAttendanceUseCase, start_countdown,
};
use platform::clock::SystemClock;
use platform::kv_store::JsonFileStore;
use platform::qr;
use serde::Serialize;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Conventional status for an interrupted run
const EXIT_INTERRUPTED: u8 = 130;

// =============================================================================
// Output
// =============================================================================

pub struct Output {
    json: bool,
    tty: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            tty: std::io::stdout().is_terminal(),
        }
    }

    fn status(&self, message: &StatusMessage) {
        if !self.json {
            println!("{}", message.render(self.tty));
        }
    }

    fn line(&self, text: &str) {
        if !self.json {
            println!("{text}");
        }
    }

    fn json<T: Serialize>(&self, value: &T) -> AppResult<()> {
        if self.json {
            println!("{}", serde_json::to_string(value)?);
        }
        Ok(())
    }

    /// Rewrites the countdown line in place on a terminal
    fn countdown(&self, state: CountdownState) {
        if self.json {
            return;
        }
        let text = countdown_text(state);
        if self.tty && !state.is_expired() {
            print!("\r\x1b[2K{text}");
            if let Err(err) = std::io::stdout().flush() {
                tracing::debug!(error = %err, "Countdown line not flushed");
            }
        } else if self.tty {
            println!("\r\x1b[2K{text}");
        } else {
            println!("{text}");
        }
    }

    /// Prints the verdict and picks the exit status from it
    fn outcome(&self, outcome: &ScanOutcome) -> AppResult<ExitCode> {
        self.json(&VerificationResponse::from(outcome))?;

        match outcome {
            ScanOutcome::Cancelled => {
                self.line("Scan cancelled.");
                Ok(ExitCode::from(EXIT_INTERRUPTED))
            }
            ScanOutcome::Completed(outcome) => {
                self.status(&StatusMessage::for_outcome(outcome));
                Ok(exit_code_for(*outcome))
            }
        }
    }

    /// Reports a command failure and returns its exit status
    pub fn error(&self, err: AppError) -> ExitCode {
        if err.is_system_error() {
            tracing::error!(error = ?err, "Command failed");
        } else {
            tracing::debug!(error = %err, "Command failed");
        }
        if self.json {
            println!("{}", err.to_json());
        } else {
            eprintln!("{err}");
        }
        ExitCode::from(err.exit_code())
    }
}

fn exit_code_for(outcome: VerificationOutcome) -> ExitCode {
    match outcome.into_result() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            err.log();
            ExitCode::from(AppError::from(err).exit_code())
        }
    }
}

/// Ctrl-C; never resolves when no handler can be installed
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
}

// =============================================================================
// Teacher
// =============================================================================

pub async fn teacher(
    config: Arc<AttendanceConfig>,
    out: &Output,
    args: TeacherArgs,
) -> AppResult<ExitCode> {
    let config = match args.duration {
        Some(secs) => {
            let mut config = (*config).clone();
            config.countdown = Duration::from_secs(u64::from(secs));
            config.validate()?;
            Arc::new(config)
        }
        None => config,
    };

    let issued = IssueTokenUseCase::new(Arc::new(SystemClock), config.clone()).execute()?;

    let body = match args.format {
        QrFormat::Png => issued.qr.to_png().map_err(AttendanceError::from)?,
        QrFormat::Svg => issued.qr.to_svg().into_bytes(),
    };
    tokio::fs::write(&args.qr_out, &body)
        .await
        .map_app_err(ErrorKind::Io, "Failed to write the session code")?;

    out.json(
        &IssuedTokenResponse::new(&issued, Some(&args.qr_out))
            .with_qr_data_url(qr::data_url(args.format.mime(), &body)),
    )?;
    out.line(&format!("Session token: {}", issued.token));
    out.line(&format!("Code written to {}", args.qr_out.display()));

    let handle = start_countdown(issued.countdown, config.tick_period);
    let mut state = handle.subscribe();
    out.countdown(*state.borrow_and_update());

    let interrupted = loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break false;
                }
                let current = *state.borrow_and_update();
                out.countdown(current);
                if current.is_expired() {
                    break false;
                }
            }
            _ = shutdown_signal() => {
                handle.stop();
                break true;
            }
        }
    };

    if !args.keep {
        hide_code(&args.qr_out).await?;
    }

    if interrupted {
        tracing::info!(session_id = %issued.session_id, "Session stopped before expiry");
        out.line("");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }
    Ok(ExitCode::SUCCESS)
}

async fn hide_code(path: &Path) -> AppResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Session code removed");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Student
// =============================================================================

pub async fn student(
    config: Arc<AttendanceConfig>,
    out: &Output,
    args: StudentArgs,
) -> AppResult<ExitCode> {
    let locator = location_provider(&args.location);
    let decoder = QrDecoder::new(InversionAttempts::AttemptBoth);

    if args.deny_camera {
        return scan(UnavailableCamera, decoder, locator, config, out).await;
    }

    let image: PathBuf = args.image.ok_or_app_err(
        ErrorKind::InvalidInput,
        "--image is required unless --deny-camera",
    )?;
    let camera = ImageFileCamera::new(image).with_warmup(args.warmup);
    scan(camera, decoder, locator, config, out).await
}

fn location_provider(args: &LocationArgs) -> FixedLocationProvider {
    let failure = if args.deny_location {
        DeviceFailure::LocationDenied
    } else if args.location_unavailable {
        DeviceFailure::LocationUnavailable
    } else if args.no_geolocation {
        DeviceFailure::GeolocationUnsupported
    } else {
        return match args.position {
            Some(position) => FixedLocationProvider::at(position),
            None => FixedLocationProvider::failing(DeviceFailure::LocationUnavailable),
        };
    };
    FixedLocationProvider::failing(failure)
}

async fn scan<C>(
    camera: C,
    decoder: QrDecoder,
    locator: FixedLocationProvider,
    config: Arc<AttendanceConfig>,
    out: &Output,
) -> AppResult<ExitCode>
where
    C: Camera,
{
    let scan = ScanAttendanceUseCase::new(
        Arc::new(camera),
        Arc::new(decoder),
        Arc::new(locator),
        config,
    );
    let mut progress = scan.subscribe();
    let mut announced = false;

    let run = scan.execute_until(shutdown_signal());
    tokio::pin!(run);

    let outcome = loop {
        tokio::select! {
            outcome = &mut run => break outcome,
            Ok(()) = progress.changed(), if !announced => {
                if *progress.borrow_and_update() == ScanState::Completed {
                    announced = true;
                    out.status(&StatusMessage::detected());
                }
            }
        }
    };

    // Detection and verdict can land in the same poll
    if !announced && *progress.borrow() == ScanState::Completed {
        out.status(&StatusMessage::detected());
    }

    out.outcome(&outcome)
}

// =============================================================================
// Verify
// =============================================================================

pub fn verify(
    config: Arc<AttendanceConfig>,
    out: &Output,
    token: &str,
    position: GeoCoordinate,
) -> AppResult<ExitCode> {
    let outcome = VerifyAttendanceUseCase::new(config).verify(token, position);
    out.outcome(&ScanOutcome::Completed(outcome))
}

// =============================================================================
// Theme
// =============================================================================

pub async fn theme(out: &Output, store: PathBuf, action: Option<ThemeAction>) -> AppResult<ExitCode> {
    let prefs = ThemePreferenceUseCase::new(Arc::new(JsonFileStore::new(store)));

    let theme = match action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => prefs.effective().await?,
        ThemeAction::Set { theme } => prefs.set(theme.into()).await?,
        ThemeAction::Toggle => prefs.toggle().await?,
    };

    out.json(&ThemeResponse::from(theme))?;
    out.line(&format!("Theme: {theme}"));
    Ok(ExitCode::SUCCESS)
}
