//! Attendance CLI Entry Point
//!
//! Application entry point and startup.
//! Uses `anyhow` for startup errors; command failures are
//! `kernel::error::AppError` and decide the exit status.

use anyhow::Context;
use attendance::{AppError, AttendanceConfig};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::{Cli, Command};
use commands::Output;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance=info,attendance_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to initialize tracing")?;

    let cli = Cli::parse();

    // Defaults, then ATTENDANCE_* variables, then flags
    let config = AttendanceConfig::from_env()
        .and_then(|config| cli.classroom.apply(config))
        .map_err(AppError::from)
        .context("invalid attendance configuration")?;
    let config = Arc::new(config);

    tracing::debug!(
        classroom = %config.classroom.location,
        radius_m = config.acceptable_radius_m(),
        prefix = %config.token_prefix,
        "Configuration loaded"
    );

    let out = Output::new(cli.json);
    let result = match cli.command {
        Command::Teacher(args) => commands::teacher(config, &out, args).await,
        Command::Student(args) => commands::student(config, &out, args).await,
        Command::Verify { token, position } => commands::verify(config, &out, &token, position),
        Command::Theme { store, action } => commands::theme(&out, store, action).await,
    };

    Ok(result.unwrap_or_else(|err| out.error(err)))
}
