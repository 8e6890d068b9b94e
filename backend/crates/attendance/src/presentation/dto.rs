//! Output DTOs for `--json` mode

use crate::application::issue_token::IssueTokenOutput;
use crate::application::scan_attendance::ScanOutcome;
use crate::domain::entities::VerificationOutcome;
use crate::domain::theme::Theme;
use crate::presentation::display::{StatusMessage, StatusTone};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::path::Path;

/// Issued session token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedTokenResponse {
    pub session_id: String,
    pub token: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub issued_at_ms: i64,
    pub expires_in_secs: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_path: Option<String>,
    /// The rendered code inline, for consumers that cannot read the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_data_url: Option<String>,
}

impl IssuedTokenResponse {
    pub fn new(output: &IssueTokenOutput, qr_path: Option<&Path>) -> Self {
        let issued_at_ms = output.token.issued_at_ms();
        Self {
            session_id: output.session_id.to_string(),
            token: output.token.to_string(),
            issued_at: Utc.timestamp_millis_opt(issued_at_ms).single(),
            issued_at_ms,
            expires_in_secs: output.countdown.duration_secs(),
            qr_path: qr_path.map(|p| p.display().to_string()),
            qr_data_url: None,
        }
    }

    pub fn with_qr_data_url(mut self, data_url: String) -> Self {
        self.qr_data_url = Some(data_url);
        self
    }
}

/// Verdict of one attempt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    /// `accepted`, `rejected`, `invalid` or `cancelled`
    pub status: &'static str,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    pub tone: StatusTone,
    pub message: String,
}

impl From<&VerificationOutcome> for VerificationResponse {
    fn from(outcome: &VerificationOutcome) -> Self {
        let status = StatusMessage::for_outcome(outcome);
        let (label, radius_m, reason) = match outcome {
            VerificationOutcome::Accepted { .. } => ("accepted", None, None),
            VerificationOutcome::Rejected {
                radius_m, reason, ..
            } => ("rejected", Some(*radius_m), Some(reason.as_str())),
            VerificationOutcome::Invalid { reason } => ("invalid", None, Some(reason.as_str())),
        };
        Self {
            status: label,
            accepted: outcome.is_accepted(),
            distance_m: outcome.display_distance_m(),
            radius_m,
            reason,
            tone: status.tone,
            message: status.text,
        }
    }
}

impl From<&ScanOutcome> for VerificationResponse {
    fn from(outcome: &ScanOutcome) -> Self {
        match outcome {
            ScanOutcome::Completed(outcome) => outcome.into(),
            ScanOutcome::Cancelled => Self {
                status: "cancelled",
                accepted: false,
                distance_m: None,
                radius_m: None,
                reason: None,
                tone: StatusTone::Neutral,
                message: "Scan cancelled.".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
    pub dark: bool,
}

impl From<Theme> for ThemeResponse {
    fn from(theme: Theme) -> Self {
        Self {
            theme,
            dark: theme.is_dark(),
        }
    }
}
