//! Issue Token Use Case

use crate::application::config::AttendanceConfig;
use crate::domain::countdown::Countdown;
use crate::domain::entities::SessionToken;
use crate::error::AttendanceResult;
use kernel::id::IssuedSessionId;
use platform::clock::Clock;
use platform::qr::QrImage;
use std::sync::Arc;

/// Output DTO for issue token
#[derive(Debug, Clone)]
pub struct IssueTokenOutput {
    pub session_id: IssuedSessionId,
    pub token: SessionToken,
    pub qr: QrImage,
    /// Not started; hand it to `start_countdown`
    pub countdown: Countdown,
}

/// Issue Token Use Case
pub struct IssueTokenUseCase<K>
where
    K: Clock,
{
    clock: Arc<K>,
    config: Arc<AttendanceConfig>,
}

impl<K> IssueTokenUseCase<K>
where
    K: Clock,
{
    pub fn new(clock: Arc<K>, config: Arc<AttendanceConfig>) -> Self {
        Self { clock, config }
    }

    /// Prefix plus the current wall-clock millisecond
    pub fn issue_token(&self) -> SessionToken {
        SessionToken::issue(self.config.token_prefix.clone(), self.clock.now_millis())
    }

    pub fn execute(&self) -> AttendanceResult<IssueTokenOutput> {
        let session_id = IssuedSessionId::new();
        let token = self.issue_token();
        let qr = QrImage::encode(&token.to_string(), self.config.qr_style)?;
        let countdown = Countdown::new(self.config.countdown_secs());

        tracing::info!(
            session_id = %session_id,
            prefix = %token.prefix(),
            issued_at_ms = token.issued_at_ms(),
            countdown_secs = countdown.duration_secs(),
            qr_modules = qr.modules_per_side(),
            "Issued session token"
        );

        Ok(IssueTokenOutput {
            session_id,
            token,
            qr,
            countdown,
        })
    }
}
