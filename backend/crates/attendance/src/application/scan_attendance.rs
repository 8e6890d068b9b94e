//! Scan Attendance Use Case
//!
//! Opens the camera, polls frames at the configured cadence until the
//! decoder yields a code, releases the camera, requests the position once
//! and hands both to the verifier.

use crate::application::capture::CaptureGuard;
use crate::application::config::AttendanceConfig;
use crate::application::verify_attendance::VerifyAttendanceUseCase;
use crate::domain::device::{Camera, CodeDecoder, LocationProvider};
use crate::domain::entities::{InvalidReason, VerificationOutcome};
use crate::domain::scan_latch::{ScanLatch, ScanState};
use kernel::id::ScanAttemptId;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The attempt reached a verdict (possibly `Invalid`)
    Completed(VerificationOutcome),
    /// The consumer stopped the scan before a code was detected
    Cancelled,
}

/// Scan Attendance Use Case
pub struct ScanAttendanceUseCase<C, D, L>
where
    C: Camera,
    D: CodeDecoder,
    L: LocationProvider,
{
    camera: Arc<C>,
    decoder: Arc<D>,
    locator: Arc<L>,
    verifier: VerifyAttendanceUseCase,
    config: Arc<AttendanceConfig>,
    progress: watch::Sender<ScanState>,
}

impl<C, D, L> ScanAttendanceUseCase<C, D, L>
where
    C: Camera,
    D: CodeDecoder,
    L: LocationProvider,
{
    pub fn new(
        camera: Arc<C>,
        decoder: Arc<D>,
        locator: Arc<L>,
        config: Arc<AttendanceConfig>,
    ) -> Self {
        let (progress, _) = watch::channel(ScanState::Idle);
        Self {
            camera,
            decoder,
            locator,
            verifier: VerifyAttendanceUseCase::new(config.clone()),
            config,
            progress,
        }
    }

    /// Latch transitions of the running attempt
    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.progress.subscribe()
    }

    /// Scan until a code is handled
    pub async fn execute(&self) -> ScanOutcome {
        self.execute_until(std::future::pending()).await
    }

    /// Scan until a code is handled or `cancel` resolves, whichever is first
    pub async fn execute_until<F>(&self, cancel: F) -> ScanOutcome
    where
        F: Future<Output = ()>,
    {
        let attempt_id = ScanAttemptId::new();
        let mut latch = ScanLatch::new();
        self.progress.send_replace(latch.state());

        let stream = match self.camera.open(self.config.camera_facing).await {
            Ok(stream) => stream,
            Err(failure) => {
                tracing::warn!(attempt_id = %attempt_id, failure = %failure, "Camera access error");
                return ScanOutcome::Completed(VerificationOutcome::Invalid {
                    reason: InvalidReason::DeviceUnavailable(failure),
                });
            }
        };

        let mut guard = CaptureGuard::new(stream);
        latch.begin_capture();
        self.progress.send_replace(latch.state());
        tracing::debug!(attempt_id = %attempt_id, "Camera opened, scanning");

        let payload = tokio::select! {
            _ = cancel => None,
            payload = self.poll_frames(&mut guard, &mut latch) => payload,
        };
        // No-op when a code was detected; covers cancellation
        guard.release();

        let Some(payload) = payload else {
            tracing::info!(attempt_id = %attempt_id, "Scan cancelled");
            return ScanOutcome::Cancelled;
        };

        self.progress.send_replace(latch.state());
        tracing::info!(attempt_id = %attempt_id, "Code detected, requesting location");

        let location = self.locator.current_position().await;
        let outcome = self.verifier.verify_located(&payload, location);

        tracing::debug!(attempt_id = %attempt_id, accepted = outcome.is_accepted(), "Scan finished");
        ScanOutcome::Completed(outcome)
    }

    async fn poll_frames(&self, guard: &mut CaptureGuard, latch: &mut ScanLatch) -> Option<String> {
        let mut ticker = tokio::time::interval(self.config.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if !latch.is_capturing() {
                return None;
            }

            let Some(frame) = guard.next_frame() else {
                continue;
            };
            let Some(text) = self.decoder.try_decode(&frame).filter(|t| !t.is_empty()) else {
                continue;
            };

            if latch.try_complete() {
                guard.release();
                return Some(text);
            }
        }
    }
}
