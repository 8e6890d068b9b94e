//! Unit tests for the attendance crate
//! Target: every use case path, including device failures and cancellation

#[cfg(test)]
mod support {
    use crate::domain::device::{Camera, CameraStream, CodeDecoder, LocationProvider};
    use crate::domain::entities::DeviceFailure;
    use crate::domain::value_objects::{CameraFacing, Frame, GeoCoordinate};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Frame the decoder below reads as "contains a code"
    pub fn code_frame() -> Frame {
        Frame::new(2, 2, vec![255, 0, 0, 0]).unwrap()
    }

    pub fn blank_frame() -> Frame {
        Frame::new(2, 2, vec![0; 4]).unwrap()
    }

    /// Camera replaying a fixed frame script; the last entry repeats
    pub struct ScriptedCamera {
        frames: Vec<Option<Frame>>,
        fail: Option<DeviceFailure>,
        pub opens: Arc<AtomicUsize>,
        pub stops: Arc<AtomicUsize>,
    }

    impl ScriptedCamera {
        pub fn new(frames: Vec<Option<Frame>>) -> Self {
            Self {
                frames,
                fail: None,
                opens: Arc::new(AtomicUsize::new(0)),
                stops: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn denied() -> Self {
            Self {
                fail: Some(DeviceFailure::CameraUnavailable),
                ..Self::new(Vec::new())
            }
        }

        pub fn stop_count(&self) -> usize {
            self.stops.load(Ordering::SeqCst)
        }
    }

    impl Camera for ScriptedCamera {
        async fn open(
            &self,
            _facing: CameraFacing,
        ) -> Result<Box<dyn CameraStream>, DeviceFailure> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if let Some(failure) = self.fail {
                return Err(failure);
            }
            Ok(Box::new(ScriptedStream {
                frames: self.frames.clone(),
                cursor: 0,
                stops: self.stops.clone(),
            }))
        }
    }

    struct ScriptedStream {
        frames: Vec<Option<Frame>>,
        cursor: usize,
        stops: Arc<AtomicUsize>,
    }

    impl CameraStream for ScriptedStream {
        fn next_frame(&mut self) -> Option<Frame> {
            let index = self.cursor.min(self.frames.len().checked_sub(1)?);
            self.cursor += 1;
            self.frames[index].clone()
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Decodes `payload` from any frame whose top-left sample is lit
    pub struct PayloadDecoder {
        payload: String,
        pub decodes: AtomicUsize,
    }

    impl PayloadDecoder {
        pub fn new(payload: &str) -> Self {
            Self {
                payload: payload.to_string(),
                decodes: AtomicUsize::new(0),
            }
        }
    }

    impl CodeDecoder for PayloadDecoder {
        fn try_decode(&self, frame: &Frame) -> Option<String> {
            if frame.luma_at(0, 0) == 0 {
                return None;
            }
            self.decodes.fetch_add(1, Ordering::SeqCst);
            Some(self.payload.clone())
        }
    }

    pub struct CountingLocator {
        result: Result<GeoCoordinate, DeviceFailure>,
        pub requests: AtomicUsize,
    }

    impl CountingLocator {
        pub fn new(result: Result<GeoCoordinate, DeviceFailure>) -> Self {
            Self {
                result,
                requests: AtomicUsize::new(0),
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    impl LocationProvider for CountingLocator {
        async fn current_position(&self) -> Result<GeoCoordinate, DeviceFailure> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.result
        }
    }
}

#[cfg(test)]
mod verify_tests {
    use crate::application::config::AttendanceConfig;
    use crate::application::verify_attendance::VerifyAttendanceUseCase;
    use crate::domain::entities::{DeviceFailure, InvalidReason, RejectReason, VerificationOutcome};
    use crate::domain::services::haversine_distance_m;
    use crate::domain::value_objects::{ClassroomConfig, GeoCoordinate};
    use crate::presentation::display::StatusMessage;
    use std::sync::Arc;

    const TOKEN: &str = "ATTENDANCE_TOKEN_1700000000000";

    fn verifier() -> VerifyAttendanceUseCase {
        VerifyAttendanceUseCase::new(Arc::new(AttendanceConfig::default()))
    }

    #[test]
    fn test_scenario_at_reference_is_accepted() {
        let outcome = verifier().verify(TOKEN, GeoCoordinate::new(23.2599, 77.4126));
        assert_eq!(outcome, VerificationOutcome::Accepted { distance_m: 0.0 });
        assert_eq!(
            StatusMessage::for_outcome(&outcome).text,
            "Success! Attendance marked. You are 0 meters away."
        );
    }

    #[test]
    fn test_scenario_north_of_reference_is_rejected() {
        let outcome = verifier().verify(TOKEN, GeoCoordinate::new(23.2610, 77.4126));
        match outcome {
            VerificationOutcome::Rejected {
                distance_m,
                radius_m,
                reason,
            } => {
                assert!((distance_m - 122.3).abs() < 0.5, "got {distance_m}");
                assert_eq!(radius_m, 50.0);
                assert_eq!(reason, RejectReason::OutsideRadius);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(
            StatusMessage::for_outcome(&outcome).text,
            "Failed! You are 122 meters away, which is outside the allowed range of 50m."
        );
    }

    #[test]
    fn test_scenario_bogus_token_is_invalid() {
        let outcome = verifier().verify("BOGUS_123", GeoCoordinate::new(23.2599, 77.4126));
        assert_eq!(
            outcome,
            VerificationOutcome::Invalid {
                reason: InvalidReason::MalformedToken
            }
        );
        assert_eq!(outcome.distance_m(), None);
    }

    #[test]
    fn test_scenario_location_failure_is_invalid() {
        for failure in [
            DeviceFailure::LocationDenied,
            DeviceFailure::LocationUnavailable,
            DeviceFailure::GeolocationUnsupported,
        ] {
            let outcome = verifier().verify_located(TOKEN, Err(failure));
            assert_eq!(
                outcome,
                VerificationOutcome::Invalid {
                    reason: InvalidReason::DeviceUnavailable(failure)
                }
            );
            assert_eq!(outcome.distance_m(), None);
        }
    }

    #[test]
    fn test_location_failure_wins_over_malformed_token() {
        let outcome = verifier().verify_located("BOGUS_123", Err(DeviceFailure::LocationDenied));
        assert_eq!(
            outcome,
            VerificationOutcome::Invalid {
                reason: InvalidReason::DeviceUnavailable(DeviceFailure::LocationDenied)
            }
        );
    }

    #[test]
    fn test_exact_radius_is_accepted() {
        let reference = ClassroomConfig::DEMO.location;
        let position = GeoCoordinate::new(23.2603, 77.4130);
        let d = haversine_distance_m(reference, position);

        let config = AttendanceConfig::default().with_classroom(reference, d);
        let outcome = VerifyAttendanceUseCase::new(Arc::new(config)).verify(TOKEN, position);
        assert!(outcome.is_accepted(), "{outcome:?}");
    }

    #[test]
    fn test_zero_radius_only_accepts_reference() {
        let reference = ClassroomConfig::DEMO.location;
        let config = Arc::new(AttendanceConfig::default().with_classroom(reference, 0.0));
        let verifier = VerifyAttendanceUseCase::new(config);

        assert!(verifier.verify(TOKEN, reference).is_accepted());
        assert!(
            !verifier
                .verify(TOKEN, GeoCoordinate::new(23.26, 77.4126))
                .is_accepted()
        );
    }
}

#[cfg(test)]
mod scan_tests {
    use super::support::*;
    use crate::application::config::AttendanceConfig;
    use crate::application::scan_attendance::{ScanAttendanceUseCase, ScanOutcome};
    use crate::domain::entities::{DeviceFailure, InvalidReason, VerificationOutcome};
    use crate::domain::scan_latch::ScanState;
    use crate::domain::value_objects::{ClassroomConfig, GeoCoordinate};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    const TOKEN: &str = "ATTENDANCE_TOKEN_1700000000000";

    fn use_case(
        camera: &Arc<ScriptedCamera>,
        decoder: &Arc<PayloadDecoder>,
        locator: &Arc<CountingLocator>,
    ) -> ScanAttendanceUseCase<ScriptedCamera, PayloadDecoder, CountingLocator> {
        ScanAttendanceUseCase::new(
            camera.clone(),
            decoder.clone(),
            locator.clone(),
            Arc::new(AttendanceConfig::default()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_accepts_and_releases_camera_once() {
        let camera = Arc::new(ScriptedCamera::new(vec![
            None,
            Some(blank_frame()),
            Some(code_frame()),
        ]));
        let decoder = Arc::new(PayloadDecoder::new(TOKEN));
        let locator = Arc::new(CountingLocator::new(Ok(ClassroomConfig::DEMO.location)));
        let scan = use_case(&camera, &decoder, &locator);
        let progress = scan.subscribe();

        let outcome = scan.execute().await;

        assert_eq!(
            outcome,
            ScanOutcome::Completed(VerificationOutcome::Accepted { distance_m: 0.0 })
        );
        assert_eq!(camera.stop_count(), 1);
        assert_eq!(locator.request_count(), 1);
        assert_eq!(*progress.borrow(), ScanState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latch_handles_only_first_decode() {
        let camera = Arc::new(ScriptedCamera::new(vec![Some(code_frame())]));
        let decoder = Arc::new(PayloadDecoder::new(TOKEN));
        let locator = Arc::new(CountingLocator::new(Ok(ClassroomConfig::DEMO.location)));
        let scan = use_case(&camera, &decoder, &locator);

        let outcome = scan.execute().await;
        // Let a few more frame intervals pass; nothing else may be verified
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(matches!(outcome, ScanOutcome::Completed(o) if o.is_accepted()));
        assert_eq!(decoder.decodes.load(Ordering::SeqCst), 1);
        assert_eq!(locator.request_count(), 1);
        assert_eq!(camera.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_code_is_invalid() {
        let camera = Arc::new(ScriptedCamera::new(vec![Some(code_frame())]));
        let decoder = Arc::new(PayloadDecoder::new("BOGUS_123"));
        let locator = Arc::new(CountingLocator::new(Ok(ClassroomConfig::DEMO.location)));

        let outcome = use_case(&camera, &decoder, &locator).execute().await;

        assert_eq!(
            outcome,
            ScanOutcome::Completed(VerificationOutcome::Invalid {
                reason: InvalidReason::MalformedToken
            })
        );
        assert_eq!(camera.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_location_failure_releases_camera() {
        let camera = Arc::new(ScriptedCamera::new(vec![Some(code_frame())]));
        let decoder = Arc::new(PayloadDecoder::new(TOKEN));
        let locator = Arc::new(CountingLocator::new(Err(DeviceFailure::LocationDenied)));

        let outcome = use_case(&camera, &decoder, &locator).execute().await;

        assert_eq!(
            outcome,
            ScanOutcome::Completed(VerificationOutcome::Invalid {
                reason: InvalidReason::DeviceUnavailable(DeviceFailure::LocationDenied)
            })
        );
        assert_eq!(camera.stop_count(), 1);
        assert_eq!(locator.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_detection_releases_camera() {
        let camera = Arc::new(ScriptedCamera::new(vec![Some(blank_frame())]));
        let decoder = Arc::new(PayloadDecoder::new(TOKEN));
        let locator = Arc::new(CountingLocator::new(Ok(ClassroomConfig::DEMO.location)));
        let scan = use_case(&camera, &decoder, &locator);

        let outcome = scan
            .execute_until(tokio::time::sleep(Duration::from_millis(500)))
            .await;

        assert_eq!(outcome, ScanOutcome::Cancelled);
        assert_eq!(camera.stop_count(), 1);
        assert_eq!(locator.request_count(), 0);
        assert_eq!(*scan.subscribe().borrow(), ScanState::Capturing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_scan_releases_camera() {
        let camera = Arc::new(ScriptedCamera::new(vec![None]));
        let decoder = Arc::new(PayloadDecoder::new(TOKEN));
        let locator = Arc::new(CountingLocator::new(Ok(ClassroomConfig::DEMO.location)));
        let scan = use_case(&camera, &decoder, &locator);

        let timed_out = tokio::time::timeout(Duration::from_millis(100), scan.execute()).await;

        assert!(timed_out.is_err());
        assert_eq!(camera.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_camera_denied_never_locates() {
        let camera = Arc::new(ScriptedCamera::denied());
        let decoder = Arc::new(PayloadDecoder::new(TOKEN));
        let locator = Arc::new(CountingLocator::new(Ok(ClassroomConfig::DEMO.location)));

        let outcome = use_case(&camera, &decoder, &locator).execute().await;

        assert_eq!(
            outcome,
            ScanOutcome::Completed(VerificationOutcome::Invalid {
                reason: InvalidReason::DeviceUnavailable(DeviceFailure::CameraUnavailable)
            })
        );
        assert_eq!(camera.stop_count(), 0);
        assert_eq!(locator.request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_scan_keeps_distance() {
        let camera = Arc::new(ScriptedCamera::new(vec![Some(code_frame())]));
        let decoder = Arc::new(PayloadDecoder::new(TOKEN));
        let locator = Arc::new(CountingLocator::new(Ok(GeoCoordinate::new(23.2610, 77.4126))));

        let outcome = use_case(&camera, &decoder, &locator).execute().await;

        let ScanOutcome::Completed(outcome) = outcome else {
            panic!("scan was cancelled");
        };
        assert_eq!(outcome.display_distance_m(), Some(122));
    }
}

#[cfg(test)]
mod issue_tests {
    use crate::application::config::AttendanceConfig;
    use crate::application::countdown::start_countdown;
    use crate::application::issue_token::IssueTokenUseCase;
    use crate::application::scan_attendance::{ScanAttendanceUseCase, ScanOutcome};
    use crate::domain::countdown::{Countdown, CountdownState};
    use crate::domain::value_objects::ClassroomConfig;
    use crate::infra::fixed_location::FixedLocationProvider;
    use crate::infra::image_camera::ImageFileCamera;
    use crate::infra::qr_decoder::{InversionAttempts, QrDecoder};
    use crate::presentation::display::countdown_text;
    use crate::presentation::dto::IssuedTokenResponse;
    use platform::clock::FixedClock;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_issue_token_uses_clock_and_prefix() {
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        let use_case = IssueTokenUseCase::new(clock.clone(), Arc::new(AttendanceConfig::default()));

        let output = use_case.execute().unwrap();
        assert_eq!(output.token.to_string(), "ATTENDANCE_TOKEN_1700000000000");
        assert_eq!(
            output.countdown.state(),
            CountdownState::Running {
                remaining_secs: 300
            }
        );
        assert!(output.qr.style().palette.is_inverted());

        clock.advance(1);
        assert_eq!(
            use_case.issue_token().to_string(),
            "ATTENDANCE_TOKEN_1700000000001"
        );
    }

    #[test]
    fn test_same_millisecond_tokens_are_identical() {
        let clock = Arc::new(FixedClock::new(42));
        let use_case = IssueTokenUseCase::new(clock, Arc::new(AttendanceConfig::default()));
        assert_eq!(use_case.issue_token(), use_case.issue_token());
    }

    #[test]
    fn test_issued_token_response_json() {
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        let output = IssueTokenUseCase::new(clock, Arc::new(AttendanceConfig::default()))
            .execute()
            .unwrap();

        let json = serde_json::to_value(IssuedTokenResponse::new(&output, None)).unwrap();
        assert_eq!(json["token"], "ATTENDANCE_TOKEN_1700000000000");
        assert_eq!(json["issuedAtMs"], 1_700_000_000_000_i64);
        assert_eq!(json["expiresInSecs"], 300);
        assert_eq!(json["issuedAt"], "2023-11-14T22:13:20Z");
        assert!(json.get("qrPath").is_none());
        assert!(json.get("qrDataUrl").is_none());

        let json = serde_json::to_value(
            IssuedTokenResponse::new(&output, None)
                .with_qr_data_url("data:image/svg+xml;base64,PHN2Zy8+".to_string()),
        )
        .unwrap();
        assert_eq!(json["qrDataUrl"], "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_display_reaches_zero() {
        let handle = start_countdown(Countdown::new(2), Duration::from_secs(1));
        let mut rx = handle.subscribe();

        let mut shown = vec![countdown_text(*rx.borrow_and_update())];
        while rx.changed().await.is_ok() {
            let state = *rx.borrow_and_update();
            shown.push(countdown_text(state));
            if state.is_expired() {
                break;
            }
        }

        assert_eq!(
            shown,
            [
                "Code expires in 0:02",
                "Code expires in 0:01",
                "Code expires in 0:00\nCode has expired.",
            ]
        );
    }

    #[tokio::test]
    async fn test_rendered_code_scans_back() {
        let config = Arc::new(AttendanceConfig::default());
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        let output = IssueTokenUseCase::new(clock, config.clone())
            .execute()
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.png");
        std::fs::write(&path, output.qr.to_png().unwrap()).unwrap();

        let scan = ScanAttendanceUseCase::new(
            Arc::new(ImageFileCamera::new(&path)),
            Arc::new(QrDecoder::new(InversionAttempts::AttemptBoth)),
            Arc::new(FixedLocationProvider::at(ClassroomConfig::DEMO.location)),
            config,
        );

        match scan.execute().await {
            ScanOutcome::Completed(outcome) => assert!(outcome.is_accepted(), "{outcome:?}"),
            ScanOutcome::Cancelled => panic!("scan was cancelled"),
        }
    }
}

#[cfg(test)]
mod theme_tests {
    use crate::application::theme_preference::ThemePreferenceUseCase;
    use crate::domain::theme::{THEME_KEY, Theme};
    use platform::kv_store::{JsonFileStore, KeyValueStore, MemoryStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_unset_preference_is_none() {
        let prefs = ThemePreferenceUseCase::new(Arc::new(MemoryStore::new()));
        assert_eq!(prefs.load().await.unwrap(), None);
        assert_eq!(prefs.effective().await.unwrap(), Theme::Light);
    }

    #[tokio::test]
    async fn test_set_and_toggle_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let prefs = ThemePreferenceUseCase::new(store.clone());

        prefs.set_dark(true).await.unwrap();
        assert_eq!(prefs.load().await.unwrap(), Some(Theme::Dark));
        assert_eq!(store.get(THEME_KEY).await.unwrap().as_deref(), Some("dark"));

        assert_eq!(prefs.toggle().await.unwrap(), Theme::Light);
        assert_eq!(prefs.load().await.unwrap(), Some(Theme::Light));
    }

    #[tokio::test]
    async fn test_unknown_stored_value_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, "sepia").await.unwrap();

        let prefs = ThemePreferenceUseCase::new(store);
        assert_eq!(prefs.load().await.unwrap(), None);
        assert_eq!(prefs.toggle().await.unwrap(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_preference_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        ThemePreferenceUseCase::new(Arc::new(JsonFileStore::new(&path)))
            .set(Theme::Dark)
            .await
            .unwrap();

        let reopened = ThemePreferenceUseCase::new(Arc::new(JsonFileStore::new(&path)));
        assert_eq!(reopened.load().await.unwrap(), Some(Theme::Dark));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::domain::entities::{DeviceFailure, InvalidReason, RejectReason, VerificationOutcome};
    use crate::error::{AttendanceError, Device};
    use kernel::error::{app_error::AppError, kind::ErrorKind};

    #[test]
    fn test_outcome_into_result() {
        assert_eq!(
            VerificationOutcome::Accepted { distance_m: 12.0 }
                .into_result()
                .unwrap(),
            12.0
        );

        let rejected = VerificationOutcome::Rejected {
            distance_m: 122.3,
            radius_m: 50.0,
            reason: RejectReason::OutsideRadius,
        };
        assert!(matches!(
            rejected.into_result(),
            Err(AttendanceError::OutOfRange { radius_m, .. }) if radius_m == 50.0
        ));

        let denied = VerificationOutcome::Invalid {
            reason: InvalidReason::DeviceUnavailable(DeviceFailure::CameraUnavailable),
        };
        assert!(matches!(
            denied.into_result(),
            Err(AttendanceError::PermissionDenied(Device::Camera))
        ));
    }

    #[test]
    fn test_error_kinds_and_exit_codes() {
        let cases = [
            (AttendanceError::MalformedToken, ErrorKind::InvalidInput),
            (
                AttendanceError::OutOfRange {
                    distance_m: 60.0,
                    radius_m: 50.0,
                },
                ErrorKind::Rejected,
            ),
            (
                AttendanceError::PermissionDenied(Device::Location),
                ErrorKind::PermissionDenied,
            ),
            (
                AttendanceError::from(DeviceFailure::LocationUnavailable),
                ErrorKind::TemporaryFailure,
            ),
            (
                AttendanceError::from(DeviceFailure::GeolocationUnsupported),
                ErrorKind::Unavailable,
            ),
            (
                AttendanceError::Config("bad".to_string()),
                ErrorKind::Config,
            ),
        ];

        for (err, kind) in cases {
            assert_eq!(err.kind(), kind);
            let app: AppError = err.into();
            assert_eq!(app.kind(), kind);
            assert_eq!(app.exit_code(), kind.exit_code());
        }
    }

    #[test]
    fn test_app_error_carries_action() {
        let app: AppError = AttendanceError::PermissionDenied(Device::Location).into();
        assert_eq!(app.action(), Some("Please enable location services"));

        let app: AppError = AttendanceError::OutOfRange {
            distance_m: 122.3,
            radius_m: 50.0,
        }
        .into();
        assert_eq!(app.action(), None);
        assert!(app.message().contains("122 m"));
    }
}
