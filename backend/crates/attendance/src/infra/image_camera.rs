//! Still-image camera
//!
//! Stands in for a live device: "opening" the camera decodes an image file
//! into a greyscale frame that the stream then yields on every poll.

use crate::domain::device::{Camera, CameraStream};
use crate::domain::entities::DeviceFailure;
use crate::domain::value_objects::{CameraFacing, Frame};
use std::path::PathBuf;

/// Camera backed by an image file (PNG or JPEG)
#[derive(Debug, Clone)]
pub struct ImageFileCamera {
    path: PathBuf,
    warmup_frames: u32,
}

impl ImageFileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            warmup_frames: 0,
        }
    }

    /// Number of polls that report "not ready" before the first frame
    pub fn with_warmup(mut self, frames: u32) -> Self {
        self.warmup_frames = frames;
        self
    }
}

impl Camera for ImageFileCamera {
    async fn open(&self, facing: CameraFacing) -> Result<Box<dyn CameraStream>, DeviceFailure> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to read camera image");
            DeviceFailure::CameraUnavailable
        })?;

        let luma = image::load_from_memory(&bytes)
            .map_err(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to decode camera image");
                DeviceFailure::CameraUnavailable
            })?
            .to_luma8();

        let (width, height) = luma.dimensions();
        let frame = Frame::new(width, height, luma.into_raw()).ok_or(DeviceFailure::CameraUnavailable)?;

        tracing::debug!(?facing, width, height, "Camera opened");
        Ok(Box::new(StillFrameStream {
            frame,
            warmup_remaining: self.warmup_frames,
            stopped: false,
        }))
    }
}

struct StillFrameStream {
    frame: Frame,
    warmup_remaining: u32,
    stopped: bool,
}

impl CameraStream for StillFrameStream {
    fn next_frame(&mut self) -> Option<Frame> {
        if self.stopped {
            return None;
        }
        if self.warmup_remaining > 0 {
            self.warmup_remaining -= 1;
            return None;
        }
        Some(self.frame.clone())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Camera whose permission is always refused
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCamera;

impl Camera for UnavailableCamera {
    async fn open(&self, _facing: CameraFacing) -> Result<Box<dyn CameraStream>, DeviceFailure> {
        Err(DeviceFailure::CameraUnavailable)
    }
}
