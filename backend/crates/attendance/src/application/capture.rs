//! Scoped camera acquisition

use crate::domain::device::CameraStream;
use crate::domain::value_objects::Frame;

/// Owns an open camera stream and stops it on release or drop
pub struct CaptureGuard {
    stream: Option<Box<dyn CameraStream>>,
}

impl CaptureGuard {
    pub fn new(stream: Box<dyn CameraStream>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    /// `None` once released or while the stream has no frame yet
    pub fn next_frame(&mut self) -> Option<Frame> {
        self.stream.as_mut().and_then(|s| s.next_frame())
    }

    /// Stop the stream now; later calls are no-ops
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!("Camera released");
        }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.release();
    }
}
