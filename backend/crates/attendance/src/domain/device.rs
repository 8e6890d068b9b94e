//! Device Port Traits
//!
//! Interfaces to the camera, the code decoder and the location source.
//! Implementations live in the infrastructure layer.

use crate::domain::entities::DeviceFailure;
use crate::domain::value_objects::{CameraFacing, Frame, GeoCoordinate};

/// Camera that can be opened for streaming
#[trait_variant::make(Camera: Send)]
pub trait LocalCamera {
    /// Acquire the device; the returned stream must be stopped to release it
    async fn open(&self, facing: CameraFacing) -> Result<Box<dyn CameraStream>, DeviceFailure>;
}

/// An acquired camera stream
pub trait CameraStream: Send {
    /// Latest frame, `None` while not enough data has arrived
    fn next_frame(&mut self) -> Option<Frame>;

    /// Release the device. Must be idempotent.
    fn stop(&mut self);
}

/// Optical code decoder (opaque collaborator)
pub trait CodeDecoder: Send + Sync {
    fn try_decode(&self, frame: &Frame) -> Option<String>;
}

/// One-shot position source
#[trait_variant::make(LocationProvider: Send)]
pub trait LocalLocationProvider {
    async fn current_position(&self) -> Result<GeoCoordinate, DeviceFailure>;
}
