//! Infrastructure Layer - Device adapters

pub mod fixed_location;
pub mod image_camera;
pub mod qr_decoder;
