//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Wall clock abstraction (millisecond epoch)
//! - Persisted key-value storage (JSON file, in-memory)
//! - QR code rendering (PNG / SVG, data URLs)

pub mod clock;
pub mod kv_store;
pub mod qr;
