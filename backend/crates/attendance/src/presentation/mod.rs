//! Presentation Layer - status text and output DTOs

pub mod display;
pub mod dto;
