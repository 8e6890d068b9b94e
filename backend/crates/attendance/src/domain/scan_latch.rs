//! Scan latch
//!
//! Guards the frame-polling loop so that at most one detected code is
//! handled per scan: `Idle -> Capturing -> Completed`, with `Completed`
//! terminal.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    #[default]
    Idle,
    Capturing,
    Completed,
}

#[derive(Debug, Default)]
pub struct ScanLatch {
    state: ScanState,
}

impl ScanLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_capturing(&self) -> bool {
        self.state == ScanState::Capturing
    }

    /// `Idle -> Capturing`; false from any other state
    pub fn begin_capture(&mut self) -> bool {
        if self.state == ScanState::Idle {
            self.state = ScanState::Capturing;
            true
        } else {
            false
        }
    }

    /// `Capturing -> Completed`; only the first caller wins
    pub fn try_complete(&mut self) -> bool {
        if self.state == ScanState::Capturing {
            self.state = ScanState::Completed;
            true
        } else {
            false
        }
    }
}
