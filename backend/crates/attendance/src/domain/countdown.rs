//! Countdown state machine
//!
//! One `tick()` per elapsed second. Reaching zero yields a single
//! `TickEvent::Expired`; later ticks are inert.

/// 5 minutes
pub const DEFAULT_COUNTDOWN_SECS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Running { remaining_secs: u32 },
    Expired,
}

impl CountdownState {
    pub fn is_expired(&self) -> bool {
        matches!(self, CountdownState::Expired)
    }

    pub fn remaining_secs(&self) -> u32 {
        match self {
            CountdownState::Running { remaining_secs } => *remaining_secs,
            CountdownState::Expired => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    Ticked { remaining_secs: u32 },
    /// Emitted exactly once
    Expired,
    /// Tick after expiry, nothing changed
    AlreadyExpired,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    duration_secs: u32,
    state: CountdownState,
}

impl Countdown {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            state: CountdownState::Running {
                remaining_secs: duration_secs,
            },
        }
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn tick(&mut self) -> TickEvent {
        match self.state {
            CountdownState::Expired => TickEvent::AlreadyExpired,
            CountdownState::Running { remaining_secs } => {
                let remaining_secs = remaining_secs.saturating_sub(1);
                if remaining_secs == 0 {
                    self.state = CountdownState::Expired;
                    TickEvent::Expired
                } else {
                    self.state = CountdownState::Running { remaining_secs };
                    TickEvent::Ticked { remaining_secs }
                }
            }
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}
