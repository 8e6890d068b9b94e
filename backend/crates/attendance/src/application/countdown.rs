//! Countdown runner
//!
//! Drives a [`Countdown`] from a repeating timer task and publishes every
//! state change on a watch channel. The returned handle is the only way to
//! stop the timer before it expires.

use crate::domain::countdown::{Countdown, CountdownState, TickEvent};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug)]
pub struct CountdownHandle {
    state: watch::Receiver<CountdownState>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    pub fn state(&self) -> CountdownState {
        *self.state.borrow()
    }

    /// Receiver for display updates
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state.clone()
    }

    /// Resolves once the countdown reached zero; pending forever if stopped first
    pub async fn expired(&self) {
        let mut rx = self.state.clone();
        if rx.wait_for(CountdownState::is_expired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Cancel the timer; the last published state stays readable
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn the ticking task; the first tick lands one `period` from now
pub fn start_countdown(mut countdown: Countdown, period: Duration) -> CountdownHandle {
    let (tx, rx) = watch::channel(countdown.state());

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match countdown.tick() {
                TickEvent::Ticked { remaining_secs } => {
                    tx.send_replace(CountdownState::Running { remaining_secs });
                }
                TickEvent::Expired => {
                    tracing::info!(
                        duration_secs = countdown.duration_secs(),
                        "Countdown expired"
                    );
                    tx.send_replace(CountdownState::Expired);
                    break;
                }
                TickEvent::AlreadyExpired => break,
            }
        }
    });

    CountdownHandle { state: rx, task }
}
