//! Turn timer: one task per armed deadline.
//!
//! The task emits a countdown tick every `interval` and runs its expiry
//! future once the deadline passes. It knows nothing about the table; the
//! expiry future carries the [`DeadlineToken`] it was armed with and the table
//! decides whether that token is still live.

use riverboat_engine::engine::DeadlineToken;
use riverboat_engine::player::PlayerId;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug)]
pub struct TimerHandle {
    seat: PlayerId,
    token: DeadlineToken,
    deadline: Instant,
    handle: JoinHandle<()>,
}

impl TimerHandle {
    /// Arms a deadline `timeout` from now. `on_tick` receives the whole
    /// seconds left; a zero `interval` disables ticks.
    pub fn spawn<T, F>(
        seat: PlayerId,
        token: DeadlineToken,
        timeout: Duration,
        interval: Duration,
        on_tick: T,
        on_expire: F,
    ) -> Self
    where
        T: Fn(u64) + Send + 'static,
        F: Future<Output = ()> + Send + 'static,
    {
        let start = Instant::now();
        let deadline = start + timeout;
        let handle = tokio::spawn(async move {
            let sleep = tokio::time::sleep_until(deadline);
            tokio::pin!(sleep);
            if interval.is_zero() {
                sleep.await;
            } else {
                let mut ticks = tokio::time::interval_at(start + interval, interval);
                ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        biased;
                        _ = &mut sleep => break,
                        now = ticks.tick() => {
                            let left = deadline.saturating_duration_since(now);
                            if !left.is_zero() {
                                on_tick(left.as_secs());
                            }
                        }
                    }
                }
            }
            on_expire.await;
        });
        Self {
            seat,
            token,
            deadline,
            handle,
        }
    }

    pub fn seat(&self) -> PlayerId {
        self.seat
    }

    pub fn token(&self) -> DeadlineToken {
        self.token
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops the countdown; the expiry future never runs if it has not
    /// started. Dropping the handle instead lets the task run to completion.
    pub fn cancel(self) {
        self.handle.abort();
    }
}
