//! One-second-granularity countdown timer.
//!
//! Replaces ad hoc interval callbacks with an explicit handle exposing the
//! remaining seconds, an awaitable expiry, and cancellation. The ticker is
//! a background task aborted on cancel or drop, so timers never leak
//! across screen teardown.

use std::time::Duration;

use tokio::sync::watch;

use crate::task::Task;

/// Handle to a running countdown.
#[derive(Debug)]
pub struct Countdown {
    remaining: watch::Receiver<u64>,
    ticker: Task<()>,
    notifier: Option<Task<()>>,
}

impl Countdown {
    /// Start a countdown from `seconds`, ticking once per second.
    pub fn start(seconds: u64) -> Self {
        let (tx, rx) = watch::channel(seconds);
        let ticker = Task::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick of a tokio interval fires immediately.
            interval.tick().await;
            let mut left = seconds;
            while left > 0 {
                interval.tick().await;
                left -= 1;
                if tx.send(left).is_err() {
                    return;
                }
            }
        });
        Self {
            remaining: rx,
            ticker,
            notifier: None,
        }
    }

    /// Start a countdown and invoke `on_expire` once when it reaches zero.
    /// The callback does not fire if the countdown is cancelled first.
    pub fn start_with<F>(seconds: u64, on_expire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let mut countdown = Self::start(seconds);
        let mut remaining = countdown.remaining.clone();
        countdown.notifier = Some(Task::spawn(async move {
            // wait_for fails only when the ticker is gone, i.e. cancelled.
            if remaining.wait_for(|left| *left == 0).await.is_ok() {
                on_expire();
            }
        }));
        countdown
    }

    /// Seconds left until expiry.
    pub fn remaining_seconds(&self) -> u64 {
        *self.remaining.borrow()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds() == 0
    }

    /// Wait until the countdown reaches zero. Returns `false` when it was
    /// cancelled before expiring.
    pub async fn expired(&mut self) -> bool {
        self.remaining.wait_for(|left| *left == 0).await.is_ok()
    }

    /// Stop ticking. The remaining value freezes where it was.
    pub fn cancel(&self) {
        self.ticker.abort();
        if let Some(notifier) = &self.notifier {
            notifier.abort();
        }
    }
}
