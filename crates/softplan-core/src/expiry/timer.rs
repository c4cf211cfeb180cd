//! One-shot expiry timer.
//!
//! The timer sleeps for exactly the time remaining and then flips a
//! [`watch`] flag from `false` to `true`. It never polls. Dropping the timer
//! or rescheduling it cancels the pending sleep.

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{ExpiryState, evaluate};

/// Fires once when an expiry instant is reached.
///
/// Must be created from within a Tokio runtime.
#[derive(Debug)]
pub struct ExpiryTimer {
    expires_at: DateTime<Utc>,
    rx: watch::Receiver<bool>,
    cancel: CancellationToken,
}

impl ExpiryTimer {
    /// Arm a timer for `expires_at`, measured from `now`.
    ///
    /// An instant that has already passed resolves immediately without
    /// spawning anything.
    pub fn start(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let cancel = CancellationToken::new();
        let rx = arm(expires_at, now, cancel.clone());
        Self {
            expires_at,
            rx,
            cancel,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the timer has fired.
    pub fn is_expired(&self) -> bool {
        *self.rx.borrow()
    }

    /// A receiver that observes the transition to expired.
    ///
    /// The sender side closes without firing if the timer is cancelled.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.rx.clone()
    }

    /// Wait until the timer fires.
    ///
    /// Returns `false` if the timer was cancelled first.
    pub async fn expired(&self) -> bool {
        let mut rx = self.rx.clone();
        rx.wait_for(|fired| *fired).await.is_ok()
    }

    /// Cancel the pending sleep and re-arm for a new instant.
    pub fn reschedule(&mut self, expires_at: DateTime<Utc>, now: DateTime<Utc>) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.expires_at = expires_at;
        self.rx = arm(expires_at, now, self.cancel.clone());
    }

    /// Stop the timer without firing.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ExpiryTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn arm(
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
    cancel: CancellationToken,
) -> watch::Receiver<bool> {
    let remaining = match evaluate(expires_at, now) {
        ExpiryState::Expired => {
            let (_tx, rx) = watch::channel(true);
            return rx;
        }
        ExpiryState::Active { remaining } => remaining,
    };

    let (tx, rx) = watch::channel(false);
    // Positive by construction, so the conversion cannot fail.
    let sleep_for = remaining.to_std().unwrap_or_default();
    // Deadline is fixed here, not when the task is first polled.
    let deadline = Instant::now() + sleep_for;

    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {
                debug!(%expires_at, "expiry timer fired");
                let _ = tx.send(true);
            }
            _ = cancel.cancelled() => {
                debug!(%expires_at, "expiry timer cancelled");
            }
        }
    });

    rx
}
