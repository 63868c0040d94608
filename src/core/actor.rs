//! # RetryLoop: drives one operation against one backoff policy.
//!
//! Supervises a single logical retry loop:
//! - attempts run through [`run_once`],
//! - waits come from a [`Backoff`] policy,
//! - an optional notify callback observes every retried failure,
//! - cooperative cancellation via [`CancellationToken`].
//!
//! ## Architecture
//! ```text
//! retry(token, op, backoff) ──► RetryLoop::run()
//!
//! loop {
//!   ├─► run_once(op) ─────► op(token.clone())
//!   │       ├─ Done      ──► return Ok(value)
//!   │       ├─ Permanent ──► return Err(Permanent(unwrapped))
//!   │       └─ Transient ──► keep as last error
//!   ├─► backoff.next()
//!   │       ├─ Stop    ──► Err(Canceled) if token cancelled, else Err(Exhausted(last))
//!   │       └─ Wait(d) ──► notify(&last)
//!   └─► select! { token.cancelled() → Err(Canceled), sleep(d) → continue }
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially** (never concurrent within one loop).
//! - Notify is called once per **retried** failure; never for the last one,
//!   never for a permanent error.
//! - Cancellation is checked at **safe points** only: when the policy stops
//!   and while waiting. A running attempt is never interrupted.
//! - Once the token fires, no further attempt is started.

use std::future::Future;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::core::runner::{Attempt, run_once};
use crate::error::{BoxError, RetryError};
use crate::policies::{Backoff, Delay};

/// State of one retry invocation.
///
/// Lives for a single call of [`retry`](crate::retry) /
/// [`retry_notify`](crate::retry_notify) and is dropped with it.
pub(crate) struct RetryLoop<'a, B: ?Sized, N> {
    /// Caller-owned cancellation signal.
    token: &'a CancellationToken,
    /// Wait-time policy; may be shared with other loops.
    backoff: &'a B,
    /// Side channel for retried failures.
    notify: Option<N>,
}

impl<'a, B, N> RetryLoop<'a, B, N>
where
    B: Backoff + ?Sized,
    N: FnMut(&BoxError),
{
    /// Creates a loop over `backoff`, cancelled by `token`.
    pub(crate) fn new(token: &'a CancellationToken, backoff: &'a B, notify: Option<N>) -> Self {
        Self {
            token,
            backoff,
            notify,
        }
    }

    /// Runs `op` until it succeeds, fails permanently, the policy stops, or the token fires.
    ///
    /// ### Exit conditions
    /// - `Ok(value)`: an attempt succeeded (possibly the first one)
    /// - `Err(Permanent)`: an attempt returned a permanent error
    /// - `Err(Exhausted)`: the policy answered `Stop`; carries the last attempt's error
    /// - `Err(Canceled)`: the token fired during a wait, or was already cancelled when the policy stopped
    pub(crate) async fn run<T, E, F, Fut>(mut self, mut op: F) -> Result<T, RetryError>
    where
        F: FnMut(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        loop {
            let last = match run_once(&mut op, self.token).await {
                Attempt::Done(v) => return Ok(v),
                Attempt::Permanent(e) => return Err(RetryError::Permanent(e)),
                Attempt::Transient(e) => e,
            };

            let delay = match self.backoff.next() {
                Delay::Wait(d) => d,
                Delay::Stop => {
                    if self.token.is_cancelled() {
                        return Err(RetryError::Canceled);
                    }
                    return Err(RetryError::Exhausted(last));
                }
            };

            if let Some(notify) = self.notify.as_mut() {
                notify(&last);
            }

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            select! {
                biased;
                _ = self.token.cancelled() => return Err(RetryError::Canceled),
                _ = &mut sleep => {}
            }
        }
    }
}
