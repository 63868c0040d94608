//! # Retry-count limit for any backoff policy.
//!
//! [`MaxRetries`] wraps another [`Backoff`] and answers [`Delay::Stop`] once
//! its call counter reaches the configured limit. Until then it forwards the
//! inner policy's answer unchanged.
//!
//! The counter is bumped on **every** call, including the terminal one, and the
//! stop check is `calls >= limit`. Since the first attempt of a retry loop runs
//! before any call to [`Backoff::next`], wrapping with a limit of `n` allows
//! `n` attempts in total:
//!
//! ```text
//! attempt 1 fails → next() #1 → inner.next()
//! attempt 2 fails → next() #2 → inner.next()
//!   ...
//! attempt n fails → next() #n → Stop (inner untouched)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::policies::{Backoff, Delay};

/// Decorator limiting how many times a policy is consulted.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use retryvisor::{Backoff, ConstantBackoff, Delay, with_max_retries};
///
/// let b = with_max_retries(ConstantBackoff::new(Duration::from_millis(5)), 3);
/// assert_eq!(b.next(), Delay::Wait(Duration::from_millis(5)));
/// assert_eq!(b.next(), Delay::Wait(Duration::from_millis(5)));
/// assert_eq!(b.next(), Delay::Stop);
/// assert_eq!(b.next(), Delay::Stop);
/// ```
#[derive(Debug)]
pub struct MaxRetries<B> {
    inner: B,
    calls: AtomicU64,
    limit: u64,
}

/// Wraps `backoff` so that it stops once it has been consulted `limit` times.
///
/// Pass `&policy` or an `Arc` to keep using the inner policy elsewhere.
pub fn with_max_retries<B: Backoff>(backoff: B, limit: u64) -> MaxRetries<B> {
    MaxRetries::new(backoff, limit)
}

impl<B: Backoff> MaxRetries<B> {
    /// Creates the decorator. See [`with_max_retries`].
    #[must_use]
    pub fn new(inner: B, limit: u64) -> Self {
        Self {
            inner,
            calls: AtomicU64::new(0),
            limit,
        }
    }

    /// Returns the configured limit.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns how many times [`Backoff::next`] has been called since creation or the last reset.
    pub fn attempts(&self) -> u64 {
        self.calls.load(Ordering::Acquire)
    }

    /// Returns the wrapped policy.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Consumes the decorator and returns the wrapped policy.
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: Backoff> Backoff for MaxRetries<B> {
    fn next(&self) -> Delay {
        let calls = self.calls.fetch_add(1, Ordering::AcqRel).saturating_add(1);
        if calls >= self.limit {
            return Delay::Stop;
        }
        self.inner.next()
    }

    /// Zeroes the counter and resets the wrapped policy.
    fn reset(&self) {
        self.calls.store(0, Ordering::Release);
        self.inner.reset();
    }
}
