//! # Constant backoff.
//!
//! [`ConstantBackoff`] waits the same interval before every retry and never
//! stops on its own. Combine it with [`with_max_retries`](crate::with_max_retries)
//! or a cancellation token to bound the loop.

use std::time::Duration;

use crate::policies::{Backoff, Delay};

/// Fixed-interval backoff.
///
/// Stateless, so one instance can be shared by any number of concurrent loops.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use retryvisor::{Backoff, ConstantBackoff, Delay};
///
/// let b = ConstantBackoff::new(Duration::from_millis(250));
/// for _ in 0..3 {
///     assert_eq!(b.next(), Delay::Wait(Duration::from_millis(250)));
/// }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantBackoff {
    /// Wait before every retry.
    pub interval: Duration,
}

impl ConstantBackoff {
    /// Creates a constant backoff with the given interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Backoff for ConstantBackoff {
    fn next(&self) -> Delay {
        Delay::Wait(self.interval)
    }
}
