//! # Symmetric jitter for retry delays.
//!
//! Adds a uniformly random offset in `[-spread, +spread)` to a computed delay
//! so that many callers failing at the same moment do not retry in lockstep.
//!
//! Jitter is applied to the value handed to the caller only. Policies keep
//! their own un-jittered interval, so randomness never compounds across calls.

use rand::Rng;
use std::time::Duration;

/// Applies symmetric jitter to `base`.
///
/// - `spread == 0` returns `base` unchanged.
/// - The result saturates at [`Duration::ZERO`]; a negative wait is never produced.
pub(crate) fn apply(base: Duration, spread: Duration) -> Duration {
    let spread_ns = i64::try_from(spread.as_nanos()).unwrap_or(i64::MAX);
    if spread_ns == 0 {
        return base;
    }

    let mut rng = rand::rng();
    let offset = rng.random_range(-spread_ns..spread_ns);

    if offset >= 0 {
        base.saturating_add(Duration::from_nanos(offset.unsigned_abs()))
    } else {
        base.saturating_sub(Duration::from_nanos(offset.unsigned_abs()))
    }
}
