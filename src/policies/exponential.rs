//! # Exponential backoff with jitter and an elapsed-time ceiling.
//!
//! [`ExponentialBackoff`] grows its interval by [`ExponentialConfig::multiplier`]
//! after every call, snapping to [`ExponentialConfig::max_interval`] once the
//! next growth step would overshoot it.
//!
//! ```text
//! first call:  current = initial, started = now
//! every call:  wait    = jitter(current)
//!              current = max                      if current >= max / multiplier
//!                      = current × multiplier     otherwise
//!              Stop                               if max_elapsed > 0 && elapsed + wait > max_elapsed
//! ```
//!
//! With the defaults and jitter ignored, ten consecutive retries wait:
//!
//! ```text
//! Retry   Backoff
//! 1       500ms
//! 2       750ms
//! 3       1.125s
//! 4       1.6875s
//! 5       2.53125s
//! 6       3.796875s
//! 7       5.6953125s
//! 8       8.54296875s
//! 9       12.814453125s
//! 10      19.2216796875s
//! ```
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{Backoff, Delay, ExponentialBackoff, ExponentialConfig};
//!
//! let backoff = ExponentialBackoff::new(ExponentialConfig {
//!     initial_interval: Duration::from_millis(100),
//!     max_interval: Duration::from_secs(1),
//!     multiplier: 2.0,
//!     jitter: Duration::ZERO,
//!     ..ExponentialConfig::default()
//! });
//!
//! assert_eq!(backoff.next(), Delay::Wait(Duration::from_millis(100)));
//! assert_eq!(backoff.next(), Delay::Wait(Duration::from_millis(200)));
//! assert_eq!(backoff.next(), Delay::Wait(Duration::from_millis(400)));
//! assert_eq!(backoff.next(), Delay::Wait(Duration::from_millis(800)));
//! assert_eq!(backoff.next(), Delay::Wait(Duration::from_secs(1)));
//!
//! backoff.reset();
//! assert_eq!(backoff.next(), Delay::Wait(Duration::from_millis(100)));
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::config::ExponentialConfig;
use crate::policies::{Backoff, Delay, jitter};

/// Mutable part of the policy, guarded as one unit.
#[derive(Debug, Default)]
struct State {
    /// Un-jittered interval for the next call (`ZERO` = not started).
    current: Duration,
    /// Set lazily by the first call, on tokio's clock.
    started: Option<Instant>,
}

/// Exponentially growing backoff.
///
/// ### Rules
/// - All state lives behind one lock; [`next`](Backoff::next) and
///   [`reset`](Backoff::reset) never interleave.
/// - Jitter is applied to the returned wait only, never to the tracked interval.
/// - The elapsed-time check adds the **jittered** wait to the time since the
///   first call.
/// - Elapsed time is read from [`tokio::time::Instant`], the same clock the
///   retry loop sleeps on; a paused test runtime freezes it too.
/// - Reusing an instance without [`reset`](Backoff::reset) keeps growing from
///   the current interval and keeps counting elapsed time from the first call.
#[derive(Debug)]
pub struct ExponentialBackoff {
    config: ExponentialConfig,
    state: Mutex<State>,
}

impl ExponentialBackoff {
    /// Creates a backoff from the given configuration.
    #[must_use]
    pub fn new(config: ExponentialConfig) -> Self {
        Self {
            config,
            state: Mutex::new(State::default()),
        }
    }

    /// Returns the configuration this backoff was built with.
    pub fn config(&self) -> &ExponentialConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // State is two plain fields and stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Computes the interval that follows `current`.
    fn grow(&self, current: Duration) -> Duration {
        let max = self.config.max_interval;
        let multiplier = self.config.multiplier;

        if current.as_secs_f64() >= max.as_secs_f64() / multiplier {
            return max;
        }
        Duration::try_from_secs_f64(current.as_secs_f64() * multiplier).unwrap_or(max)
    }
}

impl Default for ExponentialBackoff {
    /// Returns a backoff built from [`ExponentialConfig::default`].
    fn default() -> Self {
        Self::new(ExponentialConfig::default())
    }
}

impl Clone for ExponentialBackoff {
    /// Clones the configuration; the clone starts fresh.
    fn clone(&self) -> Self {
        Self::new(self.config)
    }
}

impl Backoff for ExponentialBackoff {
    fn next(&self) -> Delay {
        let mut state = self.lock();

        let now = Instant::now();
        let started = *state.started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);

        if state.current.is_zero() {
            state.current = self.config.initial_interval;
        }

        let wait = jitter::apply(state.current, self.config.jitter);
        state.current = self.grow(state.current);

        match self.config.max_elapsed() {
            Some(ceiling) if elapsed.saturating_add(wait) > ceiling => Delay::Stop,
            _ => Delay::Wait(wait),
        }
    }

    fn reset(&self) {
        let mut state = self.lock();
        state.current = Duration::ZERO;
        state.started = None;
    }
}
