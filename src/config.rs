//! # Exponential backoff configuration.
//!
//! [`ExponentialConfig`] holds the parameters of an
//! [`ExponentialBackoff`](crate::ExponentialBackoff). It is plain data: build it
//! with struct-update syntax over [`Default`] and hand it to
//! [`ExponentialBackoff::new`](crate::ExponentialBackoff::new).
//!
//! ## Sentinel values
//! - `max_elapsed_time = 0s` → no elapsed-time ceiling (the policy never stops on its own)
//! - `jitter = 0s` → no randomization
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use retryvisor::ExponentialConfig;
//!
//! let cfg = ExponentialConfig {
//!     max_interval: Duration::from_secs(10),
//!     multiplier: 2.0,
//!     ..ExponentialConfig::default()
//! };
//!
//! assert_eq!(cfg.initial_interval, Duration::from_millis(500));
//! assert_eq!(cfg.max_elapsed(), Some(Duration::from_secs(15 * 60)));
//! ```

use std::time::Duration;

/// Default first interval.
pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(500);
/// Default interval cap.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);
/// Default elapsed-time ceiling.
pub const DEFAULT_MAX_ELAPSED_TIME: Duration = Duration::from_secs(15 * 60);
/// Default growth factor.
pub const DEFAULT_MULTIPLIER: f64 = 1.5;
/// Default jitter spread.
pub const DEFAULT_JITTER: Duration = Duration::from_millis(250);

/// Parameters of an exponential backoff.
///
/// ## Field semantics
/// - `initial_interval`: wait returned by the first call
/// - `max_interval`: cap the internal interval snaps to once growth would exceed it
/// - `max_elapsed_time`: total budget since the first call (`0s` = unlimited)
/// - `multiplier`: growth factor applied after every call (`> 1.0` for growth)
/// - `jitter`: returned waits are perturbed by a uniform offset in `[-jitter, +jitter)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExponentialConfig {
    /// Starting interval.
    pub initial_interval: Duration,
    /// Maximum interval.
    pub max_interval: Duration,
    /// Maximum total time since the first call before the policy stops.
    ///
    /// - `Duration::ZERO` = no ceiling
    /// - `> 0` = [`Delay::Stop`](crate::Delay::Stop) once `elapsed + wait` exceeds it
    pub max_elapsed_time: Duration,
    /// Factor applied to the interval after every call.
    pub multiplier: f64,
    /// Spread of the symmetric random offset added to each returned wait.
    pub jitter: Duration,
}

impl ExponentialConfig {
    /// Returns the elapsed-time ceiling as an `Option`.
    ///
    /// - `None` → no ceiling
    /// - `Some(d)` → stop once `elapsed + wait > d`
    #[inline]
    pub fn max_elapsed(&self) -> Option<Duration> {
        if self.max_elapsed_time == Duration::ZERO {
            None
        } else {
            Some(self.max_elapsed_time)
        }
    }
}

impl Default for ExponentialConfig {
    /// Default configuration:
    ///
    /// - `initial_interval = 500ms`
    /// - `max_interval = 60s`
    /// - `max_elapsed_time = 15min`
    /// - `multiplier = 1.5`
    /// - `jitter = 250ms`
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_elapsed_time: DEFAULT_MAX_ELAPSED_TIME,
            multiplier: DEFAULT_MULTIPLIER,
            jitter: DEFAULT_JITTER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_elapsed_means_unlimited() {
        let cfg = ExponentialConfig {
            max_elapsed_time: Duration::ZERO,
            ..ExponentialConfig::default()
        };
        assert_eq!(cfg.max_elapsed(), None);
    }

    #[test]
    fn test_defaults() {
        let cfg = ExponentialConfig::default();
        assert_eq!(cfg.initial_interval, Duration::from_millis(500));
        assert_eq!(cfg.max_interval, Duration::from_secs(60));
        assert_eq!(cfg.max_elapsed_time, Duration::from_secs(900));
        assert_eq!(cfg.multiplier, 1.5);
        assert_eq!(cfg.jitter, Duration::from_millis(250));
    }
}
