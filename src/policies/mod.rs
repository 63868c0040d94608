//! Backoff policies.
//!
//! This module groups the strategies that decide **how long** to wait between
//! attempts and **when** to give up.
//!
//! ## Contents
//! - [`Backoff`]            the capability consumed by the retry engine
//! - [`Delay`]              what a policy answers: wait this long, or stop
//! - [`ConstantBackoff`]    fixed interval, stateless
//! - [`ExponentialBackoff`] growing interval with jitter and an elapsed-time ceiling
//! - [`MaxRetries`]         decorator that caps the number of retries of any policy
//!
//! ## Quick wiring
//! ```text
//! retry(token, op, &backoff)
//!      └─► core::RetryLoop calls backoff.next() after every failed attempt:
//!           - Delay::Wait(d) → notify, sleep d (cancellable), try again
//!           - Delay::Stop    → return the last error
//! ```
//!
//! ## Sharing
//! [`Backoff::next`] takes `&self`. A single instance may be handed to several
//! concurrent retry loops (directly, or behind `Arc`); stateful policies
//! serialize their own updates.

mod constant;
mod exponential;
pub(crate) mod jitter;
mod max_retries;

use std::sync::Arc;
use std::time::Duration;

pub use constant::ConstantBackoff;
pub use exponential::ExponentialBackoff;
pub use max_retries::{MaxRetries, with_max_retries};

/// Answer of a [`Backoff`] policy after a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Delay {
    /// Wait for the given duration, then attempt again.
    ///
    /// `Wait(Duration::ZERO)` is a valid answer and means "retry immediately".
    Wait(Duration),
    /// The policy is exhausted; no further attempts should be made.
    Stop,
}

impl Delay {
    /// Returns `true` for [`Delay::Stop`].
    #[inline]
    pub fn is_stop(&self) -> bool {
        matches!(self, Delay::Stop)
    }

    /// Returns the wait duration, or `None` for [`Delay::Stop`].
    #[inline]
    pub fn as_wait(&self) -> Option<Duration> {
        match self {
            Delay::Wait(d) => Some(*d),
            Delay::Stop => None,
        }
    }
}

impl From<Duration> for Delay {
    fn from(d: Duration) -> Self {
        Delay::Wait(d)
    }
}

/// # Wait-time policy between retry attempts.
///
/// Called once per failed attempt, never before the first one. All parameters
/// are fixed at construction, so [`next`](Backoff::next) takes no arguments.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use retryvisor::{Backoff, Delay};
///
/// /// Waits 10ms, then 20ms, then gives up.
/// struct TwoShots(std::sync::atomic::AtomicU32);
///
/// impl Backoff for TwoShots {
///     fn next(&self) -> Delay {
///         match self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst) {
///             0 => Delay::Wait(Duration::from_millis(10)),
///             1 => Delay::Wait(Duration::from_millis(20)),
///             _ => Delay::Stop,
///         }
///     }
///
///     fn reset(&self) {
///         self.0.store(0, std::sync::atomic::Ordering::SeqCst);
///     }
/// }
///
/// let b = TwoShots(Default::default());
/// assert_eq!(b.next(), Delay::Wait(Duration::from_millis(10)));
/// assert_eq!(b.next(), Delay::Wait(Duration::from_millis(20)));
/// assert_eq!(b.next(), Delay::Stop);
/// b.reset();
/// assert_eq!(b.next(), Delay::Wait(Duration::from_millis(10)));
/// ```
pub trait Backoff: Send + Sync {
    /// Computes the wait before the next attempt, or [`Delay::Stop`].
    fn next(&self) -> Delay;

    /// Returns the policy to its pre-first-call state.
    ///
    /// Stateless policies keep the default no-op. Reusing a policy without
    /// resetting it continues from where the previous loop left off.
    fn reset(&self) {}
}

impl<B: Backoff + ?Sized> Backoff for &B {
    fn next(&self) -> Delay {
        (**self).next()
    }

    fn reset(&self) {
        (**self).reset()
    }
}

impl<B: Backoff + ?Sized> Backoff for Box<B> {
    fn next(&self) -> Delay {
        (**self).next()
    }

    fn reset(&self) {
        (**self).reset()
    }
}

impl<B: Backoff + ?Sized> Backoff for Arc<B> {
    fn next(&self) -> Delay {
        (**self).next()
    }

    fn reset(&self) {
        (**self).reset()
    }
}
