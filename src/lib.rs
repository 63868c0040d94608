//! # retryvisor
//!
//! **Retryvisor** is a small retry orchestration library for async Rust.
//!
//! It repeatedly runs a fallible async operation under a pluggable backoff
//! policy until the operation succeeds, reports a permanent failure, the
//! caller cancels, or the policy decides no more attempts should be made.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────────────────────────────────┐
//!     │  operation   │   │  Backoff policy                          │
//!     │ FnMut(token) │   │  - ConstantBackoff   (stateless)         │
//!     │  → Future    │   │  - ExponentialBackoff (Mutex<State>)     │
//!     └──────┬───────┘   │  - MaxRetries<B>     (AtomicU64 counter) │
//!            │           └──────────────────┬───────────────────────┘
//!            ▼                              ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  retry / retry_notify (one sequential loop per call)              │
//! │  - runs one attempt at a time                                     │
//! │  - permanent errors stop immediately                              │
//! │  - asks the policy for the next wait                              │
//! │  - races the wait against the CancellationToken                   │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     Ok(value)       notify(&err)        RetryError
//!                   (once per retry)    Canceled | Permanent | Exhausted
//! ```
//!
//! ### Lifecycle
//! ```text
//! loop {
//!   ├─► op(token.clone())
//!   │       ├─ Ok(v)                  ─► return Ok(v)
//!   │       ├─ Err(permanent(e))      ─► return Err(Permanent(e))
//!   │       └─ Err(e)                 ─► last = e
//!   ├─► backoff.next()
//!   │       ├─ Stop    ─► Err(Canceled) if token cancelled, else Err(Exhausted(last))
//!   │       └─ Wait(d) ─► notify(&last)
//!   └─► sleep(d) or token.cancelled() ─► Err(Canceled)
//! }
//! ```
//!
//! ## Features
//! | Area            | Description                                                  | Key types / functions                        |
//! |-----------------|--------------------------------------------------------------|----------------------------------------------|
//! | **Engine**      | Drive an operation against a policy with cancellation.       | [`retry`], [`retry_notify`]                  |
//! | **Policies**    | Decide how long to wait, and when to give up.                | [`Backoff`], [`Delay`], [`ExponentialBackoff`] |
//! | **Permanent**   | Mark errors as non-retryable; inspect error chains.          | [`permanent`], [`is_permanent`], [`find_source`] |
//! | **Errors**      | Typed terminal outcome of a retry loop.                      | [`RetryError`], [`BoxError`]                 |
//! | **Presets**     | Default exponential and constant-interval loops.             | [`exponential`], [`constant`]                |
//! | **Configuration** | Exponential parameters with documented defaults.           | [`ExponentialConfig`]                        |
//!
//! ## Optional features
//! - `logging`: exports a [`tracing`](https://docs.rs/tracing)-backed `LogWriter` notify sink.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use retryvisor::{
//!     BoxError, ExponentialBackoff, ExponentialConfig, RetryError, permanent, retry_notify,
//!     with_max_retries,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let token = CancellationToken::new();
//!
//!     let backoff = with_max_retries(
//!         ExponentialBackoff::new(ExponentialConfig {
//!             initial_interval: Duration::from_millis(10),
//!             max_interval: Duration::from_millis(100),
//!             ..ExponentialConfig::default()
//!         }),
//!         5,
//!     );
//!
//!     let mut attempt = 0;
//!     let res = retry_notify(
//!         &token,
//!         |ctx: CancellationToken| {
//!             attempt += 1;
//!             let n = attempt;
//!             async move {
//!                 if ctx.is_cancelled() {
//!                     return Err(permanent("canceled"));
//!                 }
//!                 if n < 3 {
//!                     return Err::<u32, BoxError>(format!("attempt {n} failed").into());
//!                 }
//!                 Ok(n)
//!             }
//!         },
//!         &backoff,
//!         |err: &BoxError| eprintln!("retrying: {err}"),
//!     )
//!     .await;
//!
//!     match res {
//!         Ok(n) => assert_eq!(n, 3),
//!         Err(RetryError::Canceled) => unreachable!(),
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod notify;
mod permanent;
mod policies;

// ---- Public re-exports ----

pub use config::{
    DEFAULT_INITIAL_INTERVAL, DEFAULT_JITTER, DEFAULT_MAX_ELAPSED_TIME, DEFAULT_MAX_INTERVAL,
    DEFAULT_MULTIPLIER, ExponentialConfig,
};
pub use core::{constant, constant_notify, exponential, exponential_notify, retry, retry_notify};
pub use error::{BoxError, RetryError};
pub use permanent::{Permanent, find_source, is_permanent, permanent, unwrap_permanent};
pub use policies::{
    Backoff, ConstantBackoff, Delay, ExponentialBackoff, MaxRetries, with_max_retries,
};

// Optional: expose a tracing-backed notify sink.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use notify::LogWriter;
