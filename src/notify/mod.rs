//! Notify sinks.
//!
//! A notify callback is any `FnMut(&BoxError)` passed to
//! [`retry_notify`](crate::retry_notify). It runs inline in the retry loop,
//! once per retried failure, before the wait; it must be fast.
//!
//! ## Contents
//! - `LogWriter` *(feature `logging`)* emits one `tracing` event per retry.

#[cfg(feature = "logging")]
mod log;

#[cfg(feature = "logging")]
pub use log::LogWriter;
