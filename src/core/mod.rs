//! Retry engine.
//!
//! This module contains the attempt/wait loop. The public API from this module
//! is the [`retry`] / [`retry_notify`] pair and the preset shorthands.
//!
//! Internal modules:
//! - [`runner`]: executes one attempt and classifies its outcome;
//! - [`actor`]: drives attempts, consults the policy, races waits against cancellation;
//! - [`retry`]: public entry points;
//! - [`presets`]: default exponential and constant-interval loops.

mod actor;
mod presets;
mod retry;
mod runner;

pub use presets::{constant, constant_notify, exponential, exponential_notify};
pub use retry::{retry, retry_notify};
