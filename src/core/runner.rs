//! # Run a single attempt of an operation.
//!
//! Invokes the operation once and classifies what came back, so the retry
//! loop only has to decide between "done", "stop now" and "ask the policy".
//!
//! ```text
//! op(token) → Ok(v)                                 → Attempt::Done(v)
//!           → Err(e), Permanent marker at any depth → Attempt::Permanent(inner)
//!           → Err(e), no marker                     → Attempt::Transient(e)
//! ```
//!
//! ## Rules
//! - Exactly **one** call to the operation per invocation.
//! - The operation gets a clone of the caller's token; cancellation does not
//!   interrupt it, the operation observes the token itself.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::BoxError;
use crate::permanent::{is_permanent, unwrap_permanent};

/// Classified outcome of one attempt.
#[derive(Debug)]
pub(crate) enum Attempt<T> {
    /// The operation succeeded.
    Done(T),
    /// The operation asked not to be retried. Holds the error to report.
    Permanent(BoxError),
    /// The operation failed and may be retried.
    Transient(BoxError),
}

/// Invokes `op` once with a clone of `token` and classifies the result.
pub(crate) async fn run_once<T, E, F, Fut>(op: &mut F, token: &CancellationToken) -> Attempt<T>
where
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    match op(token.clone()).await {
        Ok(v) => Attempt::Done(v),
        Err(e) => classify(e.into()),
    }
}

/// Splits a failed attempt into permanent or transient.
fn classify<T>(err: BoxError) -> Attempt<T> {
    if is_permanent(err.as_ref()) {
        Attempt::Permanent(unwrap_permanent(err))
    } else {
        Attempt::Transient(err)
    }
}
