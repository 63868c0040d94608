//! # LogWriter: retry event logger
//!
//! A minimal notify sink that reports every retried failure through `tracing`
//! at `WARN` level. Install any `tracing` subscriber to see the output.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! WARN retryvisor::notify::log: retrying after failure op=fetch retry=1 error=connection refused
//! WARN retryvisor::notify::log: retrying after failure op=fetch retry=2 error=connection refused
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use retryvisor::{BoxError, ConstantBackoff, LogWriter, retry_notify, with_max_retries};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let token = CancellationToken::new();
//! let res = retry_notify(
//!     &token,
//!     |_ctx| async { Err::<(), BoxError>("connection refused".into()) },
//!     &with_max_retries(ConstantBackoff::new(Duration::from_millis(1)), 3),
//!     LogWriter::new("fetch").into_notify(),
//! )
//! .await;
//! assert!(res.is_err());
//! # }
//! ```

use std::borrow::Cow;
use std::error::Error as StdError;

use tracing::warn;

use crate::error::BoxError;

/// Retry logger.
///
/// Counts the retries it has seen, so one writer should serve one retry loop.
#[derive(Debug)]
pub struct LogWriter {
    op: Cow<'static, str>,
    retries: u64,
}

impl LogWriter {
    /// Construct a new [`LogWriter`] labelling events with `op`.
    #[must_use]
    pub fn new(op: impl Into<Cow<'static, str>>) -> Self {
        Self {
            op: op.into(),
            retries: 0,
        }
    }

    /// Returns how many failures have been written.
    pub fn retries(&self) -> u64 {
        self.retries
    }

    /// Writes one retried failure.
    pub fn write(&mut self, err: &(dyn StdError + 'static)) {
        self.retries += 1;
        warn!(op = %self.op, retry = self.retries, error = %err, "retrying after failure");
    }

    /// Turns the writer into a callback for [`retry_notify`](crate::retry_notify).
    pub fn into_notify(mut self) -> impl FnMut(&BoxError) + Send + 'static {
        move |err: &BoxError| self.write(err.as_ref())
    }
}
