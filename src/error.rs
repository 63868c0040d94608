//! Error types returned by the retry engine.
//!
//! - [`BoxError`]: the type-erased error every operation error is converted into.
//! - [`RetryError`]: the terminal outcome of a retry loop that did not succeed.
//!
//! A loop ends in exactly one of four ways: success, the unwrapped permanent
//! error, cancellation, or the last transient error once the backoff policy
//! is exhausted. The three failure cases map to the [`RetryError`] variants.
//! [`RetryError`] provides `as_label` and `as_message` helpers for logs and metrics.

use std::error::Error as StdError;

use thiserror::Error;

/// Type-erased, thread-safe error.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// # Terminal error of a retry loop.
///
/// Operation errors are reported verbatim: `Display` and `source()` of
/// [`Permanent`](RetryError::Permanent) and [`Exhausted`](RetryError::Exhausted)
/// are those of the wrapped error. No synthetic "gave up" error is produced.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RetryError {
    /// The cancellation token fired, either during a wait between attempts or
    /// before the exhausted policy was reported.
    #[error("retry canceled")]
    Canceled,

    /// The operation returned an error marked with [`permanent`](crate::permanent).
    ///
    /// Holds the original error with the marker removed, wherever it sat in the chain.
    #[error(transparent)]
    Permanent(BoxError),

    /// The backoff policy answered [`Delay::Stop`](crate::Delay::Stop).
    ///
    /// Holds the error returned by the last attempt.
    #[error(transparent)]
    Exhausted(BoxError),
}

impl RetryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retryvisor::RetryError;
    ///
    /// assert_eq!(RetryError::Canceled.as_label(), "retry_canceled");
    /// assert_eq!(RetryError::Exhausted("boom".into()).as_label(), "retry_exhausted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::Canceled => "retry_canceled",
            RetryError::Permanent(_) => "retry_permanent",
            RetryError::Exhausted(_) => "retry_exhausted",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RetryError::Canceled => "retry canceled".to_string(),
            RetryError::Permanent(e) => format!("permanent: {e}"),
            RetryError::Exhausted(e) => format!("exhausted: {e}"),
        }
    }

    /// Returns `true` for [`RetryError::Canceled`].
    pub fn is_canceled(&self) -> bool {
        matches!(self, RetryError::Canceled)
    }

    /// Returns the operation error, if this is not a cancellation.
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            RetryError::Canceled => None,
            RetryError::Permanent(e) | RetryError::Exhausted(e) => Some(e.as_ref()),
        }
    }

    /// Consumes the error and returns the operation error, if this is not a cancellation.
    ///
    /// # Example
    /// ```
    /// use std::io;
    /// use retryvisor::RetryError;
    ///
    /// let err = RetryError::Exhausted(Box::new(io::Error::from(io::ErrorKind::TimedOut)));
    /// let io = err.into_inner().unwrap().downcast::<io::Error>().unwrap();
    /// assert_eq!(io.kind(), io::ErrorKind::TimedOut);
    /// ```
    pub fn into_inner(self) -> Option<BoxError> {
        match self {
            RetryError::Canceled => None,
            RetryError::Permanent(e) | RetryError::Exhausted(e) => Some(e),
        }
    }
}
