//! # Permanent failures.
//!
//! An operation marks an error as non-retryable by wrapping it with
//! [`permanent`]. The retry engine stops at the first permanent error it sees,
//! skips the backoff policy and the notify callback, and reports the original
//! error with the marker removed.
//!
//! The marker is transparent to error-chain inspection: its `Display` is the
//! wrapped error's, and its [`source`](std::error::Error::source) is the
//! wrapped error itself. A permanent `UnexpectedEof` therefore still answers
//! "is this EOF?" through [`find_source`].
//!
//! # Example
//! ```rust
//! use std::io;
//! use retryvisor::{find_source, is_permanent, permanent, unwrap_permanent};
//!
//! let err = permanent(io::Error::from(io::ErrorKind::UnexpectedEof));
//! assert!(is_permanent(err.as_ref()));
//!
//! let eof = find_source::<io::Error>(err.as_ref()).map(io::Error::kind);
//! assert_eq!(eof, Some(io::ErrorKind::UnexpectedEof));
//!
//! let original = unwrap_permanent(err);
//! assert!(!is_permanent(original.as_ref()));
//! assert!(original.downcast_ref::<io::Error>().is_some());
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;

/// Marker wrapping an error that must not be retried.
///
/// Usually created through [`permanent`] and consumed by the retry engine.
/// The wrapped error sits behind a shared handle so it can be taken back out
/// even when the marker is buried inside a caller's error type.
#[derive(Debug)]
pub struct Permanent {
    source: Arc<BoxError>,
}

impl Permanent {
    /// Wraps `err` as permanent.
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self {
            source: Arc::new(err.into()),
        }
    }

    /// Returns a reference to the wrapped error.
    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref().as_ref()
    }

    /// Removes the marker and returns the wrapped error.
    pub fn into_inner(self) -> BoxError {
        Arc::try_unwrap(self.source).unwrap_or_else(|shared| Box::new(Detached(shared)))
    }

    /// Second handle to the same wrapped error.
    fn share(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl fmt::Display for Permanent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self.source, f)
    }
}

impl StdError for Permanent {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.get_ref())
    }
}

/// Unmarked view of an error whose marker is still referenced elsewhere.
#[derive(Debug)]
struct Detached(Arc<BoxError>);

impl fmt::Display for Detached {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self.0, f)
    }
}

impl StdError for Detached {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.0.as_ref().as_ref())
    }
}

/// Marks `err` as permanent so the retry engine stops immediately.
///
/// Marking an already-permanent error returns it as is; markers never nest.
pub fn permanent(err: impl Into<BoxError>) -> BoxError {
    let err = err.into();
    if err.is::<Permanent>() {
        return err;
    }
    Box::new(Permanent::new(err))
}

/// Returns `true` if `err` or any error in its `source()` chain is a [`Permanent`] marker.
///
/// Works when the marker has been wrapped again by the caller's own error types,
/// as long as those expose it through `source()`.
pub fn is_permanent(err: &(dyn StdError + 'static)) -> bool {
    find_source::<Permanent>(err).is_some()
}

/// Returns the error wrapped by the first [`Permanent`] marker in `err`'s chain.
///
/// A marker found below the top level is taken out of the caller's wrapper,
/// and the wrapper is dropped. Errors without a marker are returned unchanged.
///
/// ```rust
/// use std::io;
/// use retryvisor::{BoxError, is_permanent, permanent, unwrap_permanent};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("reading header: {0}")]
/// struct Header(#[source] BoxError);
///
/// let err: BoxError = Header(permanent(io::Error::from(io::ErrorKind::UnexpectedEof))).into();
/// let inner = unwrap_permanent(err);
/// assert!(!is_permanent(inner.as_ref()));
/// assert!(inner.is::<io::Error>());
/// ```
pub fn unwrap_permanent(err: BoxError) -> BoxError {
    let err = match err.downcast::<Permanent>() {
        Ok(p) => return p.into_inner(),
        Err(other) => other,
    };
    let nested = find_source::<Permanent>(err.as_ref()).map(Permanent::share);
    match nested {
        Some(marker) => {
            drop(err);
            marker.into_inner()
        }
        None => err,
    }
}

/// Walks `err` and its `source()` chain and returns the first error of type `T`.
pub fn find_source<'a, T: StdError + 'static>(
    err: &'a (dyn StdError + 'static),
) -> Option<&'a T> {
    std::iter::successors(Some(err), |&e| e.source()).find_map(|e| e.downcast_ref::<T>())
}
