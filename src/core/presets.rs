//! # Preset retry loops.
//!
//! Shorthands for the two most common setups:
//! - [`exponential`] / [`exponential_notify`]: a fresh [`ExponentialBackoff::default`]
//!   (500ms initial, ×1.5, 60s cap, 250ms jitter, gives up after 15min);
//! - [`constant`] / [`constant_notify`]: a fixed interval until success or cancellation.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::core::retry::{retry, retry_notify};
use crate::error::{BoxError, RetryError};
use crate::policies::{ConstantBackoff, ExponentialBackoff};

/// Retries `op` with the default exponential backoff.
///
/// Stops on success, permanent error, cancellation, or once 15 minutes have elapsed.
pub async fn exponential<T, E, F, Fut>(token: &CancellationToken, op: F) -> Result<T, RetryError>
where
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    retry(token, op, &ExponentialBackoff::default()).await
}

/// Like [`exponential`], calling `notify` before every retry.
pub async fn exponential_notify<T, E, F, Fut, N>(
    token: &CancellationToken,
    op: F,
    notify: N,
) -> Result<T, RetryError>
where
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
    N: FnMut(&BoxError),
{
    retry_notify(token, op, &ExponentialBackoff::default(), notify).await
}

/// Retries `op` every `interval` until success, permanent error, or cancellation.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use retryvisor::{BoxError, constant};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let mut left = 2;
///
/// constant(&token, Duration::from_millis(1), |_ctx| {
///     left -= 1;
///     let done = left == 0;
///     async move { if done { Ok(()) } else { Err::<(), BoxError>("not yet".into()) } }
/// })
/// .await
/// .unwrap();
/// # }
/// ```
pub async fn constant<T, E, F, Fut>(
    token: &CancellationToken,
    interval: Duration,
    op: F,
) -> Result<T, RetryError>
where
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    retry(token, op, &ConstantBackoff::new(interval)).await
}

/// Like [`constant`], calling `notify` before every retry.
pub async fn constant_notify<T, E, F, Fut, N>(
    token: &CancellationToken,
    interval: Duration,
    op: F,
    notify: N,
) -> Result<T, RetryError>
where
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
    N: FnMut(&BoxError),
{
    retry_notify(token, op, &ConstantBackoff::new(interval), notify).await
}
