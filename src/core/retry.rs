//! # Retry entry points.
//!
//! [`retry`] and [`retry_notify`] run an async operation under a [`Backoff`]
//! policy until it succeeds, fails permanently, the policy gives up, or the
//! caller's [`CancellationToken`] fires.
//!
//! The operation is a closure `FnMut(CancellationToken) -> Future<Output = Result<T, E>>`.
//! It is called once per attempt with a clone of the caller's token, so it can
//! abort long work on its own; the engine never interrupts a running attempt.
//!
//! # Example
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use retryvisor::{ConstantBackoff, RetryError, permanent, retry};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), RetryError> {
//!     let token = CancellationToken::new();
//!     let calls = AtomicU32::new(0);
//!
//!     let value = retry(
//!         &token,
//!         |_ctx| async {
//!             match calls.fetch_add(1, Ordering::SeqCst) {
//!                 0 | 1 => Err(std::io::Error::other("flaky").into()),
//!                 2 => Ok(7),
//!                 _ => Err(permanent("unreachable")),
//!             }
//!         },
//!         &ConstantBackoff::new(Duration::from_millis(1)),
//!     )
//!     .await?;
//!
//!     assert_eq!(value, 7);
//!     assert_eq!(calls.load(Ordering::SeqCst), 3);
//!     Ok(())
//! }
//! ```

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::core::actor::RetryLoop;
use crate::error::{BoxError, RetryError};
use crate::policies::Backoff;

/// Retries `op` under `backoff` until success, permanent failure, exhaustion, or cancellation.
///
/// Returns the value of the first successful attempt. See [`RetryError`] for
/// the three failure outcomes.
pub async fn retry<T, E, F, Fut, B>(
    token: &CancellationToken,
    op: F,
    backoff: &B,
) -> Result<T, RetryError>
where
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
    B: Backoff + ?Sized,
{
    RetryLoop::new(token, backoff, None::<fn(&BoxError)>)
        .run(op)
        .await
}

/// Like [`retry`], calling `notify` with the error of every attempt that is about to be retried.
///
/// `notify` runs inline in the retry loop, before the wait; keep it fast.
/// It is never called for the final error, nor for permanent errors.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use retryvisor::{BoxError, ConstantBackoff, RetryError, retry_notify, with_max_retries};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let mut seen = Vec::new();
///
/// let res: Result<(), RetryError> = retry_notify(
///     &token,
///     |_ctx| async { Err::<(), BoxError>("unavailable".into()) },
///     &with_max_retries(ConstantBackoff::new(Duration::from_millis(1)), 3),
///     |err: &BoxError| seen.push(err.to_string()),
/// )
/// .await;
///
/// assert_eq!(res.unwrap_err().to_string(), "unavailable");
/// assert_eq!(seen, ["unavailable", "unavailable"]);
/// # }
/// ```
pub async fn retry_notify<T, E, F, Fut, B, N>(
    token: &CancellationToken,
    op: F,
    backoff: &B,
    notify: N,
) -> Result<T, RetryError>
where
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
    B: Backoff + ?Sized,
    N: FnMut(&BoxError),
{
    RetryLoop::new(token, backoff, Some(notify)).run(op).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permanent::{is_permanent, permanent};
    use crate::policies::{ConstantBackoff, Delay, ExponentialBackoff, with_max_retries};
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
    use std::time::Duration;
    use thiserror::Error;

    const TICK: Duration = Duration::from_millis(1);

    #[derive(Error, Debug)]
    #[error("test: {0}")]
    struct Wrapped(#[source] BoxError);

    /// Constant policy that counts how often it is consulted.
    #[derive(Default)]
    struct Counting(AtomicU64);

    impl Backoff for Counting {
        fn next(&self) -> Delay {
            self.0.fetch_add(1, Ordering::SeqCst);
            Delay::Wait(TICK)
        }
    }

    fn fail(n: u32) -> BoxError {
        io::Error::other(format!("error {n}")).into()
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_k_attempts() {
        for k in 1..=5u32 {
            let token = CancellationToken::new();
            let attempts = AtomicU32::new(0);

            let res = retry(
                &token,
                |_ctx| async {
                    let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if n == k { Ok(n) } else { Err(fail(n)) }
                },
                &ConstantBackoff::new(TICK),
            )
            .await;

            assert_eq!(res.ok(), Some(k));
            assert_eq!(attempts.load(Ordering::SeqCst), k);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_never_consults_policy() {
        let token = CancellationToken::new();
        let policy = Counting::default();

        let res = retry(&token, |_ctx| async { Ok::<_, BoxError>("ok") }, &policy).await;

        assert_eq!(res.ok(), Some("ok"));
        assert_eq!(policy.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notify_called_for_each_retry() {
        const SUCCESS_AFTER: u32 = 3;

        let token = CancellationToken::new();
        let attempts = AtomicU32::new(0);
        let mut notified = Vec::new();

        let res = retry_notify(
            &token,
            |_ctx| async {
                let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                if n == SUCCESS_AFTER { Ok(()) } else { Err(fail(n)) }
            },
            &ConstantBackoff::new(TICK),
            |err: &BoxError| notified.push(err.to_string()),
        )
        .await;

        assert!(res.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), SUCCESS_AFTER);
        assert_eq!(notified, ["error 1", "error 2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_on_first_attempt() {
        let token = CancellationToken::new();
        let policy = Counting::default();
        let attempts = AtomicU32::new(0);
        let mut notified = 0;

        let res: Result<(), _> = retry_notify(
            &token,
            |_ctx| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(permanent(io::Error::from(io::ErrorKind::UnexpectedEof)))
            },
            &policy,
            |_: &BoxError| notified += 1,
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(policy.0.load(Ordering::SeqCst), 0);
        assert_eq!(notified, 0);

        match res {
            Err(RetryError::Permanent(e)) => {
                assert!(!is_permanent(e.as_ref()));
                let io = e.downcast_ref::<io::Error>().expect("original io error");
                assert_eq!(io.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected permanent, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_short_circuits_any_attempt() {
        let cases: [(&str, fn() -> BoxError, bool); 3] = [
            ("eof", || io::Error::from(io::ErrorKind::UnexpectedEof).into(), true),
            ("perm eof", || permanent(io::Error::from(io::ErrorKind::UnexpectedEof)), false),
            (
                "wrapped perm eof",
                || Wrapped(permanent(io::Error::from(io::ErrorKind::UnexpectedEof))).into(),
                false,
            ),
        ];

        for (name, make, want_retry) in cases {
            let token = CancellationToken::new();
            let attempts = AtomicU32::new(0);

            let _ = retry(
                &token,
                |_ctx| async {
                    if attempts.fetch_add(1, Ordering::SeqCst) >= 1 {
                        return Err::<(), _>(permanent("retries exceeded"));
                    }
                    Err(make())
                },
                &ConstantBackoff::new(TICK),
            )
            .await;

            let attempts = attempts.load(Ordering::SeqCst);
            if want_retry {
                assert!(attempts > 1, "{name}: want retry, got attempts = {attempts}");
            } else {
                assert_eq!(attempts, 1, "{name}: do not want retry");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_nested_permanent_is_unwrapped() {
        let token = CancellationToken::new();
        let policy = Counting::default();
        let res: Result<(), _> = retry(
            &token,
            |_ctx| async {
                Err(Wrapped(permanent(io::Error::from(io::ErrorKind::UnexpectedEof))))
            },
            &policy,
        )
        .await;

        assert_eq!(policy.0.load(Ordering::SeqCst), 0);
        match res {
            Err(RetryError::Permanent(e)) => {
                assert!(!is_permanent(e.as_ref()));
                assert!(!e.is::<Wrapped>());
                let io = e.downcast_ref::<io::Error>().expect("original io error");
                assert_eq!(io.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected permanent, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_retries_attempts_and_last_error() {
        const MAX_RETRIES: u64 = 5;

        let token = CancellationToken::new();
        let attempts = AtomicU32::new(0);
        let mut notified = 0u64;

        let res: Result<(), _> = retry_notify(
            &token,
            |_ctx| async { Err(fail(attempts.fetch_add(1, Ordering::SeqCst) + 1)) },
            &with_max_retries(ConstantBackoff::new(TICK), MAX_RETRIES),
            |_: &BoxError| notified += 1,
        )
        .await;

        assert_eq!(u64::from(attempts.load(Ordering::SeqCst)), MAX_RETRIES);
        assert_eq!(notified, MAX_RETRIES - 1);
        match res {
            Err(RetryError::Exhausted(e)) => assert_eq!(e.to_string(), "error 5"),
            other => panic!("expected exhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_wait() {
        let token = CancellationToken::new();
        let attempts = Arc::new(AtomicU32::new(0));

        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                token.cancel();
            })
        };

        let started = tokio::time::Instant::now();
        let res: Result<(), _> = retry(
            &token,
            |_ctx| {
                let attempts = Arc::clone(&attempts);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(fail(1))
                }
            },
            &ConstantBackoff::new(Duration::from_secs(3600)),
        )
        .await;
        canceller.await.expect("canceller panicked");

        assert!(matches!(res, Err(RetryError::Canceled)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_operation_cancels_token() {
        const CANCEL_AFTER: u32 = 3;

        let attempts = AtomicU32::new(0);
        let token = CancellationToken::new();

        let res: Result<(), _> = retry(
            &token,
            |ctx| {
                let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == CANCEL_AFTER {
                        ctx.cancel();
                    }
                    Err(fail(n))
                }
            },
            &ConstantBackoff::new(TICK),
        )
        .await;

        assert!(matches!(res, Err(RetryError::Canceled)));
        assert_eq!(attempts.load(Ordering::SeqCst), CANCEL_AFTER);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_wins_over_exhaustion() {
        let token = CancellationToken::new();

        let res: Result<(), _> = retry(
            &token,
            |ctx| async move {
                ctx.cancel();
                Err(fail(1))
            },
            &with_max_retries(ConstantBackoff::new(TICK), 1),
        )
        .await;

        assert!(matches!(res, Err(RetryError::Canceled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_without_cancellation_reports_last_error() {
        let token = CancellationToken::new();
        let attempts = AtomicU32::new(0);

        let res: Result<(), _> = retry(
            &token,
            |_ctx| async { Err(fail(attempts.fetch_add(1, Ordering::SeqCst) + 1)) },
            &with_max_retries(ConstantBackoff::new(TICK), 2),
        )
        .await;

        let err = res.expect_err("policy should exhaust");
        assert_eq!(err.as_label(), "retry_exhausted");
        assert_eq!(err.to_string(), "error 2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reused_policy_keeps_state_until_reset() {
        let token = CancellationToken::new();
        let policy = with_max_retries(ConstantBackoff::new(TICK), 3);

        let run = || async {
            let attempts = AtomicU32::new(0);
            let _: Result<(), _> = retry(
                &token,
                |_ctx| async {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(fail(0))
                },
                &policy,
            )
            .await;
            attempts.load(Ordering::SeqCst)
        };

        assert_eq!(run().await, 3);
        assert_eq!(run().await, 1);
        policy.reset();
        assert_eq!(run().await, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_policy_across_concurrent_loops() {
        let policy = Arc::new(ExponentialBackoff::new(crate::ExponentialConfig {
            initial_interval: Duration::from_millis(1),
            max_interval: Duration::from_millis(4),
            jitter: Duration::ZERO,
            max_elapsed_time: Duration::ZERO,
            multiplier: 2.0,
        }));
        let token = CancellationToken::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let policy = Arc::clone(&policy);
                let token = token.clone();
                tokio::spawn(async move {
                    let attempts = AtomicU32::new(0);
                    retry(
                        &token,
                        |_ctx| async {
                            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                            if n < 4 { Err(fail(n)) } else { Ok(n) }
                        },
                        &policy,
                    )
                    .await
                })
            })
            .collect();

        for h in handles {
            let res = h.await.expect("retry task panicked");
            assert_eq!(res.ok(), Some(4));
        }
    }
}
