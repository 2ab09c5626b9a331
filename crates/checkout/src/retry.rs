//! Timeout and single-retry wrapper for provider calls.

use std::future::Future;
use std::time::Duration;

/// Default per-attempt timeout for provider calls.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Terminal outcome of a wrapped call.
#[derive(Debug)]
pub enum CallError<E> {
    /// Both attempts timed out.
    TimedOut,
    /// The call failed with a non-transient error, or failed twice.
    Inner(E),
}

/// Runs `op` with a per-attempt timeout, retrying once on timeout or on an
/// error `transient` accepts.
///
/// Only safe for idempotent calls: the payment provider de-duplicates orders
/// by receipt, and e-mail dispatch is gated by the notified-once flag.
pub async fn retry_once<T, E, F, Fut>(
    timeout: Duration,
    transient: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, CallError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut retried = false;
    loop {
        match tokio::time::timeout(timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => {
                if retried || !transient(&err) {
                    return Err(CallError::Inner(err));
                }
                tracing::warn!("transient provider failure, retrying once");
            }
            Err(_) => {
                if retried {
                    return Err(CallError::TimedOut);
                }
                tracing::warn!("provider call timed out, retrying once");
            }
        }
        retried = true;
    }
}
