use std::{fmt::Display, future::Future, pin::Pin, time::Duration};

use tokio::time::sleep;

pub type RetryFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// Run `operation` until it succeeds or `max_retries` retries have failed,
/// doubling the delay after every failure. The last error is returned.
pub async fn retry_with_backoff<F, T, E>(
    mut operation: F,
    max_retries: usize,
    initial_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> RetryFuture<T, E>,
    E: Display,
{
    let mut delay = initial_delay;
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_retries => {
                attempt += 1;
                tracing::warn!(attempt, ?delay, "Storage operation failed: {e}. Retrying");
                sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
