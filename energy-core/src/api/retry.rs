use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::error::ApiError;
use crate::config::RetryPolicy;

/// Runs `op`, retrying transient failures up to `policy.max_retries` times
/// with a fixed delay. Non-transient errors return immediately.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                warn!(
                    operation = label,
                    attempt,
                    max_retries = policy.max_retries,
                    error = %err,
                    "transient failure, retrying"
                );
                tokio::time::sleep(Duration::from_millis(policy.delay_ms)).await;
            }
            result => return result,
        }
    }
}
