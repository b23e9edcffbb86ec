use crate::utils::error::Result;
use std::future::Future;
use std::time::Duration;

/// Bounded retry around one stage invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_secs(60))
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// policy's retries are used up. The last error is returned.
pub async fn retry_stage<T, F, Fut>(stage: &str, policy: RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.retries => {
                attempt += 1;
                tracing::warn!(
                    "🔁 Stage '{}' failed: {} (retry {}/{} in {:?})",
                    stage,
                    e,
                    attempt,
                    policy.retries,
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => {
                if attempt > 0 {
                    tracing::error!("Stage '{}' failed after {} retries", stage, attempt);
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick(retries: u32) -> RetryPolicy {
        RetryPolicy::new(retries, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result = retry_stage("load", quick(2), || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(EtlError::StorageError(sqlx::Error::PoolTimedOut))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_retries() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: Result<()> = retry_stage("load", quick(2), || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(EtlError::StorageError(sqlx::Error::PoolTimedOut))
        })
        .await;

        assert!(matches!(result, Err(EtlError::StorageError(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_input_is_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: Result<()> = retry_stage("load", quick(2), || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(EtlError::EmptyInput)
        })
        .await;

        assert!(matches!(result, Err(EtlError::EmptyInput)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(RetryPolicy::default(), RetryPolicy::new(2, Duration::from_secs(60)));
        assert_eq!(RetryPolicy::none().retries, 0);
    }
}
