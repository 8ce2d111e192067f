use std::future::Future;
use std::time::Duration;

/// Timeout and retry policy applied to every external capability call.
#[derive(Debug, Clone)]
pub struct CallPolicy {
    pub timeout: Duration,
    pub retry_backoff: Duration,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl CallPolicy {
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }
}

/// Runs `op` under the policy's timeout. A timed-out attempt is retried
/// exactly once after the backoff; a second timeout is surfaced through
/// `on_timeout` as the port's own error type. Non-timeout errors propagate
/// immediately.
pub async fn call_with_retry<T, E, F, Fut>(
    policy: &CallPolicy,
    label: &str,
    on_timeout: impl Fn(u64) -> E,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(policy.timeout, op()).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                call = label,
                timeout_secs = policy.timeout_secs(),
                "External call timed out, retrying once"
            );
            tokio::time::sleep(policy.retry_backoff).await;
            match tokio::time::timeout(policy.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(on_timeout(policy.timeout_secs())),
            }
        }
    }
}
