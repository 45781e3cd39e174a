//! Per-call timeout and bounded retry around every remote call.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use vidcheck_common::file_config::PipelineConfig;
use vidcheck_common::Fetch;

#[derive(Debug, Clone, Copy)]
pub struct CallPolicy {
    pub timeout: Duration,
    /// Extra attempts after the first. At most 1.
    pub retries: u32,
}

impl CallPolicy {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
            retries: config.retries(),
        }
    }
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// Run `call` under the policy. Errors and timeouts become
/// `Fetch::Unavailable` carrying the last failure reason.
pub async fn guarded<T, F, Fut>(label: &'static str, policy: CallPolicy, mut call: F) -> Fetch<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let attempts = 1 + policy.retries.min(1);
    let mut reason = String::new();

    for attempt in 1..=attempts {
        match tokio::time::timeout(policy.timeout, call()).await {
            Ok(Ok(value)) => return Fetch::Ok(value),
            Ok(Err(e)) => reason = format!("{e:#}"),
            Err(_) => reason = format!("timed out after {}s", policy.timeout.as_secs_f32()),
        }
        warn!(call = label, attempt, attempts, reason = %reason, "Remote call failed");
    }

    Fetch::Unavailable(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(retries: u32) -> CallPolicy {
        CallPolicy {
            timeout: Duration::from_millis(50),
            retries,
        }
    }

    #[tokio::test]
    async fn success_passes_through() {
        let result = guarded("ok", policy(0), || async { Ok(7) }).await;
        assert_eq!(result, Fetch::Ok(7));
    }

    #[tokio::test]
    async fn error_becomes_unavailable() {
        let result: Fetch<u32> =
            guarded("err", policy(0), || async { Err(anyhow::anyhow!("quota exceeded")) }).await;
        assert_eq!(result.reason(), Some("quota exceeded"));
    }

    #[tokio::test]
    async fn slow_call_times_out() {
        let result: Fetch<u32> = guarded("slow", policy(0), || async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        })
        .await;
        assert!(result.reason().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn retries_once_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = guarded("flaky", policy(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(anyhow::anyhow!("connection reset"))
                } else {
                    Ok("second try")
                }
            }
        })
        .await;
        assert_eq!(result, Fetch::Ok("second try"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_count_is_capped_at_one() {
        let calls = AtomicU32::new(0);
        let result: Fetch<()> = guarded("down", policy(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(anyhow::anyhow!("down")) }
        })
        .await;
        assert!(!result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
