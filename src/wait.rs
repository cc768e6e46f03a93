//! Polling for cloud state transitions with exponential backoff.
//!
//! Lifecycle waits are intentionally unbounded: the reconciler blocks until
//! the cloud reports the target state, and API errors end the wait.

use anyhow::Result;
use backon::{BackoffBuilder, ExponentialBuilder};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Configuration for the delay between condition checks.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Initial delay between checks
    pub initial_delay: Duration,
    /// Maximum delay between checks (cap for exponential growth)
    pub max_delay: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(15),
        }
    }
}

/// Poll `check` until it returns `Ok(true)`.
///
/// `Ok(false)` retries after the next backoff delay; an error stops the
/// wait and propagates to the caller.
pub async fn wait_for_condition<F, Fut>(config: WaitConfig, check: F, what: &str) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let backoff = ExponentialBuilder::default()
        .with_min_delay(config.initial_delay)
        .with_max_delay(config.max_delay)
        .with_factor(2.0)
        .with_jitter()
        .build();

    let mut delays = backoff.into_iter();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        if check().await? {
            debug!(condition = %what, attempts, "condition met");
            return Ok(());
        }

        let delay = delays.next().unwrap_or(config.max_delay);
        debug!(
            condition = %what,
            attempt = attempts,
            delay_ms = delay.as_millis(),
            "condition not met, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn returns_once_condition_holds() {
        let checks = AtomicU32::new(0);
        wait_for_condition(
            WaitConfig::default(),
            || async {
                let n = checks.fetch_add(1, Ordering::SeqCst);
                Ok(n >= 2)
            },
            "test condition",
        )
        .await
        .unwrap();
        assert_eq!(checks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn propagates_check_errors() {
        let result = wait_for_condition(
            WaitConfig::default(),
            || async { anyhow::bail!("boom") },
            "failing condition",
        )
        .await;
        assert!(result.is_err());
    }
}
