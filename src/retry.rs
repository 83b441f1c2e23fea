use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::JourneyError;

/// Fixed-budget retry around a fallible async operation.
///
/// Retryable failures wait a fixed delay and re-attempt up to
/// `max_attempts` total; the final failure is surfaced unchanged.
/// Non-retryable failures are surfaced immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Run `op` under this policy. `on_retry(next_attempt, max_attempts)`
    /// fires before each re-attempt so the caller can record and surface
    /// retry progress; the policy itself writes no step records.
    pub async fn run<T, F, Fut>(
        &self,
        mut op: F,
        mut on_retry: impl FnMut(u32, u32),
    ) -> Result<T, JourneyError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, JourneyError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    on_retry(attempt + 1, self.max_attempts);
                    sleep(self.delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
