use std::future::Future;
use std::time::Duration;

/// Bounded retry with exponential backoff between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }

    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-based): initial, 2x initial, 4x initial, ...
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_backoff.saturating_mul(factor)
    }

    /// Run `op` until it succeeds or the attempts run out. Returns the value and
    /// the number of attempts used, or the last error.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<(T, u32), E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok((value, attempt)),
                Err(e) if attempt >= max_attempts => {
                    tracing::warn!("{} failed after {} attempts: {}", label, attempt, e);
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        "{} attempt {}/{} failed: {} (retrying in {:?})",
                        label,
                        attempt,
                        max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
