//! Retry of transient relational failures.
//!
//! Only failures whose message looks like a dropped connection, pool
//! exhaustion, or a deadlock are retried. Everything else propagates on the
//! first attempt.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Lower-cased fragments that mark an error message as transient.
pub const TRANSIENT_ERROR_PATTERNS: &[&str] = &[
    "connection timeout",
    "connection reset",
    "connection terminated",
    "too many clients",
    "deadlock detected",
];

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A single attempt with no retries.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Whether an error message matches one of [`TRANSIENT_ERROR_PATTERNS`].
pub fn is_transient(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_ERROR_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

/// Run `op` until it succeeds, fails with a non-transient error, or the
/// policy's attempts are used up. The last error is returned.
///
/// `label` names the operation in log output.
pub async fn retry_transient<T, E, F, Fut>(policy: RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let message = e.to_string();
                if attempt >= max_attempts || !is_transient(&message) {
                    tracing::error!(operation = label, attempt, error = %message, "Query failed");
                    return Err(e);
                }
                tracing::warn!(
                    operation = label,
                    attempt,
                    max_attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    error = %message,
                    "Transient query failure, retrying",
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
