use std::time::Duration;

use schemagen_core::{FailureClass, FetchRequest};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Decides whether the attempt just made (1-indexed) may be followed by another.
///
/// Only transient classes retry, and only while `attempt <= max_retries`.
pub fn should_retry(attempt: u32, class: FailureClass, max_retries: u32) -> bool {
    class.is_transient() && attempt <= max_retries
}

/// Linear backoff: `backoff_base * attempt`, saturating.
pub fn delay_for(attempt: u32, backoff_base: Duration) -> Duration {
    backoff_base.saturating_mul(attempt)
}

/// Sleeps for `delay` unless `cancel` fires first.
///
/// Returns `false` when cancelled, without waiting out the remaining delay.
pub async fn sleep_with_cancel(delay: Duration, cancel: &CancellationToken) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    if delay.is_zero() {
        return true;
    }

    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        () = sleep(delay) => true,
    }
}

/// Retry limits of one fetch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    max_retries: u32,
    /// Linear backoff unit
    backoff_base: Duration,
}

impl RetryPolicy {
    /// Creates a policy from explicit limits.
    pub const fn new(max_retries: u32, backoff_base: Duration) -> Self {
        Self {
            max_retries,
            backoff_base,
        }
    }

    /// Takes the limits configured on a request.
    pub fn from_request(request: &FetchRequest) -> Self {
        Self::new(request.max_retries(), request.backoff_base())
    }

    /// See [`should_retry`].
    pub fn allows_retry(&self, attempt: u32, class: FailureClass) -> bool {
        should_retry(attempt, class, self.max_retries)
    }

    /// See [`delay_for`].
    pub fn backoff(&self, attempt: u32) -> Duration {
        delay_for(attempt, self.backoff_base)
    }

    /// Maximum number of attempts a single fetch may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}
