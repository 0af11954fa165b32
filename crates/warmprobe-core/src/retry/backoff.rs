//! Linear backoff capped by the remaining wait budget.

use std::time::Duration;

use super::policy::RetryPolicy;

/// Delay before the attempt following `attempt_index` (0-based).
///
/// `initial_delay * (attempt_index + 1)`, capped at what is left of
/// `max_total_wait` after `total_waited`. A zero result means the budget is
/// spent and the caller must stop without waiting.
pub fn compute_delay(attempt_index: u32, policy: &RetryPolicy, total_waited: Duration) -> Duration {
    let linear = policy
        .initial_delay
        .saturating_mul(attempt_index.saturating_add(1));
    let remaining = policy.max_total_wait.saturating_sub(total_waited);
    linear.min(remaining)
}
