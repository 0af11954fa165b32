use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::backoff::compute_delay;
use super::classify::Outcome;

/// Decision returned by the retry policy after a classified attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop: the outcome is final, attempts are used up, or no wait budget remains.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Attempt and wait limits for one check.
///
/// Immutable once built; copy it freely between checks. `max_total_wait` caps
/// the cumulative sleep between attempts only, while `per_attempt_timeout`
/// bounds each probe on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Must be at least 1.
    pub max_attempts: u32,
    /// Base delay for linear backoff; attempt `i` (0-based) waits `initial_delay * (i + 1)`.
    pub initial_delay: Duration,
    /// Ceiling on the sum of all waits in one check.
    pub max_total_wait: Duration,
    /// Timeout handed to each probe invocation.
    pub per_attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            max_total_wait: Duration::from_millis(30_000),
            per_attempt_timeout: Duration::from_millis(15_000),
        }
    }
}

impl RetryPolicy {
    /// Preset for CI runners, where first requests can trigger slow cold compiles.
    pub const fn ci() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(2000),
            max_total_wait: Duration::from_millis(25_000),
            per_attempt_timeout: Duration::from_millis(15_000),
        }
    }

    /// Preset for a developer machine with an already warm server.
    pub const fn local() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(500),
            max_total_wait: Duration::from_millis(10_000),
            per_attempt_timeout: Duration::from_millis(10_000),
        }
    }

    /// Short policy used to pre-warm routes before the real checks.
    pub const fn warmup() -> Self {
        Self::local()
    }

    pub fn is_valid(&self) -> bool {
        self.max_attempts >= 1
    }

    /// Decide whether to retry after `attempts_made` attempts ended in `outcome`,
    /// given `total_waited` already spent sleeping in this check.
    pub fn decide(&self, attempts_made: u32, outcome: &Outcome, total_waited: Duration) -> RetryDecision {
        if outcome.is_final() || attempts_made >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        let delay = compute_delay(attempts_made.saturating_sub(1), self, total_waited);
        if delay.is_zero() {
            RetryDecision::NoRetry
        } else {
            RetryDecision::RetryAfter(delay)
        }
    }
}

/// Named environment profile; the caller picks one, nothing is read from the environment here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Ci,
    Local,
}

impl Profile {
    /// Map an environment flag the caller already evaluated (e.g. `CI` is set) to a profile.
    pub fn detect(running_in_ci: bool) -> Self {
        if running_in_ci {
            Profile::Ci
        } else {
            Profile::Local
        }
    }

    pub fn policy(self) -> RetryPolicy {
        match self {
            Profile::Ci => RetryPolicy::ci(),
            Profile::Local => RetryPolicy::local(),
        }
    }
}
