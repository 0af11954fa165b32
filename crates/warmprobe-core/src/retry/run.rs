//! Retry loop: probe a target until it answers 200, fails terminally, or limits run out.

use std::time::Duration;

use super::classify::{classify, Outcome};
use super::policy::{RetryDecision, RetryPolicy};
use super::result::{CheckResult, EXHAUSTED_MESSAGE};
use crate::context::ProbeContext;

/// Mutable bookkeeping for one `execute` call. Never outlives the call.
#[derive(Debug, Default)]
struct ExecutionState {
    attempts_made: u32,
    total_waited: Duration,
    last_outcome: Option<Outcome>,
    /// Most recent status any attempt got back (kept when a later attempt errors).
    last_status: Option<u32>,
    /// Most recent transport error message.
    last_error: Option<String>,
}

impl ExecutionState {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Success { status } | Outcome::TerminalFailure { status } => {
                self.last_status = Some(*status);
            }
            Outcome::TransientFailure { status, error } => {
                if let Some(s) = status {
                    self.last_status = Some(*s);
                }
                if let Some(e) = error {
                    self.last_error = Some(e.clone());
                }
            }
            Outcome::Aborted { .. } => {}
        }
        self.last_outcome = Some(outcome.clone());
    }

    fn into_result(self) -> CheckResult {
        let attempts = self.attempts_made;
        match self.last_outcome {
            Some(Outcome::Success { status }) => CheckResult::success(status, attempts),
            Some(Outcome::TerminalFailure { status }) => {
                CheckResult::failure(Some(status), attempts, format!("Received status {}", status))
            }
            Some(Outcome::Aborted { error }) => CheckResult::failure(self.last_status, attempts, error),
            Some(Outcome::TransientFailure { .. }) | None => CheckResult::failure(
                self.last_status,
                attempts,
                self.last_error.unwrap_or_else(|| EXHAUSTED_MESSAGE.to_string()),
            ),
        }
    }
}

/// Probe `target` through `ctx` under `policy` and return the final result.
///
/// Attempts run strictly one after another. 3xx/4xx stop immediately; 5xx and
/// transport errors are retried after a linear, budget-capped wait. If the
/// wait fails because the context was torn down the check is aborted without
/// another attempt. Never returns an error: every exit is a [`CheckResult`].
pub async fn execute<C>(ctx: &mut C, target: &str, policy: &RetryPolicy) -> CheckResult
where
    C: ProbeContext + ?Sized,
{
    let mut state = ExecutionState::default();

    while state.attempts_made < policy.max_attempts {
        if state.total_waited >= policy.max_total_wait {
            tracing::debug!(probe = %target, "wait budget spent, not starting another attempt");
            break;
        }

        state.attempts_made += 1;
        let raw = ctx.invoke(target, policy.per_attempt_timeout).await;
        let outcome = classify(&raw);
        tracing::debug!(
            probe = %target,
            attempt = state.attempts_made,
            outcome = ?outcome,
            "probe attempt finished"
        );
        state.record(&outcome);

        match policy.decide(state.attempts_made, &outcome, state.total_waited) {
            RetryDecision::NoRetry => break,
            RetryDecision::RetryAfter(delay) => {
                tracing::info!(
                    probe = %target,
                    attempt = state.attempts_made,
                    delay_ms = delay.as_millis() as u64,
                    "transient failure, retrying"
                );
                if let Err(e) = ctx.wait(delay).await {
                    tracing::warn!(probe = %target, attempt = state.attempts_made, "retry aborted: {}", e);
                    state.record(&Outcome::Aborted {
                        error: e.to_string(),
                    });
                    break;
                }
                state.total_waited += delay;
            }
        }
    }

    let result = state.into_result();
    if !result.succeeded {
        tracing::debug!(probe = %target, attempts = result.attempts, error = ?result.error, "check failed");
    }
    result
}
