//! Final result of one check, as handed back to callers.

use serde::Serialize;

/// Used when attempts or budget ran out and no transport error was captured.
pub const EXHAUSTED_MESSAGE: &str = "Navigation failed after all attempts";

/// Outcome of one check: whether the target answered 200, and how it got there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub succeeded: bool,
    /// Last HTTP status seen, if any attempt got a response.
    pub status: Option<u32>,
    /// Number of times the probe was invoked.
    pub attempts: u32,
    /// Human-readable diagnostic for failed checks.
    pub error: Option<String>,
}

impl CheckResult {
    pub fn success(status: u32, attempts: u32) -> Self {
        Self {
            succeeded: true,
            status: Some(status),
            attempts,
            error: None,
        }
    }

    pub fn failure(status: Option<u32>, attempts: u32, error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            status,
            attempts,
            error: Some(error.into()),
        }
    }
}
