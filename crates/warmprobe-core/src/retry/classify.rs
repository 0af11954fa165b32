//! Classify one attempt's raw result (HTTP status or transport error) into an outcome.

use super::error::AttemptError;

/// The only status treated as success.
pub const HTTP_OK: u32 = 200;
/// Statuses at or above this are server errors and worth retrying.
pub const HTTP_SERVER_ERROR: u32 = 500;

/// Classified outcome of an attempt, or of the whole check once it stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Target answered 200.
    Success { status: u32 },
    /// Definitive rejection (redirect, client error, any other non-200 below 500). Never retried.
    TerminalFailure { status: u32 },
    /// Server error or transport failure. Retried while attempts and budget remain.
    TransientFailure {
        status: Option<u32>,
        error: Option<String>,
    },
    /// The execution context went away during a wait.
    Aborted { error: String },
}

impl Outcome {
    /// True for outcomes after which no further attempt may happen.
    pub fn is_final(&self) -> bool {
        !matches!(self, Outcome::TransientFailure { .. })
    }
}

/// Classify an HTTP status code.
pub fn classify_status(status: u32) -> Outcome {
    match status {
        HTTP_OK => Outcome::Success { status },
        s if s >= HTTP_SERVER_ERROR => Outcome::TransientFailure {
            status: Some(s),
            error: None,
        },
        s => Outcome::TerminalFailure { status: s },
    }
}

/// Classify a transport error. Every error kind is retryable.
pub fn classify_error(e: &AttemptError) -> Outcome {
    Outcome::TransientFailure {
        status: None,
        error: Some(e.to_string()),
    }
}

/// Classify the raw result of one attempt.
pub fn classify(result: &Result<u32, AttemptError>) -> Outcome {
    match result {
        Ok(status) => classify_status(*status),
        Err(e) => classify_error(e),
    }
}
