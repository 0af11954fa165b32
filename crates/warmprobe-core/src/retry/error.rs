//! Error types for a single probe attempt and for the wait between attempts.

use std::fmt;
use std::time::Duration;

/// Error returned by one invocation of a probe (no HTTP status was obtained).
///
/// Every variant is treated as transient by the classifier; the variants are
/// kept apart so diagnostics can say what actually went wrong.
#[derive(Debug)]
pub enum AttemptError {
    /// Curl reported an error (connection refused, DNS, reset, etc.).
    Curl(curl::Error),
    /// The attempt did not finish within the per-attempt timeout.
    Timeout(Duration),
    /// Anything else the transport reported (task join failure, bad URL, test doubles).
    Other(String),
}

impl AttemptError {
    pub fn other(msg: impl Into<String>) -> Self {
        AttemptError::Other(msg.into())
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Curl(e) => write!(f, "{}", e),
            AttemptError::Timeout(d) => write!(f, "attempt timed out after {} ms", d.as_millis()),
            AttemptError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AttemptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttemptError::Curl(e) => Some(e),
            AttemptError::Timeout(_) | AttemptError::Other(_) => None,
        }
    }
}

impl From<curl::Error> for AttemptError {
    fn from(e: curl::Error) -> Self {
        AttemptError::Curl(e)
    }
}

/// Returned by a context's wait when the context was torn down underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextClosed;

impl fmt::Display for ContextClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "execution context closed while waiting to retry")
    }
}

impl std::error::Error for ContextClosed {}
