//! Harness-level failures: setting up or tearing down execution contexts.
//!
//! These are configuration or environment faults, not probe failures, so they
//! are never retried and are the only errors that escape a check.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to acquire execution context: {0}")]
    Acquire(String),
    #[error("failed to release execution context: {0}")]
    Release(String),
    #[error("execution context factory is shut down")]
    ShutDown,
    #[error(transparent)]
    Curl(#[from] curl::Error),
}
