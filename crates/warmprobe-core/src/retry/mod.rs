//! Retry and backoff policy for reachability probes.
//!
//! This module classifies each attempt (200 success, 3xx/4xx terminal, 5xx and
//! transport errors transient), computes the linear budget-capped backoff, and
//! runs the retry loop so that the scoped wrapper and batch runner share one
//! consistent policy.

mod backoff;
mod classify;
mod error;
mod policy;
mod result;
mod run;

pub use backoff::compute_delay;
pub use classify::{classify, classify_error, classify_status, Outcome, HTTP_OK, HTTP_SERVER_ERROR};
pub use error::{AttemptError, ContextClosed};
pub use policy::{Profile, RetryDecision, RetryPolicy};
pub use result::{CheckResult, EXHAUSTED_MESSAGE};
pub use run::execute;
