pub mod config;
pub mod logging;

pub mod batch;
pub mod context;
pub mod error;
pub mod http;
pub mod retry;
pub mod scope;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{ensure_success, run_batch, warmup, BatchReport, TargetReport, DEFAULT_WARMUP_ROUTES};
pub use context::{ContextFactory, ProbeContext};
pub use error::HarnessError;
pub use http::{HttpContext, HttpFactory};
pub use retry::{execute, CheckResult, Outcome, Profile, RetryPolicy};
pub use scope::check_scoped;
