//! Scoped check: one fresh execution context per target, always handed back.

use crate::context::ContextFactory;
use crate::error::HarnessError;
use crate::retry::{execute, CheckResult, RetryPolicy};

/// Hands the context back through [`ContextFactory::release_on_drop`] if the
/// check is dropped (cancelled or panicked) before the async release ran.
struct ReleaseGuard<'a, F: ContextFactory> {
    factory: &'a F,
    target: &'a str,
    context: Option<F::Context>,
}

impl<F: ContextFactory> Drop for ReleaseGuard<'_, F> {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            tracing::warn!(probe = %self.target, "check interrupted; releasing context synchronously");
            self.factory.release_on_drop(context);
        }
    }
}

/// Acquire a context from `factory`, run the retry loop for `target` in it, release it.
///
/// Probe failures end up in the returned [`CheckResult`]. Only acquisition or
/// release failures are returned as errors, and they are never retried.
pub async fn check_scoped<F>(
    factory: &F,
    target: &str,
    policy: &RetryPolicy,
) -> Result<CheckResult, HarnessError>
where
    F: ContextFactory,
{
    let context = factory.acquire().await?;
    tracing::debug!(probe = %target, "acquired execution context");

    let mut guard = ReleaseGuard {
        factory,
        target,
        context: None,
    };
    let result = execute(guard.context.insert(context), target, policy).await;

    if let Some(context) = guard.context.take() {
        factory.release(context).await?;
    }
    tracing::debug!(probe = %target, "released execution context");
    Ok(result)
}
