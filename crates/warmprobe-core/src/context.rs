//! Execution contexts: where probes run and where the executor waits between attempts.
//!
//! A context is acquired from a [`ContextFactory`] for exactly one check and
//! released afterwards, so cookies, connections and any other per-probe state
//! never leak from one target to the next.

use std::future::Future;
use std::time::Duration;

use crate::error::HarnessError;
use crate::retry::{AttemptError, ContextClosed};

/// One isolated execution context.
pub trait ProbeContext {
    /// Probe `target` once, bounded by `timeout`. Returns the HTTP status or a transport error.
    ///
    /// Must be safe to call repeatedly for the same target.
    fn invoke(
        &mut self,
        target: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<u32, AttemptError>>;

    /// Suspend for `delay`. Fails with [`ContextClosed`] if the context is torn down meanwhile.
    fn wait(&mut self, delay: Duration) -> impl Future<Output = Result<(), ContextClosed>>;
}

/// Hands out fresh contexts and takes them back.
pub trait ContextFactory {
    type Context: ProbeContext;

    fn acquire(&self) -> impl Future<Output = Result<Self::Context, HarnessError>>;

    fn release(&self, context: Self::Context) -> impl Future<Output = Result<(), HarnessError>>;

    /// Synchronous release for a check dropped before `release` could be awaited.
    fn release_on_drop(&self, context: Self::Context) {
        drop(context);
    }
}
