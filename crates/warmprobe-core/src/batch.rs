//! Run scoped checks over many targets and collect per-target results.
//!
//! Targets are checked one at a time so at most one extra execution context
//! is alive. A failed check never stops the batch; callers decide what a
//! failure means for the overall run.

use anyhow::Result;
use serde::Serialize;

use crate::context::ContextFactory;
use crate::error::HarnessError;
use crate::retry::{CheckResult, RetryPolicy};
use crate::scope::check_scoped;

/// Routes that are usually slow on first hit (on-demand compilation).
pub const DEFAULT_WARMUP_ROUTES: &[&str] = &["/", "/about", "/domains", "/auth"];

/// Result of checking one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub target: String,
    pub result: CheckResult,
}

/// All per-target results of one batch, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub entries: Vec<TargetReport>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.entries.iter().all(|e| e.result.succeeded)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TargetReport> {
        self.entries.iter().filter(|e| !e.result.succeeded)
    }

    pub fn succeeded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.result.succeeded).count()
    }

    /// Error listing every failed target, or Ok if all passed.
    pub fn ensure_all_succeeded(&self) -> Result<()> {
        let failed: Vec<String> = self
            .failures()
            .map(|e| {
                format!(
                    "{} ({})",
                    e.target,
                    e.result.error.as_deref().unwrap_or("failed")
                )
            })
            .collect();
        if failed.is_empty() {
            return Ok(());
        }
        anyhow::bail!(
            "{} of {} target(s) failed: {}",
            failed.len(),
            self.entries.len(),
            failed.join(", ")
        );
    }
}

/// Check every target in order with a fresh context each, without short-circuiting.
///
/// Only harness faults (context acquire/release) abort the batch.
pub async fn run_batch<F, T>(
    factory: &F,
    targets: &[T],
    policy: &RetryPolicy,
) -> Result<BatchReport, HarnessError>
where
    F: ContextFactory,
    T: AsRef<str>,
{
    let mut report = BatchReport {
        entries: Vec::with_capacity(targets.len()),
    };
    for target in targets {
        let target = target.as_ref();
        let result = check_scoped(factory, target, policy).await?;
        if result.succeeded {
            tracing::info!(probe = %target, attempts = result.attempts, "check passed");
        } else {
            tracing::warn!(
                probe = %target,
                attempts = result.attempts,
                status = ?result.status,
                error = ?result.error,
                "check failed"
            );
        }
        report.entries.push(TargetReport {
            target: target.to_string(),
            result,
        });
    }
    Ok(report)
}

/// Hit each route once under the short warm-up policy so later checks see a warm server.
///
/// Check failures are ignored; returns how many routes answered 200.
pub async fn warmup<F, T>(factory: &F, routes: &[T]) -> Result<usize, HarnessError>
where
    F: ContextFactory,
    T: AsRef<str>,
{
    let report = run_batch(factory, routes, &RetryPolicy::warmup()).await?;
    let warmed = report.succeeded_count();
    tracing::info!("warm-up: {}/{} route(s) answered 200", warmed, routes.len());
    Ok(warmed)
}

/// Turn a failed check into an error carrying the status and attempt count.
pub fn ensure_success(target: &str, result: &CheckResult) -> Result<()> {
    if result.succeeded {
        return Ok(());
    }
    let status = result
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());
    anyhow::bail!(
        "check of {} should succeed (status: {}, attempts: {}): {}",
        target,
        status,
        result.attempts,
        result.error.as_deref().unwrap_or("failed")
    );
}
