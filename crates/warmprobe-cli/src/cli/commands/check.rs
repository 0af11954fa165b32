//! `warmprobe check` – check targets and report pass/fail per target.

use anyhow::Result;
use warmprobe_core::config::ProbeConfig;
use warmprobe_core::{run_batch, BatchReport, HttpFactory, RetryPolicy};

pub async fn run_check(
    cfg: &ProbeConfig,
    targets: &[String],
    policy: &RetryPolicy,
    base_url: Option<&str>,
    json: bool,
) -> Result<()> {
    tracing::info!(
        targets = targets.len(),
        max_attempts = policy.max_attempts,
        "checking targets"
    );
    let factory = HttpFactory::new(base_url, cfg.method)?;
    let report = run_batch(&factory, targets, policy).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }
    report.ensure_all_succeeded()
}

fn print_table(report: &BatchReport) {
    println!("{:<6} {:<7} {:<9} {}", "RESULT", "STATUS", "ATTEMPTS", "TARGET");
    for e in &report.entries {
        let status = e
            .result
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let verdict = if e.result.succeeded { "ok" } else { "FAIL" };
        println!(
            "{:<6} {:<7} {:<9} {}",
            verdict, status, e.result.attempts, e.target
        );
        if let Some(err) = &e.result.error {
            println!("       {}", err);
        }
    }
}
