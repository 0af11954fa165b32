//! `warmprobe config` – show where the config lives and the policy it resolves to.

use anyhow::Result;
use warmprobe_core::config::{self, ProbeConfig};

use crate::cli::policy_for;

pub fn run_config(cfg: &ProbeConfig) -> Result<()> {
    let path = config::config_path()?;
    let policy = policy_for(cfg, None)?;
    println!("config:        {}", path.display());
    println!(
        "policy:        max_attempts={} initial_delay={}ms max_total_wait={}ms per_attempt_timeout={}ms",
        policy.max_attempts,
        policy.initial_delay.as_millis(),
        policy.max_total_wait.as_millis(),
        policy.per_attempt_timeout.as_millis()
    );
    println!("method:        {:?}", cfg.method);
    println!("base_url:      {}", cfg.base_url.as_deref().unwrap_or("-"));
    println!("warmup_routes: {}", cfg.warmup_routes.join(" "));
    Ok(())
}
