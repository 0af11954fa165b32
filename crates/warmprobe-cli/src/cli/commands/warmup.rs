//! `warmprobe warmup` – pre-warm routes; never fails on unreachable routes.

use anyhow::Result;
use warmprobe_core::config::ProbeConfig;
use warmprobe_core::{warmup, HttpFactory};

pub async fn run_warmup(cfg: &ProbeConfig, routes: &[String], base_url: Option<&str>) -> Result<()> {
    let factory = HttpFactory::new(base_url, cfg.method)?;
    let warmed = warmup(&factory, routes).await?;
    println!("Warmed {}/{} route(s).", warmed, routes.len());
    Ok(())
}
