//! CLI for warmprobe.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use warmprobe_core::config::{self, ProbeConfig};
use warmprobe_core::{Profile, RetryPolicy};

use commands::{run_check, run_config, run_warmup};

/// Top-level CLI for warmprobe.
#[derive(Debug, Parser)]
#[command(name = "warmprobe")]
#[command(about = "warmprobe: reachability checks that ride out server warm-up", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Retry profile selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Ci,
    Local,
}

impl From<ProfileArg> for Profile {
    fn from(p: ProfileArg) -> Self {
        match p {
            ProfileArg::Ci => Profile::Ci,
            ProfileArg::Local => Profile::Local,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check that every target answers 200; exits non-zero if any fails.
    Check {
        /// Absolute URLs or routes (e.g. /about) joined onto the base URL.
        #[arg(required = true)]
        targets: Vec<String>,

        /// Retry profile; defaults to `ci` when the CI environment variable is set.
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,

        /// Base URL for relative routes (overrides config).
        #[arg(long)]
        base_url: Option<String>,

        /// Print the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Hit routes once so later checks see a warm server. Failures are ignored.
    Warmup {
        /// Routes to warm; defaults to `warmup_routes` from the config.
        routes: Vec<String>,

        /// Base URL for relative routes (overrides config).
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show the config file path and the retry policy this environment resolves to.
    Config,
}

/// True when running under CI (`CI` set to a non-empty value).
pub fn running_in_ci() -> bool {
    std::env::var("CI").map(|v| !v.is_empty()).unwrap_or(false)
}

/// Policy for this run: `--profile` if given, otherwise config, otherwise environment detection.
pub fn policy_for(cfg: &ProbeConfig, profile: Option<ProfileArg>) -> Result<RetryPolicy> {
    match profile {
        Some(p) => Ok(Profile::from(p).policy()),
        None => cfg.resolve_policy(Profile::detect(running_in_ci())),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Check {
                targets,
                profile,
                base_url,
                json,
            } => {
                let policy = policy_for(&cfg, profile)?;
                let base_url = base_url.as_deref().or(cfg.base_url.as_deref());
                run_check(&cfg, &targets, &policy, base_url, json).await?;
            }
            CliCommand::Warmup { routes, base_url } => {
                let routes = if routes.is_empty() {
                    cfg.warmup_routes.clone()
                } else {
                    routes
                };
                let base_url = base_url.as_deref().or(cfg.base_url.as_deref());
                run_warmup(&cfg, &routes, base_url).await?;
            }
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
