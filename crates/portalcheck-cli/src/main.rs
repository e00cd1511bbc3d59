mod compare;
mod inspect;
mod replay;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use portalcheck_core::{AppConfig, RewardsConfig};

#[derive(Debug, Parser)]
#[command(name = "portalcheck")]
#[command(about = "Compare a travel portal price against booking direct")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Drive a full session from a JSON array of flow events.
    Replay {
        /// Path to the event script.
        #[arg(long)]
        script: PathBuf,
        /// Rewards YAML overriding PORTALCHECK_REWARDS_PATH.
        #[arg(long)]
        rewards: Option<PathBuf>,
    },
    /// One-shot comparison of two snapshot files, no session involved.
    Compare {
        /// Portal-side snapshot JSON.
        #[arg(long)]
        portal: PathBuf,
        /// Direct-side snapshot JSON.
        #[arg(long)]
        direct: PathBuf,
        /// Rewards YAML overriding PORTALCHECK_REWARDS_PATH.
        #[arg(long)]
        rewards: Option<PathBuf>,
    },
    /// Show the persisted session record, if any.
    Inspect,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = portalcheck_core::config::load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay { script, rewards } => {
            let rewards = rewards_for(&config, rewards.as_deref())?;
            replay::run(&config, &script, rewards).await
        }
        Commands::Compare {
            portal,
            direct,
            rewards,
        } => {
            let rewards = rewards_for(&config, rewards.as_deref())?;
            compare::run(&portal, &direct, &rewards)
        }
        Commands::Inspect => inspect::run(&config).await,
    }
}

/// Rewards from the `--rewards` flag, the configured YAML file, or the
/// documented defaults, in that order.
fn rewards_for(config: &AppConfig, flag: Option<&Path>) -> anyhow::Result<RewardsConfig> {
    let path = flag.or(config.rewards_path.as_deref());
    match path {
        Some(path) => {
            let rewards = portalcheck_core::load_rewards(path)?;
            tracing::info!(path = %path.display(), "loaded rewards configuration");
            Ok(rewards)
        }
        None => Ok(RewardsConfig::default()),
    }
}
