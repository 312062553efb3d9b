// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # AEGIS Warden CLI
//!
//! The `warden` binary operates the admission-control and fleet-pause
//! control plane for an AEGIS agent fleet.
//!
//! ## Commands
//!
//! - `warden pipelines` - decision-ready pipeline ranking
//! - `warden policy get|set` - inspect and toggle gating records
//! - `warden swarm pause|resume|status` - fleet-wide kill switch
//! - `warden reap` - terminate agents that overran their runtime budget
//! - `warden genome list|enable|disable` - persona registry
//! - `warden serve` - HTTP control-plane daemon with a periodic reaper

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use aegis_warden_core::{ControlPlane, WardenConfig};

mod commands;

use commands::{GenomeCommand, PolicyCommand, SwarmCommand};

/// AEGIS Warden - admission control for the agent fleet
#[derive(Parser)]
#[command(name = "warden")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding the warden's state documents
    #[arg(
        long,
        global = true,
        env = "WARDEN_STATE_DIR",
        value_name = "DIR",
        default_value = "/var/lib/aegis/warden"
    )]
    state_dir: PathBuf,

    /// Work-item tracker snapshot endpoint (file-backed when unset)
    #[arg(long, global = true, env = "WARDEN_TRACKER_URL")]
    tracker_url: Option<String>,

    /// Running-agent registry snapshot endpoint (file-backed when unset)
    #[arg(long, global = true, env = "WARDEN_AGENTS_URL")]
    agents_url: Option<String>,

    /// Stale-agent runtime budget in seconds
    #[arg(long, global = true, env = "WARDEN_STALE_THRESHOLD_SECS", default_value = "7200")]
    stale_threshold_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "WARDEN_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the ranked pipeline gating decisions
    Pipelines,

    /// Inspect or toggle policy records
    #[command(name = "policy")]
    Policy {
        #[command(subcommand)]
        command: PolicyCommand,
    },

    /// Fleet-wide pause/resume
    #[command(name = "swarm")]
    Swarm {
        #[command(subcommand)]
        command: SwarmCommand,
    },

    /// Find and terminate stale agent processes
    Reap {
        /// Runtime budget override in seconds
        #[arg(long)]
        threshold_secs: Option<u64>,

        /// List stale processes without signaling them
        #[arg(long)]
        dry_run: bool,
    },

    /// Persona registry operations
    #[command(name = "genome")]
    Genome {
        #[command(subcommand)]
        command: GenomeCommand,
    },

    /// Run the HTTP control plane with a periodic reaper
    Serve {
        #[arg(long, env = "WARDEN_HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, env = "WARDEN_PORT", default_value = "8700")]
        port: u16,

        /// Prometheus scrape listener port
        #[arg(long, env = "WARDEN_METRICS_PORT", default_value = "9700")]
        metrics_port: u16,

        /// Seconds between periodic reaper passes (0 disables)
        #[arg(long, env = "WARDEN_REAP_INTERVAL_SECS", default_value = "300")]
        reap_interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let mut config = WardenConfig::new(&cli.state_dir);
    config.tracker_url = cli.tracker_url.clone();
    config.agents_url = cli.agents_url.clone();
    config.stale_threshold_secs = cli.stale_threshold_secs;
    let control = std::sync::Arc::new(ControlPlane::new(config));

    match cli.command {
        Commands::Pipelines => commands::pipelines::run(&control).await,
        Commands::Policy { command } => commands::policy::run(&control, command).await,
        Commands::Swarm { command } => commands::swarm::run(&control, command).await,
        Commands::Reap { threshold_secs, dry_run } => {
            commands::reap::run(&control, threshold_secs, dry_run).await
        }
        Commands::Genome { command } => commands::genome::run(&control, command).await,
        Commands::Serve { host, port, metrics_port, reap_interval_secs } => {
            commands::serve::run(control, &host, port, metrics_port, reap_interval_secs).await
        }
    }
}
