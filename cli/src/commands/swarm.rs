// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Fleet-wide pause/resume commands
//!
//! Commands: pause, resume, status

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use aegis_warden_core::domain::pause::{PauseOutcome, ResumeOutcome};
use aegis_warden_core::ControlPlane;

#[derive(Subcommand)]
pub enum SwarmCommand {
    /// Disable every execution engine, snapshotting the current state
    Pause {
        /// Also terminate all running agent processes (best effort)
        #[arg(long)]
        kill: bool,

        /// Operator recorded in the pause state
        #[arg(long, default_value = "cli")]
        requested_by: String,
    },

    /// Restore the exact pre-pause engine configuration
    Resume,

    /// Show the current pause state
    Status,
}

pub async fn run(control: &ControlPlane, command: SwarmCommand) -> Result<()> {
    match command {
        SwarmCommand::Pause { kill, requested_by } => pause(control, kill, &requested_by).await,
        SwarmCommand::Resume => resume(control).await,
        SwarmCommand::Status => status(control).await,
    }
}

async fn pause(control: &ControlPlane, kill: bool, requested_by: &str) -> Result<()> {
    match control.pause_swarm(kill, requested_by).await? {
        PauseOutcome::Paused { engines_disabled, agents_killed } => {
            println!(
                "{} {engines_disabled} engines disabled, {agents_killed} agents terminated",
                "Fleet paused.".red().bold()
            );
        }
        PauseOutcome::AlreadyPaused => {
            println!("{}", "Fleet is already paused; nothing changed.".yellow());
        }
    }
    Ok(())
}

async fn resume(control: &ControlPlane) -> Result<()> {
    match control.resume_swarm().await? {
        ResumeOutcome::Resumed { engines_restored, snapshot_missing } => {
            if snapshot_missing {
                println!(
                    "{} {engines_restored} engines re-enabled (pre-pause snapshot was missing)",
                    "Fleet resumed with recovery defaults.".yellow().bold()
                );
            } else {
                println!(
                    "{} {engines_restored} engines restored to their pre-pause state",
                    "Fleet resumed.".green().bold()
                );
            }
        }
        ResumeOutcome::NotPaused => {
            println!("{}", "Fleet is not paused; nothing changed.".yellow());
        }
    }
    Ok(())
}

async fn status(control: &ControlPlane) -> Result<()> {
    let state = control.pause_state().await;
    if state.paused {
        println!("{}", "PAUSED".red().bold());
        if let Some(at) = state.paused_at {
            println!("  since: {at}");
        }
        if let Some(by) = &state.paused_by {
            println!("  by:    {by}");
        }
        let engines = state
            .previous_engine_state
            .map(|snapshot| snapshot.len())
            .unwrap_or(0);
        println!("  snapshot: {engines} engines");
    } else {
        println!("{}", "RUNNING".green().bold());
    }
    Ok(())
}
