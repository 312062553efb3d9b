// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Policy record commands
//!
//! Commands: get, set

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;

use aegis_warden_core::domain::policy::PolicyScope;
use aegis_warden_core::ControlPlane;

#[derive(Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    Pipelines,
    Engines,
}

impl From<ScopeArg> for PolicyScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::Pipelines => PolicyScope::Pipeline,
            ScopeArg::Engines => PolicyScope::Engine,
        }
    }
}

#[derive(Subcommand)]
pub enum PolicyCommand {
    /// Show one record (or the whole document)
    Get {
        scope: ScopeArg,

        /// Record name; omit to dump the full document
        name: Option<String>,
    },

    /// Toggle a record
    Set {
        scope: ScopeArg,
        name: String,

        /// Allow spawning against this name
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Forbid spawning against this name
        #[arg(long)]
        disable: bool,

        /// Reason recorded alongside the toggle
        #[arg(long)]
        reason: Option<String>,
    },
}

pub async fn run(control: &ControlPlane, command: PolicyCommand) -> Result<()> {
    match command {
        PolicyCommand::Get { scope, name } => get(control, scope.into(), name).await,
        PolicyCommand::Set { scope, name, enable, disable, reason } => {
            let enabled = enable || !disable;
            set(control, scope.into(), &name, enabled, reason).await
        }
    }
}

async fn get(control: &ControlPlane, scope: PolicyScope, name: Option<String>) -> Result<()> {
    match name {
        Some(name) => {
            let record = control.get_policy(scope, &name).await;
            print_record(&name, record.enabled, &record.reason);
        }
        None => {
            let document = control.policy_document(scope).await;
            if document.records.is_empty() {
                println!("{}", "No persisted records; everything is allow-by-default.".dimmed());
            }
            for (name, record) in &document.records {
                print_record(name, record.enabled, &record.reason);
            }
        }
    }
    Ok(())
}

async fn set(
    control: &ControlPlane,
    scope: PolicyScope,
    name: &str,
    enabled: bool,
    reason: Option<String>,
) -> Result<()> {
    let record = control.set_policy(scope, name, enabled, reason).await?;
    print_record(name, record.enabled, &record.reason);
    Ok(())
}

fn print_record(name: &str, enabled: bool, reason: &str) {
    let gate = if enabled { "enabled ".green() } else { "disabled".red() };
    println!("  {:<16} {}  {}", name.bold(), gate, reason.dimmed());
}
