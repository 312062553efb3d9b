// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Stale-agent reaping command

use anyhow::Result;
use colored::Colorize;

use aegis_warden_core::ControlPlane;

pub async fn run(control: &ControlPlane, threshold_secs: Option<u64>, dry_run: bool) -> Result<()> {
    if dry_run {
        let stale = control.find_stale_agents(threshold_secs).await;
        if stale.is_empty() {
            println!("{}", "No stale agent processes.".green());
            return Ok(());
        }
        println!("{}", format!("{} stale agent process(es):", stale.len()).yellow().bold());
        for record in stale {
            println!(
                "  pid {:<8} {:>8}s  {}",
                record.pid,
                record.elapsed_seconds,
                record.command_line.dimmed()
            );
        }
        return Ok(());
    }

    let report = control.reap_stale_agents(threshold_secs).await;
    if report.details.is_empty() {
        println!("{}", "No stale agent processes.".green());
        return Ok(());
    }
    println!(
        "{}",
        format!("Reaped {}/{} stale agent process(es):", report.killed_count, report.details.len())
            .bold()
    );
    for outcome in report.details {
        let status = match (outcome.killed, outcome.forced) {
            (true, false) => "terminated".green(),
            (true, true) => "force-killed".yellow(),
            (false, _) => "survived".red(),
        };
        println!(
            "  pid {:<8} {}  {}",
            outcome.pid,
            status,
            outcome.command_line.dimmed()
        );
    }
    Ok(())
}
