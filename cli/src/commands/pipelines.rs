// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Ranked pipeline listing

use anyhow::Result;
use colored::Colorize;

use aegis_warden_core::ControlPlane;

pub async fn run(control: &ControlPlane) -> Result<()> {
    let ranked = control.ranked_pipelines().await;
    if ranked.is_empty() {
        println!("{}", "No pipelines known to policy, taxonomy, or demand.".dimmed());
        return Ok(());
    }

    println!("{}", "Pipelines (decision order):".bold());
    for pipeline in ranked {
        let gate = if pipeline.enabled {
            "enabled ".green()
        } else {
            "disabled".red()
        };
        let intent = if pipeline.intended {
            format!("intended [{}]", pipeline.signals.join(", ")).yellow()
        } else {
            "idle".dimmed()
        };
        println!(
            "  {:<16} {}  {}  {}",
            pipeline.name.bold(),
            gate,
            intent,
            pipeline.reason.dimmed()
        );
    }
    Ok(())
}
