// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Persona registry commands
//!
//! Commands: list, enable, disable

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use aegis_warden_core::domain::genome::GenomeEntry;
use aegis_warden_core::ControlPlane;

#[derive(Subcommand)]
pub enum GenomeCommand {
    /// List personas with activity counters, most active first
    List,

    /// Make a persona available for spawning
    Enable { name: String },

    /// Withdraw a persona from spawning
    Disable { name: String },
}

pub async fn run(control: &ControlPlane, command: GenomeCommand) -> Result<()> {
    let genomes = match command {
        GenomeCommand::List => control.list_genomes().await,
        GenomeCommand::Enable { name } => control.set_genome_enabled(&name, true).await?,
        GenomeCommand::Disable { name } => control.set_genome_enabled(&name, false).await?,
    };
    print_table(&genomes);
    Ok(())
}

fn print_table(genomes: &[GenomeEntry]) {
    if genomes.is_empty() {
        println!("{}", "No persona definitions found.".dimmed());
        return;
    }
    println!(
        "{}",
        format!(
            "  {:<24} {:<10} {:<9} {:>6} {:>7} {:>10}",
            "persona", "engine", "state", "spawns", "points", "decisions"
        )
        .bold()
    );
    for genome in genomes {
        let state = if genome.enabled { "enabled".green() } else { "disabled".red() };
        println!(
            "  {:<24} {:<10} {:<9} {:>6} {:>7} {:>10}",
            genome.name,
            genome.engine.as_deref().unwrap_or("-"),
            state,
            genome.spawns_today,
            genome.points_earned,
            genome.decisions_count
        );
    }
}
