// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Genome Registry - Genome Registry Context
//!
//! Joins the persona definitions on disk with the append-only decision log
//! and the standings table to produce activity-ranked [`GenomeEntry`] views.
//! The log and standings are best-effort reads (empty on failure); toggling
//! a persona's enabled marker is the one write, delegated to the persona
//! store's atomic rename.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::collaborators::{
    DecisionLog, DecisionRecord, PersonaStore, StandingEntry, StandingsTable, DECISION_TYPE_SPAWN,
};
use crate::domain::genome::{engine_for_persona, persona_name, GenomeEntry, GenomeError};

pub struct GenomeRegistry {
    personas: Arc<dyn PersonaStore>,
    decisions: Arc<dyn DecisionLog>,
    standings: Arc<dyn StandingsTable>,
}

#[derive(Default)]
struct ActivityCounters {
    spawns_today: u64,
    decisions_count: u64,
    points_earned: i64,
    last_active_at: Option<DateTime<Utc>>,
}

impl GenomeRegistry {
    pub fn new(
        personas: Arc<dyn PersonaStore>,
        decisions: Arc<dyn DecisionLog>,
        standings: Arc<dyn StandingsTable>,
    ) -> Self {
        Self { personas, decisions, standings }
    }

    /// All persona definitions with their activity counters, sorted by
    /// descending activity score, ties broken by name ascending.
    pub async fn list(&self) -> Vec<GenomeEntry> {
        let definitions = match self.personas.list().await {
            Ok(definitions) => definitions,
            Err(e) => {
                warn!(error = %e, "Persona store unreadable; listing no genomes");
                Vec::new()
            }
        };

        let (decisions, standings) = tokio::join!(self.decisions.records(), self.standings.standings());
        let decisions = decisions.unwrap_or_else(|e| {
            warn!(error = %e, "Decision log unreadable; activity counters start at zero");
            Vec::new()
        });
        let standings = standings.unwrap_or_else(|e| {
            warn!(error = %e, "Standings table unreadable; points start at zero");
            Vec::new()
        });

        let counters = aggregate_activity(&decisions, &standings);

        let mut entries: Vec<GenomeEntry> = definitions
            .into_iter()
            .map(|definition| {
                let activity = counters.get(&definition.name);
                GenomeEntry {
                    engine: engine_for_persona(&definition.name).map(str::to_string),
                    enabled: definition.enabled,
                    spawns_today: activity.map(|a| a.spawns_today).unwrap_or_default(),
                    points_earned: activity.map(|a| a.points_earned).unwrap_or_default(),
                    decisions_count: activity.map(|a| a.decisions_count).unwrap_or_default(),
                    last_active_at: activity.and_then(|a| a.last_active_at),
                    name: definition.name,
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.activity_score()
                .cmp(&a.activity_score())
                .then_with(|| a.name.cmp(&b.name))
        });
        entries
    }

    /// Flip one persona's enabled marker and return the refreshed registry.
    /// Idempotent: requesting the already-held state changes nothing.
    pub async fn set_enabled(&self, name: &str, enabled: bool) -> Result<Vec<GenomeEntry>, GenomeError> {
        self.personas.set_enabled(name, enabled).await?;
        info!(persona = name, enabled, "Genome availability toggled");
        Ok(self.list().await)
    }
}

fn aggregate_activity(
    decisions: &[DecisionRecord],
    standings: &[StandingEntry],
) -> BTreeMap<String, ActivityCounters> {
    let mut counters: BTreeMap<String, ActivityCounters> = BTreeMap::new();
    let today = Local::now().date_naive();

    for record in decisions {
        let entry = counters.entry(record.persona.clone()).or_default();
        entry.decisions_count += 1;
        if record.decision_type == DECISION_TYPE_SPAWN
            && record.timestamp.with_timezone(&Local).date_naive() == today
        {
            entry.spawns_today += 1;
        }
        entry.last_active_at = match entry.last_active_at {
            Some(seen) if seen >= record.timestamp => Some(seen),
            _ => Some(record.timestamp),
        };
    }

    for standing in standings {
        let name = persona_name(&standing.engine, &standing.role);
        counters.entry(name).or_default().points_earned += standing.points;
    }

    counters
}
