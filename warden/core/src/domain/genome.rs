// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Genome (Agent Persona) Aggregates - Genome Registry Context
//!
//! A genome is a named, versioned behavioral definition an agent is spawned
//! with. Persona names carry the hosting engine as a fixed prefix
//! (`codex_builder` = role `builder` on the `codex` engine); the prefix
//! vocabulary below is the single source of truth for that derivation, shared
//! with the demand detector's live-agent attribution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Execution engines hosting agent processes, in prefix-match order.
pub const ENGINES: &[&str] = &["claude", "codex", "opencode", "gemini"];

/// Derive the engine from a persona name's prefix, if any.
pub fn engine_for_persona(name: &str) -> Option<&'static str> {
    ENGINES
        .iter()
        .find(|engine| {
            name.strip_prefix(*engine)
                .and_then(|rest| rest.strip_prefix('_'))
                .is_some()
        })
        .copied()
}

/// Strip a known engine prefix to obtain the bare role. Names without a
/// known prefix are returned unchanged.
pub fn strip_engine_prefix(name: &str) -> &str {
    for engine in ENGINES {
        if let Some(rest) = name.strip_prefix(engine).and_then(|rest| rest.strip_prefix('_')) {
            return rest;
        }
    }
    name
}

/// Re-derive the persona name a standings entry accrues points under.
pub fn persona_name(engine: &str, role: &str) -> String {
    format!("{engine}_{role}")
}

/// One persona definition joined with its activity counters.
///
/// Derived by joining persona definitions on disk with the append-only
/// decision log and the standings table; never mutated directly except the
/// enabled marker (see `GenomeRegistry::set_enabled`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeEntry {
    pub name: String,
    /// Hosting engine derived from the name prefix; `None` when the name
    /// matches no known prefix.
    pub engine: Option<String>,
    pub enabled: bool,
    pub spawns_today: u64,
    pub points_earned: i64,
    pub decisions_count: u64,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl GenomeEntry {
    /// Composite activity score used for registry ordering.
    pub fn activity_score(&self) -> i64 {
        self.spawns_today as i64 * 10 + self.points_earned
    }
}

#[derive(Debug, Error)]
pub enum GenomeError {
    #[error("Persona '{0}' not found")]
    NotFound(String),

    #[error("Failed to read persona store: {0}")]
    Read(String),

    #[error("Failed to toggle persona '{name}': {source_msg}")]
    Toggle { name: String, source_msg: String },
}
