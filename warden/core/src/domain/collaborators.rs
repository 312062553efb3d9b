// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! External Collaborator Interfaces (AGENTS.md §Anti-Corruption Layers)
//!
//! Read-only contracts over the systems the warden consults but does not own:
//! the work-item tracker, the running-agent registry, the append-only
//! decision log, the standings table, and the persona definition store (the
//! one collaborator the warden also writes, via the enabled marker).
//!
//! | Trait | Collaborator | Implementations |
//! |-------|--------------|-----------------|
//! | `WorkItemSource` | issue tracker backlog | `HttpWorkItemSource`, `FileWorkItemSource` |
//! | `RunningAgentRegistry` | live agent roster | `HttpRunningAgentRegistry`, `FileRunningAgentRegistry` |
//! | `DecisionLog` | append-only decision journal | `FileDecisionLog` |
//! | `StandingsTable` | accumulated agent points | `FileStandingsTable` |
//! | `PersonaStore` | genome definitions on disk | `FilePersonaStore` |
//!
//! Snapshot fetches are best-effort and bounded by short timeouts; callers
//! degrade to "no data" on failure rather than propagating errors.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::genome::GenomeError;

/// One open work item in the tracker backlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[async_trait]
pub trait WorkItemSource: Send + Sync {
    /// Snapshot of open work items, each with zero or more labels.
    async fn open_items(&self) -> Result<Vec<WorkItem>>;
}

#[async_trait]
pub trait RunningAgentRegistry: Send + Sync {
    /// Snapshot of currently executing agents: agent id to persona name.
    async fn running_agents(&self) -> Result<BTreeMap<Uuid, String>>;
}

/// One record in the append-only decision log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub persona: String,
    /// Record type, e.g. `spawn`, `retire`, `score`.
    #[serde(rename = "type")]
    pub decision_type: String,
    pub timestamp: DateTime<Utc>,
}

/// Spawn records drive the `spawns_today` counter.
pub const DECISION_TYPE_SPAWN: &str = "spawn";

#[async_trait]
pub trait DecisionLog: Send + Sync {
    async fn records(&self) -> Result<Vec<DecisionRecord>>;
}

/// One standings entry: points accumulated by a role on an engine. The
/// persona name is re-derived as `<engine>_<role>` when joining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub engine: String,
    pub role: String,
    pub points: i64,
}

#[async_trait]
pub trait StandingsTable: Send + Sync {
    async fn standings(&self) -> Result<Vec<StandingEntry>>;
}

/// A persona definition as listed on disk: the name plus its enabled marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaDefinition {
    pub name: String,
    pub enabled: bool,
}

#[async_trait]
pub trait PersonaStore: Send + Sync {
    async fn list(&self) -> Result<Vec<PersonaDefinition>, GenomeError>;

    /// Flip the definition's enabled marker: an atomic, idempotent operation.
    /// No-op when the requested state already holds.
    async fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), GenomeError>;
}
