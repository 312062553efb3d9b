// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Fleet Pause State - Pause/Resume Context
//!
//! Singleton record for the fleet-wide kill switch. `previous_engine_state`
//! is populated if and only if `paused == true`: it is the exact pre-pause
//! snapshot of every engine's policy record, restored verbatim on resume.
//! Only the `PauseController` transitions this record - no other code path
//! may set `paused` directly, which guarantees the snapshot/restore pairing
//! is never skipped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::policy::{PolicyRecord, PolicyStoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseState {
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paused_by: Option<String>,
    /// Pre-pause snapshot of every engine's policy record.
    #[serde(default)]
    pub previous_engine_state: Option<BTreeMap<String, PolicyRecord>>,
}

/// Outcome of a `pause` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum PauseOutcome {
    Paused {
        engines_disabled: usize,
        /// Best-effort kill count; informational only, never blocks the
        /// state transition.
        agents_killed: usize,
    },
    AlreadyPaused,
}

/// Outcome of a `resume` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ResumeOutcome {
    Resumed {
        engines_restored: usize,
        /// True when the pre-pause snapshot was missing and the fallback
        /// ("enable all engines") was applied instead.
        snapshot_missing: bool,
    },
    NotPaused,
}

/// Persistence contract for the singleton pause-state document. Same atomic
/// replace-on-write discipline as [`crate::domain::policy::PolicyStore`].
#[async_trait]
pub trait PauseStateStore: Send + Sync {
    async fn load(&self) -> Result<PauseState, PolicyStoreError>;
    async fn store(&self, state: &PauseState) -> Result<(), PolicyStoreError>;
}
