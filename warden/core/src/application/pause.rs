// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Pause/Resume Controller - Pause/Resume Context
//!
//! Fleet-wide kill switch over the engine policy document, with
//! snapshot/restore semantics: `pause` snapshots every engine's policy
//! record before disabling them all; `resume` restores the snapshot
//! verbatim. The two transitions are the only code paths that touch
//! `PauseState`.
//!
//! ## Concurrency
//!
//! An in-process mutex serializes the snapshot-then-overwrite and
//! restore-then-clear sequences. Two concurrent `pause` calls racing on
//! "is already paused" must not both take a snapshot - the second snapshot
//! would capture the already-disabled state and corrupt the restore.

use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::application::reaper::StaleReaper;
use crate::domain::genome::ENGINES;
use crate::domain::pause::{PauseOutcome, PauseState, PauseStateStore, ResumeOutcome};
use crate::domain::policy::{PolicyDocument, PolicyRecord, PolicyScope, PolicyStore};

pub struct PauseController {
    policy_store: Arc<dyn PolicyStore>,
    pause_store: Arc<dyn PauseStateStore>,
    reaper: Arc<StaleReaper>,
    /// Serializes pause/resume transitions within this process.
    transition: Mutex<()>,
}

impl PauseController {
    pub fn new(
        policy_store: Arc<dyn PolicyStore>,
        pause_store: Arc<dyn PauseStateStore>,
        reaper: Arc<StaleReaper>,
    ) -> Self {
        Self {
            policy_store,
            pause_store,
            reaper,
            transition: Mutex::new(()),
        }
    }

    /// Current pause state; a missing or unreadable document reads as
    /// RUNNING.
    pub async fn pause_state(&self) -> PauseState {
        match self.pause_store.load().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Pause state unreadable; assuming running");
                PauseState::default()
            }
        }
    }

    /// Freeze the whole fleet: snapshot and disable every engine.
    ///
    /// The kill count is informational only; termination failures are
    /// swallowed and never block the state transition.
    pub async fn pause(&self, kill_running: bool, requested_by: &str) -> Result<PauseOutcome> {
        let _guard = self.transition.lock().await;

        let state = self.pause_state().await;
        if state.paused {
            return Ok(PauseOutcome::AlreadyPaused);
        }

        let mut document = match self.policy_store.load(PolicyScope::Engine).await {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "Engine policy unreadable; pausing from empty document");
                PolicyDocument::default()
            }
        };

        // Snapshot every engine the system knows about, including ones with
        // no persisted record yet (they snapshot as allow-by-default).
        let mut snapshot: BTreeMap<String, PolicyRecord> = BTreeMap::new();
        for name in engine_names(&document) {
            snapshot.insert(name.clone(), document.record(&name));
        }

        let reason = format!("PAUSED: fleet paused by {requested_by}");
        for name in snapshot.keys().cloned().collect::<Vec<_>>() {
            document.upsert(name, PolicyRecord::new(false, reason.clone()));
        }
        self.policy_store
            .store(PolicyScope::Engine, &document)
            .await
            .context("Failed to persist engine policy for pause")?;

        let engines_disabled = snapshot.len();
        let next = PauseState {
            paused: true,
            paused_at: Some(Utc::now()),
            paused_by: Some(requested_by.to_string()),
            previous_engine_state: Some(snapshot),
        };
        self.pause_store
            .store(&next)
            .await
            .context("Failed to persist pause state")?;

        let agents_killed = if kill_running {
            self.reaper.kill_all_agents().await
        } else {
            0
        };

        metrics::counter!("warden_pause_transitions_total", "transition" => "pause").increment(1);
        info!(requested_by, engines_disabled, agents_killed, "Fleet paused");

        Ok(PauseOutcome::Paused { engines_disabled, agents_killed })
    }

    /// Restore the exact pre-pause engine configuration.
    pub async fn resume(&self) -> Result<ResumeOutcome> {
        let _guard = self.transition.lock().await;

        let state = self.pause_state().await;
        if !state.paused {
            return Ok(ResumeOutcome::NotPaused);
        }

        let mut document = match self.policy_store.load(PolicyScope::Engine).await {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "Engine policy unreadable; resuming into empty document");
                PolicyDocument::default()
            }
        };

        let (restored, snapshot_missing) = match state.previous_engine_state {
            Some(snapshot) => {
                // Restore each record verbatim, reason included - the
                // round-trip must be byte-identical.
                let count = snapshot.len();
                for (name, record) in snapshot {
                    document.records.insert(name, record);
                }
                document.updated = Some(Utc::now());
                (count, false)
            }
            None => {
                warn!("Pause snapshot missing on resume; enabling all known engines");
                let mut count = 0;
                for name in engine_names(&document) {
                    document.upsert(
                        name,
                        PolicyRecord::new(true, "Re-enabled after pause (snapshot missing)"),
                    );
                    count += 1;
                }
                (count, true)
            }
        };

        self.policy_store
            .store(PolicyScope::Engine, &document)
            .await
            .context("Failed to persist engine policy for resume")?;

        let next = PauseState::default();
        self.pause_store
            .store(&next)
            .await
            .context("Failed to persist pause state")?;

        metrics::counter!("warden_pause_transitions_total", "transition" => "resume").increment(1);
        info!(engines_restored = restored, snapshot_missing, "Fleet resumed");

        Ok(ResumeOutcome::Resumed { engines_restored: restored, snapshot_missing })
    }
}

/// Union of engines with persisted records and the built-in engine
/// vocabulary, so unreferenced engines still pause and resume.
fn engine_names(document: &PolicyDocument) -> Vec<String> {
    let mut names: Vec<String> = ENGINES.iter().map(|e| e.to_string()).collect();
    for name in document.records.keys() {
        if !names.iter().any(|n| n == name) {
            names.push(name.clone());
        }
    }
    names.sort();
    names
}
