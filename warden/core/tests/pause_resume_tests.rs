// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tests for the fleet-wide pause/resume state machine.
//!
//! Covers the snapshot/restore round-trip (byte-identical engine records,
//! reasons included), idempotent no-op transitions, the missing-snapshot
//! recovery path, the best-effort kill option, and the race where two
//! concurrent pause calls must produce exactly one snapshot.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use aegis_warden_core::application::pause::PauseController;
use aegis_warden_core::application::reaper::StaleReaper;
use aegis_warden_core::domain::pause::{PauseOutcome, PauseState, PauseStateStore, ResumeOutcome};
use aegis_warden_core::domain::policy::{PolicyDocument, PolicyRecord, PolicyScope, PolicyStore};
use aegis_warden_core::domain::process::{ProcessController, ProcessRecord};
use aegis_warden_core::infrastructure::document_store::FileDocumentStore;

/// Controller with no processes; kill requests succeed trivially.
struct NoProcesses;

#[async_trait]
impl ProcessController for NoProcesses {
    async fn processes(&self) -> Vec<ProcessRecord> {
        Vec::new()
    }
    async fn terminate(&self, _pid: u32) -> bool {
        true
    }
    async fn kill(&self, _pid: u32) -> bool {
        true
    }
    async fn is_alive(&self, _pid: u32) -> bool {
        false
    }
}

/// Controller hosting agent processes that die on the graceful signal.
struct RunningAgents {
    alive: Mutex<HashMap<u32, ProcessRecord>>,
}

impl RunningAgents {
    fn new(count: u32) -> Self {
        let alive = (1..=count)
            .map(|pid| {
                (
                    pid,
                    ProcessRecord {
                        pid,
                        elapsed_seconds: 60,
                        command_line: format!("claude -p task-{pid}"),
                    },
                )
            })
            .collect();
        Self { alive: Mutex::new(alive) }
    }
}

#[async_trait]
impl ProcessController for RunningAgents {
    async fn processes(&self) -> Vec<ProcessRecord> {
        self.alive.lock().unwrap().values().cloned().collect()
    }
    async fn terminate(&self, pid: u32) -> bool {
        self.alive.lock().unwrap().remove(&pid);
        true
    }
    async fn kill(&self, pid: u32) -> bool {
        self.alive.lock().unwrap().remove(&pid);
        true
    }
    async fn is_alive(&self, pid: u32) -> bool {
        self.alive.lock().unwrap().contains_key(&pid)
    }
}

fn controller(
    store: Arc<FileDocumentStore>,
    processes: Arc<dyn ProcessController>,
) -> PauseController {
    PauseController::new(store.clone(), store, Arc::new(StaleReaper::new(processes)))
}

async fn seed_engines(store: &FileDocumentStore) -> PolicyDocument {
    let mut document = PolicyDocument::default();
    document.upsert("claude", PolicyRecord::new(true, "Default"));
    document.upsert("codex", PolicyRecord::new(false, "Quota exhausted"));
    PolicyStore::store(store, PolicyScope::Engine, &document).await.unwrap();
    document
}

#[tokio::test]
async fn test_pause_disables_every_engine_and_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDocumentStore::new(dir.path()));
    seed_engines(&store).await;
    let pause = controller(store.clone(), Arc::new(NoProcesses));

    let outcome = pause.pause(false, "ops@dashboard").await.unwrap();
    let PauseOutcome::Paused { engines_disabled, agents_killed } = outcome else {
        panic!("expected a fresh pause");
    };
    assert!(engines_disabled >= 4, "all known engines pause, not only persisted ones");
    assert_eq!(agents_killed, 0);

    let document = PolicyStore::load(store.as_ref(), PolicyScope::Engine).await.unwrap();
    for (name, record) in &document.records {
        assert!(!record.enabled, "engine {name} still enabled after pause");
        assert!(record.reason.starts_with("PAUSED:"), "engine {name}: {}", record.reason);
    }

    let state = PauseStateStore::load(store.as_ref()).await.unwrap();
    assert!(state.paused);
    assert_eq!(state.paused_by.as_deref(), Some("ops@dashboard"));
    assert!(state.paused_at.is_some());
    let snapshot = state.previous_engine_state.expect("snapshot accompanies paused=true");
    assert!(snapshot["claude"].enabled);
    assert!(!snapshot["codex"].enabled);
}

#[tokio::test]
async fn test_pause_resume_round_trip_restores_records_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDocumentStore::new(dir.path()));
    let before = seed_engines(&store).await;
    let pause = controller(store.clone(), Arc::new(NoProcesses));

    pause.pause(false, "ops").await.unwrap();
    let outcome = pause.resume().await.unwrap();
    let ResumeOutcome::Resumed { snapshot_missing, .. } = outcome else {
        panic!("expected a resume");
    };
    assert!(!snapshot_missing);

    let after = PolicyStore::load(store.as_ref(), PolicyScope::Engine).await.unwrap();
    // Seeded records come back byte-identical, reason and timestamp included.
    assert_eq!(after.records["claude"], before.records["claude"]);
    assert_eq!(after.records["codex"], before.records["codex"]);
    // Engines that had no persisted record restore as allow-by-default.
    assert!(after.records["opencode"].enabled);
    assert_eq!(after.records["opencode"].reason, "Default");

    let state = PauseStateStore::load(store.as_ref()).await.unwrap();
    assert!(!state.paused);
    assert!(state.previous_engine_state.is_none());
}

#[tokio::test]
async fn test_pause_when_paused_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDocumentStore::new(dir.path()));
    seed_engines(&store).await;
    let pause = controller(store.clone(), Arc::new(NoProcesses));

    pause.pause(false, "ops").await.unwrap();
    let state_before = PauseStateStore::load(store.as_ref()).await.unwrap();
    let engines_before = PolicyStore::load(store.as_ref(), PolicyScope::Engine).await.unwrap();

    let outcome = pause.pause(true, "someone-else").await.unwrap();
    assert_eq!(outcome, PauseOutcome::AlreadyPaused);

    // Nothing persisted changed, and in particular the snapshot was not
    // overwritten with the already-disabled state.
    assert_eq!(PauseStateStore::load(store.as_ref()).await.unwrap(), state_before);
    assert_eq!(
        PolicyStore::load(store.as_ref(), PolicyScope::Engine).await.unwrap(),
        engines_before
    );
}

#[tokio::test]
async fn test_resume_when_running_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDocumentStore::new(dir.path()));
    seed_engines(&store).await;
    let pause = controller(store.clone(), Arc::new(NoProcesses));

    let outcome = pause.resume().await.unwrap();
    assert_eq!(outcome, ResumeOutcome::NotPaused);

    let document = PolicyStore::load(store.as_ref(), PolicyScope::Engine).await.unwrap();
    assert!(!document.records["codex"].enabled, "resume must not touch policy while running");
}

#[tokio::test(start_paused = true)]
async fn test_pause_with_kill_terminates_running_agents() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDocumentStore::new(dir.path()));
    seed_engines(&store).await;
    let pause = controller(store.clone(), Arc::new(RunningAgents::new(3)));

    let outcome = pause.pause(true, "ops").await.unwrap();
    assert_eq!(
        outcome,
        PauseOutcome::Paused { engines_disabled: 4, agents_killed: 3 }
    );
}

#[tokio::test]
async fn test_resume_without_snapshot_enables_all_engines() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDocumentStore::new(dir.path()));
    seed_engines(&store).await;

    // Corrupted state: paused with no snapshot.
    let state = PauseState {
        paused: true,
        paused_at: Some(chrono::Utc::now()),
        paused_by: Some("ops".to_string()),
        previous_engine_state: None,
    };
    PauseStateStore::store(store.as_ref(), &state).await.unwrap();

    let pause = controller(store.clone(), Arc::new(NoProcesses));
    let outcome = pause.resume().await.unwrap();
    let ResumeOutcome::Resumed { engines_restored, snapshot_missing } = outcome else {
        panic!("expected a resume");
    };
    assert!(snapshot_missing);
    assert!(engines_restored >= 4);

    let document = PolicyStore::load(store.as_ref(), PolicyScope::Engine).await.unwrap();
    for (name, record) in &document.records {
        assert!(record.enabled, "engine {name} should be re-enabled by recovery");
        assert!(record.reason.contains("snapshot missing"));
    }
}

#[tokio::test]
async fn test_concurrent_pauses_take_exactly_one_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDocumentStore::new(dir.path()));
    seed_engines(&store).await;
    let pause = Arc::new(controller(store.clone(), Arc::new(NoProcesses)));

    let (a, b) = tokio::join!(pause.pause(false, "first"), pause.pause(false, "second"));
    let outcomes = [a.unwrap(), b.unwrap()];
    let fresh = outcomes
        .iter()
        .filter(|o| matches!(o, PauseOutcome::Paused { .. }))
        .count();
    assert_eq!(fresh, 1, "exactly one caller wins the transition");

    // The surviving snapshot still holds the pre-pause state.
    let state = PauseStateStore::load(store.as_ref()).await.unwrap();
    let snapshot = state.previous_engine_state.unwrap();
    assert!(snapshot["claude"].enabled);
}
