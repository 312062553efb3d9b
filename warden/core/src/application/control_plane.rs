// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Control Plane Facade - warden entry point
//!
//! Single owning instance wiring the policy service, demand detector,
//! ranker, pause controller, reaper, and genome registry over concrete
//! infrastructure. The dashboard, the CLI, and the spawner all talk to this
//! facade; no module-level mutable state exists anywhere in the crate.
//!
//! ## Fallback chains
//!
//! Documented once, here, rather than ad hoc at call sites:
//!
//! - **Policy record**: persisted record → allow-by-default record.
//! - **Taxonomy**: `taxonomy.yaml` (30 s TTL cache) → built-in default.
//! - **Demand snapshots**: configured HTTP endpoint → state-dir JSON file →
//!   empty snapshot on any failure or timeout.
//! - **Pause snapshot on resume**: persisted snapshot → enable all known
//!   engines with a recovery reason.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::demand::DemandDetector;
use crate::application::genome::GenomeRegistry;
use crate::application::pause::PauseController;
use crate::application::policy::PolicyService;
use crate::application::ranking::PipelineRankingService;
use crate::application::reaper::StaleReaper;
use crate::domain::genome::{GenomeEntry, GenomeError};
use crate::domain::pause::{PauseOutcome, PauseState, ResumeOutcome};
use crate::domain::policy::{PolicyDocument, PolicyRecord, PolicyScope};
use crate::domain::process::{ProcessRecord, ReapReport, DEFAULT_STALE_THRESHOLD_SECS};
use crate::domain::ranking::RankedPipeline;
use crate::infrastructure::activity::{FileDecisionLog, FileStandingsTable};
use crate::infrastructure::document_store::FileDocumentStore;
use crate::infrastructure::persona_store::FilePersonaStore;
use crate::infrastructure::process_control::SysinfoProcessController;
use crate::infrastructure::snapshots::{
    FileRunningAgentRegistry, FileWorkItemSource, HttpRunningAgentRegistry, HttpWorkItemSource,
};
use crate::infrastructure::taxonomy_loader::FileTaxonomyProvider;

/// How long a cached taxonomy stays fresh.
const TAXONOMY_TTL: Duration = Duration::from_secs(30);

/// Construction-time configuration for the control plane.
#[derive(Debug, Clone)]
pub struct WardenConfig {
    /// Directory holding the policy, pause-state, taxonomy, persona, and
    /// activity documents.
    pub state_dir: PathBuf,
    /// Work-item tracker snapshot endpoint; file-backed when unset.
    pub tracker_url: Option<String>,
    /// Running-agent registry snapshot endpoint; file-backed when unset.
    pub agents_url: Option<String>,
    /// Runtime budget for the stale-process reaper.
    pub stale_threshold_secs: u64,
}

impl WardenConfig {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            tracker_url: None,
            agents_url: None,
            stale_threshold_secs: DEFAULT_STALE_THRESHOLD_SECS,
        }
    }
}

pub struct ControlPlane {
    config: WardenConfig,
    policy: Arc<PolicyService>,
    ranking: PipelineRankingService,
    pause: PauseController,
    reaper: Arc<StaleReaper>,
    genomes: GenomeRegistry,
}

impl ControlPlane {
    pub fn new(config: WardenConfig) -> Self {
        let documents = Arc::new(FileDocumentStore::new(&config.state_dir));
        let policy = Arc::new(PolicyService::new(documents.clone()));

        let work_items: Arc<dyn crate::domain::collaborators::WorkItemSource> =
            match &config.tracker_url {
                Some(url) => Arc::new(HttpWorkItemSource::new(url.clone())),
                None => Arc::new(FileWorkItemSource::new(config.state_dir.join("work_items.json"))),
            };
        let agents: Arc<dyn crate::domain::collaborators::RunningAgentRegistry> =
            match &config.agents_url {
                Some(url) => Arc::new(HttpRunningAgentRegistry::new(url.clone())),
                None => Arc::new(FileRunningAgentRegistry::new(
                    config.state_dir.join("running_agents.json"),
                )),
            };

        let detector = Arc::new(DemandDetector::new(work_items, agents));
        let taxonomy = Arc::new(FileTaxonomyProvider::new(
            config.state_dir.join("taxonomy.yaml"),
            TAXONOMY_TTL,
        ));
        let ranking = PipelineRankingService::new(policy.clone(), taxonomy, detector);

        let reaper = Arc::new(StaleReaper::new(Arc::new(SysinfoProcessController::new())));
        let pause = PauseController::new(documents.clone(), documents, reaper.clone());

        let genomes = GenomeRegistry::new(
            Arc::new(FilePersonaStore::new(config.state_dir.join("personas"))),
            Arc::new(FileDecisionLog::new(config.state_dir.join("decisions.jsonl"))),
            Arc::new(FileStandingsTable::new(config.state_dir.join("standings.json"))),
        );

        Self { config, policy, ranking, pause, reaper, genomes }
    }

    pub fn config(&self) -> &WardenConfig {
        &self.config
    }

    // --- Policy ---

    pub async fn policy_document(&self, scope: PolicyScope) -> PolicyDocument {
        self.policy.document(scope).await
    }

    pub async fn get_policy(&self, scope: PolicyScope, name: &str) -> PolicyRecord {
        self.policy.get(scope, name).await
    }

    pub async fn set_policy(
        &self,
        scope: PolicyScope,
        name: &str,
        enabled: bool,
        reason: Option<String>,
    ) -> anyhow::Result<PolicyRecord> {
        self.policy.set(scope, name, enabled, reason).await
    }

    // --- Ranking ---

    pub async fn ranked_pipelines(&self) -> Vec<RankedPipeline> {
        self.ranking.ranked_pipelines().await
    }

    // --- Pause / Resume ---

    pub async fn pause_swarm(&self, kill_running: bool, requested_by: &str) -> anyhow::Result<PauseOutcome> {
        self.pause.pause(kill_running, requested_by).await
    }

    pub async fn resume_swarm(&self) -> anyhow::Result<ResumeOutcome> {
        self.pause.resume().await
    }

    pub async fn pause_state(&self) -> PauseState {
        self.pause.pause_state().await
    }

    // --- Reaper ---

    pub async fn find_stale_agents(&self, threshold_secs: Option<u64>) -> Vec<ProcessRecord> {
        self.reaper
            .find_stale(threshold_secs.unwrap_or(self.config.stale_threshold_secs))
            .await
    }

    pub async fn reap_stale_agents(&self, threshold_secs: Option<u64>) -> ReapReport {
        self.reaper
            .reap(threshold_secs.unwrap_or(self.config.stale_threshold_secs))
            .await
    }

    // --- Genomes ---

    pub async fn list_genomes(&self) -> Vec<GenomeEntry> {
        self.genomes.list().await
    }

    pub async fn set_genome_enabled(
        &self,
        name: &str,
        enabled: bool,
    ) -> Result<Vec<GenomeEntry>, GenomeError> {
        self.genomes.set_enabled(name, enabled).await
    }
}
