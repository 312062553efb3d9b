// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Demand-Signal Detector - Spawn Gating Context
//!
//! Infers which pipelines currently have real work waiting by reading two
//! best-effort snapshots: open work items (matched against each pipeline's
//! label set) and currently running agents (attributed to pipelines through
//! their persona's role). Either source being unavailable reads as "no
//! demand from that source" - detection never fails the caller.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::collaborators::{RunningAgentRegistry, WorkItemSource};
use crate::domain::demand::{DemandMap, DemandSignal, SIGNAL_BACKLOG_LABELS, SIGNAL_LIVE_AGENTS};
use crate::domain::genome::strip_engine_prefix;
use crate::domain::taxonomy::{Taxonomy, FALLBACK_PIPELINE};

pub struct DemandDetector {
    work_items: Arc<dyn WorkItemSource>,
    agents: Arc<dyn RunningAgentRegistry>,
}

impl DemandDetector {
    pub fn new(work_items: Arc<dyn WorkItemSource>, agents: Arc<dyn RunningAgentRegistry>) -> Self {
        Self { work_items, agents }
    }

    /// Produce, per pipeline, the set of signal sources currently indicating
    /// real demand. Signal order within a pipeline is insertion order.
    pub async fn detect(&self, taxonomy: &Taxonomy) -> DemandMap {
        let (items, agents) = tokio::join!(self.work_items.open_items(), self.agents.running_agents());

        let items = match items {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Work-item snapshot unavailable; treating backlog as empty");
                Vec::new()
            }
        };
        let agents = match agents {
            Ok(agents) => agents,
            Err(e) => {
                warn!(error = %e, "Running-agent snapshot unavailable; treating roster as empty");
                Default::default()
            }
        };

        let mut demand = DemandMap::new();

        // Backlog labels: one signal per pipeline regardless of how many
        // items match its label set.
        for (pipeline, spec) in &taxonomy.pipelines {
            let matched = items
                .iter()
                .any(|item| item.labels.iter().any(|label| spec.labels.contains(label)));
            if matched {
                demand.entry(pipeline.clone()).or_default().record(SIGNAL_BACKLOG_LABELS);
            }
        }

        // Live agents: strip the engine prefix, skip ungated roles, resolve
        // the bare role to its owning pipeline.
        for persona in agents.values() {
            let role = strip_engine_prefix(persona);
            if taxonomy.always_allowed_roles.contains(role) {
                debug!(persona, role, "Role bypasses gating; not attributed to any pipeline");
                continue;
            }
            let pipeline = taxonomy.pipeline_for_role(role).unwrap_or(FALLBACK_PIPELINE);
            demand.entry(pipeline.to_string()).or_default().record(SIGNAL_LIVE_AGENTS);
        }

        demand
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collaborators::WorkItem;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    struct FixedItems(Vec<WorkItem>);

    #[async_trait]
    impl WorkItemSource for FixedItems {
        async fn open_items(&self) -> Result<Vec<WorkItem>> {
            Ok(self.0.clone())
        }
    }

    struct FixedAgents(BTreeMap<Uuid, String>);

    #[async_trait]
    impl RunningAgentRegistry for FixedAgents {
        async fn running_agents(&self) -> Result<BTreeMap<Uuid, String>> {
            Ok(self.0.clone())
        }
    }

    struct Unavailable;

    #[async_trait]
    impl WorkItemSource for Unavailable {
        async fn open_items(&self) -> Result<Vec<WorkItem>> {
            Err(anyhow!("tracker timed out"))
        }
    }

    #[async_trait]
    impl RunningAgentRegistry for Unavailable {
        async fn running_agents(&self) -> Result<BTreeMap<Uuid, String>> {
            Err(anyhow!("registry timed out"))
        }
    }

    fn item(id: u64, labels: &[&str]) -> WorkItem {
        WorkItem {
            id,
            title: format!("item {id}"),
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_unavailable_sources_detect_nothing() {
        let detector = DemandDetector::new(Arc::new(Unavailable), Arc::new(Unavailable));
        let demand = detector.detect(&Taxonomy::builtin_default()).await;
        assert!(demand.is_empty());
    }

    #[tokio::test]
    async fn test_backlog_signal_recorded_once_per_pipeline() {
        let items = FixedItems(vec![item(1, &["bug"]), item(2, &["feature", "bug"]), item(3, &[])]);
        let detector = DemandDetector::new(Arc::new(items), Arc::new(FixedAgents(BTreeMap::new())));
        let demand = detector.detect(&Taxonomy::builtin_default()).await;

        assert_eq!(demand.len(), 1);
        assert_eq!(demand["dev"].signals, vec![SIGNAL_BACKLOG_LABELS]);
    }

    #[tokio::test]
    async fn test_always_allowed_roles_are_not_attributed() {
        let mut agents = BTreeMap::new();
        agents.insert(Uuid::new_v4(), "claude_overseer".to_string());
        let detector = DemandDetector::new(
            Arc::new(FixedItems(vec![])),
            Arc::new(FixedAgents(agents)),
        );
        let demand = detector.detect(&Taxonomy::builtin_default()).await;
        assert!(demand.is_empty());
    }

    #[tokio::test]
    async fn test_unclaimed_role_falls_back_to_dev() {
        let mut agents = BTreeMap::new();
        agents.insert(Uuid::new_v4(), "codex_cartographer".to_string());
        let detector = DemandDetector::new(
            Arc::new(FixedItems(vec![])),
            Arc::new(FixedAgents(agents)),
        );
        let demand = detector.detect(&Taxonomy::builtin_default()).await;
        assert_eq!(demand[FALLBACK_PIPELINE].signals, vec![SIGNAL_LIVE_AGENTS]);
    }
}
