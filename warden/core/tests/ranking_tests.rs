// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tests for the pipeline ranking algorithm and the full ranking service.
//!
//! Covers the three-level ordering contract (intended first, then taxonomy
//! position, then name), the total-order property over the policy ∪ taxonomy
//! ∪ demand union, and the end-to-end gating scenario where a live agent
//! marks its pipeline as intended.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use aegis_warden_core::application::demand::DemandDetector;
use aegis_warden_core::application::policy::PolicyService;
use aegis_warden_core::application::ranking::PipelineRankingService;
use aegis_warden_core::domain::collaborators::{RunningAgentRegistry, WorkItem, WorkItemSource};
use aegis_warden_core::domain::demand::{DemandMap, DemandSignal, SIGNAL_LIVE_AGENTS};
use aegis_warden_core::domain::policy::{PolicyDocument, PolicyRecord, PolicyScope, PolicyStore};
use aegis_warden_core::domain::ranking::rank;
use aegis_warden_core::domain::taxonomy::{PipelineSpec, Taxonomy, TaxonomyProvider};
use aegis_warden_core::infrastructure::document_store::FileDocumentStore;

fn taxonomy_with_order(order: &[&str]) -> Taxonomy {
    let mut taxonomy = Taxonomy {
        always_allowed_roles: Default::default(),
        pipeline_order: order.iter().map(|s| s.to_string()).collect(),
        pipelines: BTreeMap::new(),
    };
    for name in order {
        taxonomy.pipelines.insert(name.to_string(), PipelineSpec::default());
    }
    taxonomy
}

fn demand_for(pipelines: &[&str]) -> DemandMap {
    let mut demand = DemandMap::new();
    for name in pipelines {
        let mut signal = DemandSignal::default();
        signal.record(SIGNAL_LIVE_AGENTS);
        demand.insert(name.to_string(), signal);
    }
    demand
}

#[test]
fn test_intended_pipeline_ranks_first() {
    let taxonomy = taxonomy_with_order(&["biz", "dev", "self_improve"]);
    let ranked = rank(&PolicyDocument::default(), &taxonomy, &demand_for(&["dev"]));

    let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["dev", "biz", "self_improve"]);
    assert!(ranked[0].intended);
    assert!(!ranked[1].intended);
}

#[test]
fn test_rank_is_a_total_order_over_the_union() {
    let mut policy = PolicyDocument::default();
    policy.upsert("archived", PolicyRecord::new(false, "Sunset"));
    let taxonomy = taxonomy_with_order(&["dev", "biz"]);
    let demand = demand_for(&["ad_hoc"]);

    let ranked = rank(&policy, &taxonomy, &demand);
    let mut names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(ranked.len(), 4);
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 4, "every union member appears exactly once");
}

#[test]
fn test_unlisted_pipelines_rank_after_listed_alphabetically() {
    let taxonomy = taxonomy_with_order(&["dev"]);
    let mut policy = PolicyDocument::default();
    policy.upsert("zeta", PolicyRecord::new(true, "Default"));
    policy.upsert("alpha", PolicyRecord::new(true, "Default"));

    let ranked = rank(&policy, &taxonomy, &DemandMap::new());
    let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["dev", "alpha", "zeta"]);
}

#[test]
fn test_rank_twice_is_byte_identical() {
    let taxonomy = taxonomy_with_order(&["biz", "dev"]);
    let mut policy = PolicyDocument::default();
    policy.upsert("dev", PolicyRecord::new(false, "Frozen"));
    let demand = demand_for(&["biz", "extra"]);

    let first = rank(&policy, &taxonomy, &demand);
    let second = rank(&policy, &taxonomy, &demand);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn test_missing_policy_attaches_default_record() {
    let taxonomy = taxonomy_with_order(&["dev"]);
    let ranked = rank(&PolicyDocument::default(), &taxonomy, &DemandMap::new());
    assert!(ranked[0].enabled);
    assert_eq!(ranked[0].reason, "Default");
    assert!(ranked[0].signals.is_empty());
}

// --- End-to-end scenario ---

struct NoItems;

#[async_trait]
impl WorkItemSource for NoItems {
    async fn open_items(&self) -> Result<Vec<WorkItem>> {
        Ok(Vec::new())
    }
}

struct OneBuilder;

#[async_trait]
impl RunningAgentRegistry for OneBuilder {
    async fn running_agents(&self) -> Result<BTreeMap<Uuid, String>> {
        let mut agents = BTreeMap::new();
        agents.insert(Uuid::new_v4(), "opencode_builder".to_string());
        Ok(agents)
    }
}

struct FixedTaxonomy(Taxonomy);

#[async_trait]
impl TaxonomyProvider for FixedTaxonomy {
    async fn load(&self) -> Taxonomy {
        self.0.clone()
    }
}

#[tokio::test]
async fn test_live_agent_marks_pipeline_intended_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDocumentStore::new(dir.path()));

    let mut document = PolicyDocument::default();
    document.upsert("dev", PolicyRecord::new(true, "Default"));
    document.upsert("biz", PolicyRecord::new(false, "Budget freeze"));
    PolicyStore::store(store.as_ref(), PolicyScope::Pipeline, &document)
        .await
        .unwrap();

    let mut taxonomy = taxonomy_with_order(&["dev", "biz"]);
    taxonomy
        .pipelines
        .get_mut("dev")
        .unwrap()
        .roles
        .insert("builder".to_string());

    let service = PipelineRankingService::new(
        Arc::new(PolicyService::new(store)),
        Arc::new(FixedTaxonomy(taxonomy)),
        Arc::new(DemandDetector::new(Arc::new(NoItems), Arc::new(OneBuilder))),
    );

    let ranked = service.ranked_pipelines().await;
    assert_eq!(ranked.len(), 2);

    let dev = &ranked[0];
    assert_eq!(dev.name, "dev");
    assert!(dev.intended);
    assert!(dev.enabled);
    assert_eq!(dev.signals, vec![SIGNAL_LIVE_AGENTS]);

    let biz = &ranked[1];
    assert_eq!(biz.name, "biz");
    assert!(!biz.intended);
    assert!(!biz.enabled);
    assert!(biz.signals.is_empty());
}
