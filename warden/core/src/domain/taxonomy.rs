// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Fleet Taxonomy - Spawn Gating Context
//!
//! Static configuration mapping agent roles to pipelines, pipelines to the
//! tracker labels that signal demand for them, and the set of roles that
//! bypass gating entirely. Loaded from `taxonomy.yaml`; when the document is
//! absent or malformed the built-in default below is substituted so policy
//! decisions degrade gracefully instead of failing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Pipeline a role resolves to when no taxonomy entry claims it. An
/// ungated, unclaimed role is attributed to engineering work rather than
/// left unattributed.
pub const FALLBACK_PIPELINE: &str = "dev";

/// Per-pipeline taxonomy entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Agent roles spawned against this pipeline.
    #[serde(default)]
    pub roles: BTreeSet<String>,
    /// Work-item labels that indicate backlog demand for this pipeline.
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

/// Immutable-at-runtime fleet taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Roles that bypass admission gating entirely. Agents in these roles are
    /// never attributed to a pipeline by the demand detector.
    #[serde(default)]
    pub always_allowed_roles: BTreeSet<String>,
    /// Display/priority order of pipelines. Pipelines absent from this list
    /// rank after all listed ones.
    #[serde(default)]
    pub pipeline_order: Vec<String>,
    #[serde(default)]
    pub pipelines: BTreeMap<String, PipelineSpec>,
}

impl Taxonomy {
    /// Hard-coded default used when `taxonomy.yaml` is missing or malformed.
    pub fn builtin_default() -> Self {
        let mut pipelines = BTreeMap::new();
        pipelines.insert(
            "dev".to_string(),
            PipelineSpec {
                roles: ["builder", "debugger", "reviewer"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                labels: ["bug", "feature", "tech-debt"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
        );
        pipelines.insert(
            "biz".to_string(),
            PipelineSpec {
                roles: ["prospector", "closer"].iter().map(|s| s.to_string()).collect(),
                labels: ["lead", "outreach", "billing"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
        );
        pipelines.insert(
            "self_improve".to_string(),
            PipelineSpec {
                roles: ["genome_curator"].iter().map(|s| s.to_string()).collect(),
                labels: ["self-improve"].iter().map(|s| s.to_string()).collect(),
            },
        );

        Self {
            always_allowed_roles: ["overseer"].iter().map(|s| s.to_string()).collect(),
            pipeline_order: vec!["dev".to_string(), "biz".to_string(), "self_improve".to_string()],
            pipelines,
        }
    }

    /// Resolve a bare role (engine prefix already stripped) to its owning
    /// pipeline, if any taxonomy entry claims it.
    pub fn pipeline_for_role(&self, role: &str) -> Option<&str> {
        self.pipelines
            .iter()
            .find(|(_, spec)| spec.roles.contains(role))
            .map(|(name, _)| name.as_str())
    }

    /// Position of a pipeline in the configured priority order.
    pub fn order_index(&self, name: &str) -> Option<usize> {
        self.pipeline_order.iter().position(|p| p == name)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin_default()
    }
}

/// Taxonomy source. Implementations cache with a short TTL to bound staleness
/// against file-edit-based configuration changes, and substitute
/// [`Taxonomy::builtin_default`] on any load failure.
#[async_trait]
pub trait TaxonomyProvider: Send + Sync {
    async fn load(&self) -> Taxonomy;
}
