// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Pipeline Ranking - Spawn Gating Context
//!
//! Merges the pipelines known to the policy store, the taxonomy, and the
//! demand detector into one deduplicated, decision-ready ordering. The
//! three-level tie-break is exact and stable - it is the only thing that
//! makes dashboard pagination and diffing deterministic across calls:
//!
//! 1. intended pipelines (non-empty demand) before non-intended;
//! 2. ascending position in `taxonomy.pipeline_order`, with pipelines absent
//!    from that list after all listed ones;
//! 3. case-sensitive lexicographic order of the pipeline name.
//!
//! Calling [`rank`] twice with unchanged inputs yields byte-identical output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::demand::DemandMap;
use crate::domain::policy::PolicyDocument;
use crate::domain::taxonomy::Taxonomy;

/// Derived, read-only view of one pipeline's gating decision. Never
/// persisted; recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPipeline {
    pub name: String,
    pub enabled: bool,
    pub reason: String,
    pub intended: bool,
    pub signals: Vec<String>,
}

/// Merge policy, taxonomy, and demand into the decision-ready ordering.
///
/// Every pipeline name appearing in policy ∪ taxonomy ∪ demand appears
/// exactly once in the output (total order).
pub fn rank(policy: &PolicyDocument, taxonomy: &Taxonomy, demand: &DemandMap) -> Vec<RankedPipeline> {
    let mut names: BTreeSet<&str> = BTreeSet::new();
    names.extend(policy.records.keys().map(String::as_str));
    names.extend(taxonomy.pipelines.keys().map(String::as_str));
    names.extend(taxonomy.pipeline_order.iter().map(String::as_str));
    names.extend(demand.keys().map(String::as_str));

    let mut ranked: Vec<RankedPipeline> = names
        .into_iter()
        .map(|name| {
            let record = policy.record(name);
            let signal = demand.get(name).cloned().unwrap_or_default();
            RankedPipeline {
                name: name.to_string(),
                enabled: record.enabled,
                reason: record.reason,
                intended: signal.is_intended(),
                signals: signal.signals,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.intended
            .cmp(&a.intended)
            .then_with(|| {
                let pos_a = taxonomy.order_index(&a.name).unwrap_or(usize::MAX);
                let pos_b = taxonomy.order_index(&b.name).unwrap_or(usize::MAX);
                pos_a.cmp(&pos_b)
            })
            .then_with(|| a.name.cmp(&b.name))
    });

    ranked
}
