// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Demand Signals - Spawn Gating Context
//!
//! A pipeline is *intended* when at least one demand signal is currently
//! present for it. Signals come from a fixed vocabulary: tracker backlog
//! labels and live agent personas.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Open work items in the tracker carry a label mapped to the pipeline.
pub const SIGNAL_BACKLOG_LABELS: &str = "backlog-labels";
/// An agent belonging to the pipeline is currently running.
pub const SIGNAL_LIVE_AGENTS: &str = "live-agents";

/// The set of signal sources currently indicating real demand for one
/// pipeline. Signal order is insertion order, deduplicated; it must not
/// depend on map iteration order of the underlying snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandSignal {
    pub signals: Vec<String>,
}

impl DemandSignal {
    /// Record a signal source, once.
    pub fn record(&mut self, source: &str) {
        if !self.signals.iter().any(|s| s == source) {
            self.signals.push(source.to_string());
        }
    }

    pub fn is_intended(&self) -> bool {
        !self.signals.is_empty()
    }
}

/// Per-pipeline demand, keyed by pipeline name.
pub type DemandMap = BTreeMap<String, DemandSignal>;
