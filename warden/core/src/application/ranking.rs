// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Pipeline Ranking Service - Spawn Gating Context
//!
//! Assembles the inputs for [`crate::domain::ranking::rank`]: the taxonomy
//! first (the detector needs it), then the pipeline policy document and the
//! demand map fetched concurrently. All three inputs degrade gracefully, so
//! a ranking is always produced.

use std::sync::Arc;

use crate::application::demand::DemandDetector;
use crate::application::policy::PolicyService;
use crate::domain::policy::PolicyScope;
use crate::domain::ranking::{rank, RankedPipeline};
use crate::domain::taxonomy::TaxonomyProvider;

pub struct PipelineRankingService {
    policy: Arc<PolicyService>,
    taxonomy: Arc<dyn TaxonomyProvider>,
    detector: Arc<DemandDetector>,
}

impl PipelineRankingService {
    pub fn new(
        policy: Arc<PolicyService>,
        taxonomy: Arc<dyn TaxonomyProvider>,
        detector: Arc<DemandDetector>,
    ) -> Self {
        Self { policy, taxonomy, detector }
    }

    /// The decision-ready pipeline ordering for the dashboard.
    pub async fn ranked_pipelines(&self) -> Vec<RankedPipeline> {
        let taxonomy = self.taxonomy.load().await;
        let (policy, demand) = tokio::join!(
            self.policy.document(PolicyScope::Pipeline),
            self.detector.detect(&taxonomy)
        );
        rank(&policy, &taxonomy, &demand)
    }
}
