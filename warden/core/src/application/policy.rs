// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Policy Application Service - Spawn Gating Context
//!
//! Read/write surface over the persisted policy documents. Reads never fail
//! the caller: a missing or malformed document reads as the empty document,
//! and a missing record reads as the allow-by-default record. The one
//! user-visible failure in this subsystem is a toggle that cannot persist
//! (disk full, permission denied) - there is no safe fallback for that.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::policy::{PolicyDocument, PolicyRecord, PolicyScope, PolicyStore};

pub struct PolicyService {
    store: Arc<dyn PolicyStore>,
}

impl PolicyService {
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self { store }
    }

    /// Load a scope's full document, substituting the empty document on any
    /// read failure.
    pub async fn document(&self, scope: PolicyScope) -> PolicyDocument {
        match self.store.load(scope).await {
            Ok(document) => document,
            Err(e) => {
                warn!(scope = scope.as_str(), error = %e, "Policy document unreadable; using empty document");
                PolicyDocument::default()
            }
        }
    }

    /// Look up one record. Never errors; absent names resolve to the
    /// allow-by-default record.
    pub async fn get(&self, scope: PolicyScope, name: &str) -> PolicyRecord {
        self.document(scope).await.record(name)
    }

    /// Administrative toggle: full read-modify-write with atomic replace.
    ///
    /// Unlike the read paths, a load failure here aborts the toggle. Falling
    /// back to the empty document would persist it and erase every other
    /// record the moment the file is momentarily unreadable.
    pub async fn set(
        &self,
        scope: PolicyScope,
        name: &str,
        enabled: bool,
        reason: Option<String>,
    ) -> Result<PolicyRecord> {
        let mut document = self.store.load(scope).await.with_context(|| {
            format!("Refusing to modify unreadable {} policy document", scope.as_str())
        })?;
        let record = PolicyRecord::new(
            enabled,
            reason.unwrap_or_else(|| if enabled { "Enabled" } else { "Disabled" }.to_string()),
        );
        document.upsert(name, record.clone());
        self.store
            .store(scope, &document)
            .await
            .with_context(|| format!("Failed to persist {} policy for '{name}'", scope.as_str()))?;
        info!(
            scope = scope.as_str(),
            name,
            enabled,
            reason = %record.reason,
            "Policy record updated"
        );
        Ok(record)
    }
}
