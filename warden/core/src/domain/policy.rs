// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Admission Policy Records - Spawn Gating Context
//!
//! The warden persists one flat policy document per gated dimension: one for
//! work **pipelines** and one for execution **engines**. Each record carries
//! the enable/disable decision, a human-readable reason, and the timestamp of
//! the last administrative change.
//!
//! Records are never deleted, only overwritten. Any name referenced anywhere
//! in the system resolves to a record: absent names get the built-in
//! allow-by-default record so policy reads can never fail a caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Which policy document a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyScope {
    /// Gating of work pipelines (e.g. `dev`, `biz`).
    Pipeline,
    /// Gating of execution engines hosting agent processes.
    Engine,
}

impl PolicyScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyScope::Pipeline => "pipelines",
            PolicyScope::Engine => "engines",
        }
    }
}

/// Enable/disable decision for one pipeline or engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub enabled: bool,
    pub reason: String,
    pub updated: DateTime<Utc>,
}

impl PolicyRecord {
    /// The implicit record for names with no persisted entry.
    pub fn default_allow() -> Self {
        Self {
            enabled: true,
            reason: "Default".to_string(),
            updated: Utc::now(),
        }
    }

    pub fn new(enabled: bool, reason: impl Into<String>) -> Self {
        Self {
            enabled,
            reason: reason.into(),
            updated: Utc::now(),
        }
    }
}

/// One persisted policy document: a flat keyed record set plus a top-level
/// `updated` stamp. `BTreeMap` keeps serialization and iteration order
/// deterministic, which the ranker's output guarantee depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub records: BTreeMap<String, PolicyRecord>,
}

impl PolicyDocument {
    /// Look up a record, falling back to the allow-by-default record.
    pub fn record(&self, name: &str) -> PolicyRecord {
        self.records
            .get(name)
            .cloned()
            .unwrap_or_else(PolicyRecord::default_allow)
    }

    /// Upsert a record and stamp the document.
    pub fn upsert(&mut self, name: impl Into<String>, record: PolicyRecord) {
        self.records.insert(name.into(), record);
        self.updated = Some(Utc::now());
    }
}

#[derive(Debug, Error)]
pub enum PolicyStoreError {
    #[error("Failed to read policy document: {0}")]
    Read(String),

    #[error("Failed to persist policy document: {0}")]
    Persist(String),

    #[error("Malformed policy document: {0}")]
    Malformed(String),
}

/// Persistence contract for policy documents.
///
/// Implementations must persist with atomic replace-on-write
/// (write-temp-then-rename); a bare overwrite risks truncation on crash.
/// No cross-process locking is provided at this layer - callers serialize
/// conflicting writes (see `PauseController`).
#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn load(&self, scope: PolicyScope) -> Result<PolicyDocument, PolicyStoreError>;
    async fn store(&self, scope: PolicyScope, document: &PolicyDocument) -> Result<(), PolicyStoreError>;
}
