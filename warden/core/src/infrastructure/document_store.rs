// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Flat-File Document Store
//!
//! JSON persistence for the policy and pause-state documents: one file per
//! document in the warden's state directory. Writes go through
//! write-temp-then-rename; a bare overwrite risks truncation if the process
//! crashes mid-write. No cross-process locking - the warden assumes a single
//! writer process for these documents.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::domain::pause::{PauseState, PauseStateStore};
use crate::domain::policy::{PolicyDocument, PolicyScope, PolicyStore, PolicyStoreError};

const PIPELINE_POLICY_FILE: &str = "pipeline_policy.json";
const ENGINE_POLICY_FILE: &str = "engine_policy.json";
const PAUSE_STATE_FILE: &str = "pause_state.json";

pub struct FileDocumentStore {
    dir: PathBuf,
}

impl FileDocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn scope_path(&self, scope: PolicyScope) -> PathBuf {
        match scope {
            PolicyScope::Pipeline => self.dir.join(PIPELINE_POLICY_FILE),
            PolicyScope::Engine => self.dir.join(ENGINE_POLICY_FILE),
        }
    }

    fn read_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T, PolicyStoreError> {
        if !path.exists() {
            return Ok(T::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PolicyStoreError::Read(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| PolicyStoreError::Malformed(format!("{}: {e}", path.display())))
    }

    fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), PolicyStoreError> {
        let parent = path
            .parent()
            .ok_or_else(|| PolicyStoreError::Persist(format!("{} has no parent", path.display())))?;
        std::fs::create_dir_all(parent)
            .map_err(|e| PolicyStoreError::Persist(format!("{}: {e}", parent.display())))?;

        let json = serde_json::to_string_pretty(document)
            .map_err(|e| PolicyStoreError::Persist(e.to_string()))?;

        // Atomic replace: write the sibling temp file, then rename over the
        // target.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| PolicyStoreError::Persist(format!("{}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| PolicyStoreError::Persist(format!("{}: {e}", path.display())))?;
        Ok(())
    }
}

#[async_trait]
impl PolicyStore for FileDocumentStore {
    async fn load(&self, scope: PolicyScope) -> Result<PolicyDocument, PolicyStoreError> {
        Self::read_document(&self.scope_path(scope))
    }

    async fn store(&self, scope: PolicyScope, document: &PolicyDocument) -> Result<(), PolicyStoreError> {
        Self::write_document(&self.scope_path(scope), document)
    }
}

#[async_trait]
impl PauseStateStore for FileDocumentStore {
    async fn load(&self) -> Result<PauseState, PolicyStoreError> {
        Self::read_document(&self.dir.join(PAUSE_STATE_FILE))
    }

    async fn store(&self, state: &PauseState) -> Result<(), PolicyStoreError> {
        Self::write_document(&self.dir.join(PAUSE_STATE_FILE), state)
    }
}
