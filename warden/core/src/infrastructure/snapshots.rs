// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Demand Snapshot Sources
//!
//! Implementations of the two best-effort snapshot collaborators the demand
//! detector reads: the work-item tracker backlog and the running-agent
//! registry. HTTP variants carry a short request timeout so a slow
//! collaborator degrades to "no data" instead of stalling a decision cycle;
//! file variants serve single-node deployments where a sidecar sync drops
//! JSON snapshots into the state directory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::collaborators::{RunningAgentRegistry, WorkItem, WorkItemSource};

/// Upper bound on any snapshot fetch.
const SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(5);

fn snapshot_client() -> Client {
    Client::builder()
        .timeout(SNAPSHOT_TIMEOUT)
        .build()
        .unwrap_or_default()
}

async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Snapshot fetch failed: {url}"))?
        .error_for_status()
        .with_context(|| format!("Snapshot fetch rejected: {url}"))?;
    response
        .json::<T>()
        .await
        .with_context(|| format!("Malformed snapshot payload: {url}"))
}

fn read_json_file<T: DeserializeOwned + Default>(path: &PathBuf) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Malformed snapshot {}", path.display()))
}

pub struct HttpWorkItemSource {
    client: Client,
    url: String,
}

impl HttpWorkItemSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { client: snapshot_client(), url: url.into() }
    }
}

#[async_trait]
impl WorkItemSource for HttpWorkItemSource {
    async fn open_items(&self) -> Result<Vec<WorkItem>> {
        fetch_json(&self.client, &self.url).await
    }
}

pub struct HttpRunningAgentRegistry {
    client: Client,
    url: String,
}

impl HttpRunningAgentRegistry {
    pub fn new(url: impl Into<String>) -> Self {
        Self { client: snapshot_client(), url: url.into() }
    }
}

#[async_trait]
impl RunningAgentRegistry for HttpRunningAgentRegistry {
    async fn running_agents(&self) -> Result<BTreeMap<Uuid, String>> {
        fetch_json(&self.client, &self.url).await
    }
}

pub struct FileWorkItemSource {
    path: PathBuf,
}

impl FileWorkItemSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WorkItemSource for FileWorkItemSource {
    async fn open_items(&self) -> Result<Vec<WorkItem>> {
        read_json_file(&self.path)
    }
}

pub struct FileRunningAgentRegistry {
    path: PathBuf,
}

impl FileRunningAgentRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RunningAgentRegistry for FileRunningAgentRegistry {
    async fn running_agents(&self) -> Result<BTreeMap<Uuid, String>> {
        read_json_file(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_snapshot_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let items = FileWorkItemSource::new(dir.path().join("work_items.json"));
        assert!(items.open_items().await.unwrap().is_empty());

        let agents = FileRunningAgentRegistry::new(dir.path().join("running_agents.json"));
        assert!(agents.running_agents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_work_item_snapshot_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work_items.json");
        std::fs::write(
            &path,
            r#"[{"id":7,"title":"Fix flaky login","labels":["bug","auth"]},{"id":8}]"#,
        )
        .unwrap();

        let items = FileWorkItemSource::new(&path).open_items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].labels, vec!["bug", "auth"]);
        assert!(items[1].labels.is_empty());
    }
}
