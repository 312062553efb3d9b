// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Activity Readers - decision log and standings table
//!
//! Read-only file implementations of the two activity collaborators the
//! genome registry joins against. The decision log is append-only JSONL
//! (one record per line, malformed lines skipped); the standings table is a
//! JSON document mapping `<engine>:<role>` identifiers to accumulated
//! points.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

use crate::domain::collaborators::{DecisionLog, DecisionRecord, StandingEntry, StandingsTable};

pub struct FileDecisionLog {
    path: PathBuf,
}

impl FileDecisionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DecisionLog for FileDecisionLog {
    async fn records(&self) -> Result<Vec<DecisionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read decision log {}", self.path.display()))?;

        let mut records = Vec::new();
        for (lineno, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<DecisionRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    // The log is append-only and written by another process;
                    // a torn tail line must not poison the whole read.
                    debug!(line = lineno + 1, error = %e, "Skipping malformed decision record");
                }
            }
        }
        Ok(records)
    }
}

#[derive(Debug, Default, Deserialize)]
struct StandingsDocument {
    #[serde(default)]
    #[allow(dead_code)]
    updated: Option<DateTime<Utc>>,
    #[serde(default)]
    standings: BTreeMap<String, i64>,
}

pub struct FileStandingsTable {
    path: PathBuf,
}

impl FileStandingsTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StandingsTable for FileStandingsTable {
    async fn standings(&self) -> Result<Vec<StandingEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read standings {}", self.path.display()))?;
        let document: StandingsDocument = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed standings {}", self.path.display()))?;

        let mut entries = Vec::new();
        for (identifier, points) in document.standings {
            let Some((engine, role)) = identifier.split_once(':') else {
                debug!(identifier, "Skipping standings entry without engine:role identifier");
                continue;
            };
            entries.push(StandingEntry {
                engine: engine.to_string(),
                role: role.to_string(),
                points,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_decision_log_skips_torn_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        std::fs::write(
            &path,
            concat!(
                r#"{"persona":"codex_builder","type":"spawn","timestamp":"2026-08-28T08:00:00Z"}"#,
                "\n",
                r#"{"persona":"codex_builder","type":"sco"#,
            ),
        )
        .unwrap();

        let log = FileDecisionLog::new(&path);
        let records = log.records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].persona, "codex_builder");
    }

    #[tokio::test]
    async fn test_standings_identifier_split() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standings.json");
        std::fs::write(
            &path,
            r#"{"updated":"2026-08-28T08:00:00Z","standings":{"codex:builder":42,"malformed":7}}"#,
        )
        .unwrap();

        let table = FileStandingsTable::new(&path);
        let entries = table.standings().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].engine, "codex");
        assert_eq!(entries[0].role, "builder");
        assert_eq!(entries[0].points, 42);
    }

    #[tokio::test]
    async fn test_missing_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileDecisionLog::new(dir.path().join("x.jsonl")).records().await.unwrap().is_empty());
        assert!(FileStandingsTable::new(dir.path().join("y.json")).standings().await.unwrap().is_empty());
    }
}
