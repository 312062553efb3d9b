// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! TTL-Cached Taxonomy Loader
//!
//! Reads `taxonomy.yaml` from the state directory, holding the parsed result
//! for a short TTL to bound staleness against file-edit-based configuration
//! changes without re-parsing on every decision cycle. Any load failure
//! substitutes the built-in default taxonomy - policy decisions must degrade
//! gracefully, never hang.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::domain::taxonomy::{Taxonomy, TaxonomyProvider};

pub struct FileTaxonomyProvider {
    path: PathBuf,
    ttl: Duration,
    cache: RwLock<Option<(Instant, Taxonomy)>>,
}

impl FileTaxonomyProvider {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
            cache: RwLock::new(None),
        }
    }

    fn load_from_disk(&self) -> Taxonomy {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Taxonomy document absent; using built-in default");
            return Taxonomy::builtin_default();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => match serde_yaml::from_str::<Taxonomy>(&raw) {
                Ok(taxonomy) => taxonomy,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Malformed taxonomy; using built-in default");
                    Taxonomy::builtin_default()
                }
            },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable taxonomy; using built-in default");
                Taxonomy::builtin_default()
            }
        }
    }
}

#[async_trait]
impl TaxonomyProvider for FileTaxonomyProvider {
    async fn load(&self) -> Taxonomy {
        if let Some((stamp, taxonomy)) = self.cache.read().as_ref() {
            if stamp.elapsed() < self.ttl {
                return taxonomy.clone();
            }
        }
        let taxonomy = self.load_from_disk();
        *self.cache.write() = Some((Instant::now(), taxonomy.clone()));
        taxonomy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileTaxonomyProvider::new(dir.path().join("taxonomy.yaml"), Duration::from_secs(30));
        let taxonomy = provider.load().await;
        assert_eq!(taxonomy, Taxonomy::builtin_default());
    }

    #[tokio::test]
    async fn test_parses_yaml_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.yaml");
        std::fs::write(
            &path,
            r#"
always_allowed_roles: [overseer]
pipeline_order: [research, dev]
pipelines:
  research:
    roles: [scout]
    labels: [paper]
  dev:
    roles: [builder]
    labels: [bug]
"#,
        )
        .unwrap();

        let provider = FileTaxonomyProvider::new(&path, Duration::from_secs(30));
        let taxonomy = provider.load().await;
        assert_eq!(taxonomy.pipeline_order, vec!["research", "dev"]);
        assert_eq!(taxonomy.pipeline_for_role("scout"), Some("research"));
    }

    #[tokio::test]
    async fn test_cache_serves_stale_within_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.yaml");
        std::fs::write(&path, "pipeline_order: [dev]\n").unwrap();

        let provider = FileTaxonomyProvider::new(&path, Duration::from_secs(600));
        let first = provider.load().await;
        std::fs::write(&path, "pipeline_order: [biz]\n").unwrap();
        let second = provider.load().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_yaml_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.yaml");
        std::fs::write(&path, "pipelines: [not, a, map]\n").unwrap();

        let provider = FileTaxonomyProvider::new(&path, Duration::from_secs(30));
        assert_eq!(provider.load().await, Taxonomy::builtin_default());
    }
}
