// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! File-Backed Persona Store
//!
//! Persona definitions live as YAML files in the `personas/` directory; a
//! definition is disabled by appending the `.disabled` suffix to its file
//! name. The marker-on-name scheme is kept for operational compatibility
//! with the spawner: the enabled check is a plain directory listing, and the
//! toggle is a single atomic `rename`.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::domain::collaborators::{PersonaDefinition, PersonaStore};
use crate::domain::genome::GenomeError;

const PERSONA_EXT: &str = ".yaml";
const DISABLED_EXT: &str = ".yaml.disabled";

pub struct FilePersonaStore {
    dir: PathBuf,
}

impl FilePersonaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn enabled_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}{PERSONA_EXT}"))
    }

    fn disabled_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}{DISABLED_EXT}"))
    }
}

#[async_trait]
impl PersonaStore for FilePersonaStore {
    async fn list(&self) -> Result<Vec<PersonaDefinition>, GenomeError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| GenomeError::Read(format!("{}: {e}", self.dir.display())))?;

        let mut definitions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GenomeError::Read(e.to_string()))?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            // A definition appears under exactly one marker at a time.
            if let Some(name) = file_name.strip_suffix(DISABLED_EXT) {
                definitions.push(PersonaDefinition { name: name.to_string(), enabled: false });
            } else if let Some(name) = file_name.strip_suffix(PERSONA_EXT) {
                definitions.push(PersonaDefinition { name: name.to_string(), enabled: true });
            }
        }
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(definitions)
    }

    async fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), GenomeError> {
        let enabled_path = self.enabled_path(name);
        let disabled_path = self.disabled_path(name);

        let (from, to, already) = if enabled {
            (disabled_path.clone(), enabled_path.clone(), enabled_path.exists())
        } else {
            (enabled_path.clone(), disabled_path.clone(), disabled_path.exists())
        };

        if already {
            debug!(persona = name, enabled, "Requested state already holds");
            return Ok(());
        }
        if !from.exists() {
            return Err(GenomeError::NotFound(name.to_string()));
        }
        std::fs::rename(&from, &to).map_err(|e| GenomeError::Toggle {
            name: name.to_string(),
            source_msg: e.to_string(),
        })
    }
}
