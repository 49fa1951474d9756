use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// File name of the saved per-project settings, relative to the store root.
pub const PROJECTS_FILE: &str = "projects.json";

/// Settings remembered for one project directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "ides", default, skip_serializing_if = "Option::is_none")]
    pub dialects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    /// RFC 3339, UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
}

impl ProjectConfig {
    /// Overlays the fields `update` sets onto `self`.
    ///
    /// Unset fields and empty tag lists leave the existing value alone.
    pub fn merge(&mut self, update: ProjectConfig) {
        if update.name.is_some() {
            self.name = update.name;
        }
        if !update.tags.is_empty() {
            self.tags = update.tags;
        }
        if update.dialects.is_some() {
            self.dialects = update.dialects;
        }
        if update.include.is_some() {
            self.include = update.include;
        }
        if update.exclude.is_some() {
            self.exclude = update.exclude;
        }
    }
}

/// On-disk shape of `projects.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsMapping {
    /// Keyed by absolute project path.
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectConfig>,
}

/// Reads and writes `projects.json` under a store root.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    pub fn new(central_root: &Path) -> Self {
        Self {
            path: central_root.join(PROJECTS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every saved project; a missing file is an empty mapping.
    pub fn load(&self) -> Result<ProjectsMapping> {
        if !self.path.exists() {
            return Ok(ProjectsMapping::default());
        }
        let data = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    pub fn save(&self, mapping: &ProjectsMapping) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(mapping)?)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Saved settings for a project, if any.
    pub fn get(&self, project: &Path) -> Result<Option<ProjectConfig>> {
        let key = project_key(project)?;
        Ok(self.load()?.projects.remove(&key))
    }

    /// Merges `update` over the saved record, stamps `lastSync` and saves.
    pub fn upsert(&self, project: &Path, update: ProjectConfig) -> Result<ProjectConfig> {
        let key = project_key(project)?;
        let mut mapping = self.load()?;
        let entry = mapping.projects.entry(key.clone()).or_default();
        entry.merge(update);
        entry.last_sync = Some(now_rfc3339()?);
        let saved = entry.clone();
        self.save(&mapping)?;
        tracing::debug!(project = %key, "saved project settings");
        Ok(saved)
    }

    /// Forgets a project. Returns false when nothing was saved for it.
    pub fn remove(&self, project: &Path) -> Result<bool> {
        let key = project_key(project)?;
        let mut mapping = self.load()?;
        if mapping.projects.remove(&key).is_none() {
            return Ok(false);
        }
        self.save(&mapping)?;
        Ok(true)
    }
}

/// The key a project is stored under: its absolute path.
pub fn project_key(project: &Path) -> Result<String> {
    let absolute = std::path::absolute(project)
        .with_context(|| format!("Failed to resolve {}", project.display()))?;
    Ok(absolute.to_string_lossy().into_owned())
}

/// Current UTC time as RFC 3339.
pub fn now_rfc3339() -> Result<String> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}
