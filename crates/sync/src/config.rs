//! Central configuration and sync-policy resolution.
//!
//! Each of the four policy fields (dialects, tags, include, exclude) is
//! resolved on its own: invocation options first, then the project's saved
//! settings, then the store's global defaults. An empty list counts as unset.

use crate::adapters::utils::normalize_item_name;
use crate::frontmatter::DEFAULT_DESCRIPTION_LIMIT;
use crate::store::CanonicalStore;
use crate::Result;
use conflows_state::{ProjectConfig, ProjectStore};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Dialects used when nothing else names any.
pub const DEFAULT_DIALECTS: [&str; 2] = ["cursor", "windsurf"];

/// One named group of items in `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDefinition {
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "workflows")]
    pub items: Vec<String>,
}

/// Contents of the store's `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralConfig {
    #[serde(default)]
    pub tags: BTreeMap<String, TagDefinition>,
    #[serde(rename = "defaultIDEs", default, skip_serializing_if = "Option::is_none")]
    pub default_dialects: Option<Vec<String>>,
    /// Truncation length for derived descriptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_limit: Option<usize>,
}

impl CentralConfig {
    /// Config written by `init`: the built-in default dialects and no tags.
    pub fn starter() -> Self {
        Self {
            default_dialects: Some(DEFAULT_DIALECTS.iter().map(|d| d.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn description_limit(&self) -> usize {
        self.description_limit.unwrap_or(DEFAULT_DESCRIPTION_LIMIT)
    }

    /// Item names a tag stands for, normalised. `None` for an unknown tag.
    pub fn expand_tag(&self, tag: &str) -> Option<Vec<String>> {
        self.tags
            .get(tag)
            .map(|def| def.items.iter().map(|i| normalize_item_name(i)).collect())
    }
}

/// Per-invocation options. `None` or an empty list defers to lower levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOptions {
    pub dialects: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

/// The fully resolved answer to "what goes where".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPolicy {
    /// Target dialects, de-duplicated, in the order given.
    pub dialects: Vec<String>,
    pub tags: Vec<String>,
    /// Canonical item names to distribute, sorted and unique.
    pub items: Vec<String>,
    /// Raw include list, kept for persistence.
    pub include: Vec<String>,
    /// Raw exclude list, kept for persistence.
    pub exclude: Vec<String>,
    /// Tags that matched no definition.
    pub unknown_tags: Vec<String>,
}

impl ResolvedPolicy {
    /// The subset of this policy saved as project settings.
    pub fn to_project_config(&self) -> ProjectConfig {
        ProjectConfig {
            tags: self.tags.clone(),
            dialects: Some(self.dialects.clone()),
            include: Some(self.include.clone()).filter(|v| !v.is_empty()),
            exclude: Some(self.exclude.clone()).filter(|v| !v.is_empty()),
            ..Default::default()
        }
    }
}

fn first_set<'a>(levels: &[Option<&'a Vec<String>>]) -> Option<&'a Vec<String>> {
    levels.iter().flatten().copied().find(|v| !v.is_empty())
}

fn dedup_in_order(values: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && seen.insert(v.to_string()))
        .map(String::from)
        .collect()
}

/// Merges the three levels into one policy.
///
/// `all_items` is every name in the canonical store; it is the base
/// selection when no tags are set anywhere. Unknown tags select nothing.
pub fn resolve_policy(
    options: &SyncOptions,
    project: Option<&ProjectConfig>,
    central: &CentralConfig,
    all_items: &[String],
) -> ResolvedPolicy {
    let dialects = first_set(&[
        options.dialects.as_ref(),
        project.and_then(|p| p.dialects.as_ref()),
        central.default_dialects.as_ref(),
    ])
    .map(|d| dedup_in_order(d))
    .unwrap_or_else(|| DEFAULT_DIALECTS.iter().map(|d| d.to_string()).collect());

    let tags = first_set(&[options.tags.as_ref(), project.map(|p| &p.tags)])
        .map(|t| dedup_in_order(t))
        .unwrap_or_default();
    let include = first_set(&[
        options.include.as_ref(),
        project.and_then(|p| p.include.as_ref()),
    ])
    .cloned()
    .unwrap_or_default();
    let exclude = first_set(&[
        options.exclude.as_ref(),
        project.and_then(|p| p.exclude.as_ref()),
    ])
    .cloned()
    .unwrap_or_default();

    let mut unknown_tags = Vec::new();
    let mut selected: BTreeSet<String> = BTreeSet::new();
    if tags.is_empty() {
        selected.extend(all_items.iter().map(|i| normalize_item_name(i)));
    } else {
        for tag in &tags {
            match central.expand_tag(tag) {
                Some(items) => selected.extend(items),
                None => {
                    tracing::warn!(tag = %tag, "Unknown tag; it selects nothing");
                    unknown_tags.push(tag.clone());
                }
            }
        }
    }
    selected.extend(include.iter().map(|i| normalize_item_name(i)));
    for name in &exclude {
        selected.remove(&normalize_item_name(name));
    }
    selected.retain(|name| !name.is_empty());

    ResolvedPolicy {
        dialects,
        tags,
        items: selected.into_iter().collect(),
        include,
        exclude,
        unknown_tags,
    }
}

/// Reads the three configuration levels from disk and resolves them.
pub struct ConfigResolver<'a> {
    store: &'a CanonicalStore,
    projects: ProjectStore,
}

impl<'a> ConfigResolver<'a> {
    /// Uses the `projects.json` that lives beside the store.
    pub fn new(store: &'a CanonicalStore) -> Self {
        Self {
            store,
            projects: ProjectStore::new(store.root()),
        }
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn resolve(&self, project_root: &Path, options: &SyncOptions) -> Result<ResolvedPolicy> {
        let central = self.store.config()?;
        let saved = self.projects.get(project_root)?;
        let all_items = self.store.item_names()?;
        Ok(resolve_policy(options, saved.as_ref(), &central, &all_items))
    }

    /// Saves the policy's inputs for the project and stamps `lastSync`.
    pub fn remember(&self, project_root: &Path, policy: &ResolvedPolicy) -> Result<ProjectConfig> {
        self.projects
            .upsert(project_root, policy.to_project_config())
    }
}
