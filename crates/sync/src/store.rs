//! Accessor for the canonical store directory.
//!
//! Layout under the root:
//!
//! ```text
//! commands/   *.mdc (or *.md)
//! rules/      *.mdc (or *.md)
//! config.json
//! projects.json
//! ```

use crate::adapters::utils::normalize_item_name;
use crate::adapters::{KindLayout, CENTRAL_COMMANDS, CENTRAL_RULES};
use crate::common::{ItemFile, ItemKind};
use crate::config::CentralConfig;
use crate::error::SyncError;
use crate::scanner::{list_dir, read_item_file, scan_dir};
use crate::Result;
use anyhow::Context;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the global configuration file.
pub const CONFIG_FILE: &str = "config.json";

/// What [`CanonicalStore::init`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOutcome {
    /// Directories and files that were created.
    pub created: Vec<PathBuf>,
    /// True when the store already existed.
    pub already_initialized: bool,
}

/// Read access to the single source-of-truth directory.
#[derive(Debug, Clone)]
pub struct CanonicalStore {
    root: PathBuf,
}

impl CanonicalStore {
    /// Store at the default root (`CONFLOWS_HOME`, else `~/.conflows`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_root(conflows_state::central_root()?))
    }

    /// Store at an explicit root (for testing).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(kind: ItemKind) -> KindLayout {
        match kind {
            ItemKind::Command => CENTRAL_COMMANDS,
            ItemKind::Rule => CENTRAL_RULES,
        }
    }

    /// Directory holding one kind of item.
    pub fn dir(&self, kind: ItemKind) -> PathBuf {
        self.root.join(Self::layout(kind).dir)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn is_initialized(&self) -> bool {
        ItemKind::ALL.iter().any(|kind| self.dir(*kind).is_dir())
    }

    /// Fails with [`SyncError::StoreNotInitialized`] unless the store exists.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(SyncError::StoreNotInitialized {
                path: self.root.clone(),
            }
            .into())
        }
    }

    /// Creates the store layout and a starter `config.json`.
    ///
    /// Safe to repeat: existing directories and config are left alone.
    pub fn init(&self) -> Result<InitOutcome> {
        let mut outcome = InitOutcome {
            already_initialized: self.is_initialized(),
            ..Default::default()
        };

        for kind in ItemKind::ALL {
            let dir = self.dir(kind);
            if !dir.is_dir() {
                fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
                outcome.created.push(dir);
            }
        }

        let config_path = self.config_path();
        if !config_path.exists() {
            self.save_config(&CentralConfig::starter())?;
            outcome.created.push(config_path);
        }

        if outcome.already_initialized {
            tracing::warn!(root = %self.root.display(), "Canonical store already initialized");
        } else {
            tracing::info!(root = %self.root.display(), "Initialized canonical store");
        }
        Ok(outcome)
    }

    /// Every item of one kind, sorted by name.
    pub fn scan(&self, kind: ItemKind) -> Result<Vec<ItemFile>> {
        scan_dir(&self.dir(kind), &Self::layout(kind), kind)
    }

    /// Fetches one item by name, with or without its extension.
    ///
    /// Returns `Ok(None)` when no file matches.
    pub fn get(&self, kind: ItemKind, name: &str) -> Result<Option<ItemFile>> {
        let name = normalize_item_name(name);
        if name.is_empty() || name.contains(['/', '\\']) {
            return Ok(None);
        }
        let dir = self.dir(kind);
        for ext in Self::layout(kind).extensions {
            let path = dir.join(format!("{}{}", name, ext));
            if path.is_file() {
                return read_item_file(&path, &name, kind).map(Some);
            }
        }
        Ok(None)
    }

    /// Names of every item across both kinds, sorted and unique.
    ///
    /// Only file names are consulted, so an unreadable item is still listed.
    pub fn item_names(&self) -> Result<Vec<String>> {
        let mut names = BTreeSet::new();
        for kind in ItemKind::ALL {
            names.extend(
                list_dir(&self.dir(kind), &Self::layout(kind))?
                    .into_iter()
                    .map(|(name, _)| name),
            );
        }
        Ok(names.into_iter().collect())
    }

    /// Reads `config.json`; a missing file means all defaults.
    pub fn config(&self) -> Result<CentralConfig> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(CentralConfig::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save_config(&self, config: &CentralConfig) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create directory: {}", self.root.display()))?;
        let path = self.config_path();
        fs::write(&path, serde_json::to_string_pretty(config)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
