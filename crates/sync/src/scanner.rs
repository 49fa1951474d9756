//! Enumerates item files in a dialect directory.

use crate::adapters::utils::{hash_content, is_hidden_component};
use crate::adapters::{DialectAdapter, KindLayout};
use crate::common::{ItemFile, ItemKind};
use crate::registry::Registry;
use crate::Result;
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Reads every file in `dir` whose extension the layout recognises.
///
/// Only the directory itself is read, not subdirectories. When two files
/// map to the same item name (`greet.mdc` and `greet.md`), the one with the
/// earlier extension in the layout wins. A missing directory is empty. A file
/// that cannot be read is logged and left out; the rest are still returned.
pub fn scan_dir(dir: &Path, layout: &KindLayout, kind: ItemKind) -> Result<Vec<ItemFile>> {
    let mut files = Vec::new();
    for (name, path) in list_dir(dir, layout)? {
        match read_item_file(&path, &name, kind) {
            Ok(file) => files.push(file),
            Err(e) => {
                tracing::warn!(item = %name, path = %path.display(), error = ?e, "Unreadable item, skipping");
            }
        }
    }
    Ok(files)
}

/// Item names and paths in `dir`, without reading file contents.
///
/// Sorted by name, with duplicates resolved the same way as [`scan_dir`].
pub fn list_dir(dir: &Path, layout: &KindLayout) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut found: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if is_hidden_component(file_name) {
            continue;
        }
        let Some((rank, name)) = match_extension(layout, file_name) else {
            continue;
        };

        if let Some((kept_rank, kept_path)) = found.get(name) {
            let keep_existing = *kept_rank <= rank;
            let (kept, ignored) = if keep_existing {
                (kept_path.as_path(), path)
            } else {
                (path, kept_path.as_path())
            };
            tracing::warn!(
                item = %name,
                kept = %kept.display(),
                ignored = %ignored.display(),
                "Duplicate item name"
            );
            if keep_existing {
                continue;
            }
        }

        found.insert(name.to_string(), (rank, path.to_path_buf()));
    }

    Ok(found
        .into_iter()
        .map(|(name, (_, path))| (name, path))
        .collect())
}

/// Reads one item file from disk.
pub(crate) fn read_item_file(path: &Path, name: &str, kind: ItemKind) -> Result<ItemFile> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let metadata =
        fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
    Ok(ItemFile {
        name: name.to_string(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        kind,
        path: path.to_path_buf(),
        hash: hash_content(content.as_bytes()),
        size: metadata.len(),
        modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        content,
    })
}

fn match_extension<'a>(layout: &KindLayout, file_name: &'a str) -> Option<(usize, &'a str)> {
    layout
        .extensions
        .iter()
        .enumerate()
        .filter_map(|(rank, ext)| file_name.strip_suffix(ext).map(|stem| (rank, stem)))
        .find(|(_, stem)| !stem.is_empty())
}

/// Reads one kind of item from a project directory in a dialect's layout.
pub fn scan_project(
    root: &Path,
    adapter: &dyn DialectAdapter,
    kind: ItemKind,
) -> Result<Vec<ItemFile>> {
    match adapter.layout(kind) {
        Some(layout) => scan_dir(&root.join(layout.dir), &layout, kind),
        None => Ok(Vec::new()),
    }
}

/// What one dialect has in a project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectInventory {
    pub dialect: String,
    pub commands: Vec<ItemFile>,
    pub rules: Vec<ItemFile>,
}

impl DialectInventory {
    pub fn items(&self, kind: ItemKind) -> &[ItemFile] {
        match kind {
            ItemKind::Command => &self.commands,
            ItemKind::Rule => &self.rules,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.rules.is_empty()
    }
}

/// Inventories every target dialect in `root`, in registry order.
pub fn detect(root: &Path, registry: &Registry) -> Result<Vec<DialectInventory>> {
    let mut out = Vec::new();
    for name in registry.target_names() {
        let adapter = registry.get(name)?;
        out.push(DialectInventory {
            dialect: name.to_string(),
            commands: scan_project(root, adapter, ItemKind::Command)?,
            rules: scan_project(root, adapter, ItemKind::Rule)?,
        });
    }
    Ok(out)
}
