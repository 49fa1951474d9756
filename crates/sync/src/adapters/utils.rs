//! Shared helpers for dialect adapters.

use crate::common::DialectConfig;
use crate::Result;
use anyhow::Context;
use serde_yaml::{Mapping, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Every extension any built-in dialect recognises, longest first.
pub const KNOWN_EXTENSIONS: &[&str] = &[".instructions.md", ".prompt.md", ".mdc", ".md"];

/// Returns true if the name starts with a dot (hidden file/directory).
pub fn is_hidden_component(name: &str) -> bool {
    name.starts_with('.')
}

/// Computes a SHA-256 hash of the given content, returning a lowercase hex string.
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Strips a recognised extension from an item reference.
///
/// `greet.mdc`, `greet.md` and `greet` all name the item `greet`.
pub fn normalize_item_name(reference: &str) -> String {
    let reference = reference.trim();
    for ext in KNOWN_EXTENSIONS {
        if let Some(stem) = reference.strip_suffix(ext) {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }
    reference.to_string()
}

/// Keeps only characters that are safe inside a single file name.
///
/// Path separators and `..` never survive, so a hostile item name cannot
/// escape the target directory.
pub fn sanitize_name(name: &str) -> String {
    let clean = name
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .map(|segment| {
            segment
                .chars()
                .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
                .collect::<String>()
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if clean != name {
        tracing::warn!(original = name, sanitized = %clean, "Item name rewritten for the file system");
    }
    clean
}

/// Outcome of [`write_if_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// Returns whether writing `content` to `path` would change anything.
pub fn would_change(path: &Path, content: &str) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    let existing =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(hash_content(&existing) != hash_content(content.as_bytes()))
}

/// Writes a file unless it already holds identical bytes.
///
/// Creates parent directories as needed.
pub fn write_if_changed(path: &Path, content: &str) -> Result<WriteOutcome> {
    if !would_change(path, content)? {
        return Ok(WriteOutcome::Unchanged);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(WriteOutcome::Written)
}

/// Like [`write_if_changed`], but on a dry run only reports what would happen.
pub fn write_or_plan(path: &Path, content: &str, dry_run: bool) -> Result<WriteOutcome> {
    if !dry_run {
        return write_if_changed(path, content);
    }
    Ok(if would_change(path, content)? {
        WriteOutcome::Written
    } else {
        WriteOutcome::Unchanged
    })
}

/// Header fields every dialect reads the same way.
#[derive(Debug, Default)]
pub(crate) struct CommonHeader {
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Nested mappings, taken to be dialect blocks.
    pub blocks: DialectConfig,
    /// Remaining top-level keys that are not blocks.
    pub loose: Mapping,
}

/// Sorts a header mapping into description, tags, dialect blocks and loose keys.
pub(crate) fn read_common_header(header: &Mapping) -> CommonHeader {
    let mut out = CommonHeader::default();
    for (key, value) in header {
        let Some(key) = key.as_str() else {
            continue;
        };
        match (key, value) {
            ("description", Value::Null) => {}
            ("description", value) => out.description = scalar_to_string(value),
            ("tags", value) => {
                for tag in string_list(value) {
                    if !out.tags.contains(&tag) {
                        out.tags.push(tag);
                    }
                }
            }
            (_, Value::Mapping(block)) => out.blocks.set_block(key, block.clone()),
            (_, value) => {
                out.loose.insert(Value::from(key), value.clone());
            }
        }
    }
    out
}

/// Fills a dialect's own block from its top-level keys when no nested block exists.
///
/// Only keys present in the file are carried over.
pub(crate) fn lift_native_keys(common: &mut CommonHeader, dialect: &str) {
    if !common.blocks.contains(dialect) && !common.loose.is_empty() {
        common
            .blocks
            .set_block(dialect, std::mem::take(&mut common.loose));
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(seq) => seq.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

/// Appends passthrough keys after a dialect's known keys.
pub(crate) fn extend_with_extra(header: &mut Mapping, extra: &BTreeMap<String, Value>) {
    for (key, value) in extra {
        let key = Value::from(key.as_str());
        if !header.contains_key(&key) {
            header.insert(key, value.clone());
        }
    }
}

pub(crate) fn string_seq(values: &[String]) -> Value {
    Value::Sequence(values.iter().map(|v| Value::from(v.as_str())).collect())
}
