//! Dialect-independent representation of commands and rules.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

/// The two kinds of item a dialect can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// User-invocable prompt (slash command, workflow, prompt file).
    Command,
    /// Guidance applied always or conditionally.
    Rule,
}

impl ItemKind {
    /// Both kinds, in processing order.
    pub const ALL: [ItemKind; 2] = [ItemKind::Command, ItemKind::Rule];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Command => "command",
            ItemKind::Rule => "rule",
        }
    }

    /// Directory-style plural ("commands", "rules").
    pub fn plural(&self) -> &'static str {
        match self {
            ItemKind::Command => "commands",
            ItemKind::Rule => "rules",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-dialect key/value blocks, keyed by dialect name.
///
/// A block is kept verbatim unless the dialect that owns it interprets it, so
/// converting A → C never drops settings that only B understands. Adapters
/// read their own block through [`DialectConfig::typed`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialectConfig(BTreeMap<String, Mapping>);

impl DialectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw block for a dialect.
    pub fn block(&self, dialect: &str) -> Option<&Mapping> {
        self.0.get(dialect)
    }

    pub fn contains(&self, dialect: &str) -> bool {
        self.0.contains_key(dialect)
    }

    /// Replaces the block for a dialect.
    pub fn set_block(&mut self, dialect: impl Into<String>, block: Mapping) {
        self.0.insert(dialect.into(), block);
    }

    /// Deserializes a dialect's block into its typed record.
    ///
    /// A missing block yields `T::default()`; a block of the wrong shape is an error.
    pub fn typed<T: DeserializeOwned + Default>(&self, dialect: &str) -> crate::Result<T> {
        match self.0.get(dialect) {
            Some(block) => serde_yaml::from_value(Value::Mapping(block.clone())).map_err(|e| {
                anyhow::anyhow!("Invalid '{}' settings block: {}", dialect, e)
            }),
            None => Ok(T::default()),
        }
    }

    /// Iterates blocks in dialect-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Mapping)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Canonical in-memory form of one command or rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier: the file name without the dialect's extension.
    pub name: String,
    /// Free text; empty when nothing supplies one.
    pub description: String,
    /// Markdown payload with the envelope stripped, trimmed.
    pub body: String,
    /// Selection labels, unique, order not significant.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Dialect-specific blocks carried through conversions.
    #[serde(default)]
    pub dialect_config: DialectConfig,
}

impl Item {
    /// Creates an item with a trimmed body and no metadata.
    pub fn new(name: impl Into<String>, body: &str) -> Self {
        Self {
            name: name.into(),
            body: body.trim().to_string(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds tags, ignoring ones already present.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }
}

/// An item file found on disk, before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFile {
    /// Item name (extension stripped).
    pub name: String,
    /// File name as found on disk.
    pub file_name: String,
    pub kind: ItemKind,
    pub path: PathBuf,
    pub content: String,
    /// Size in bytes.
    pub size: u64,
    pub modified: SystemTime,
    /// SHA-256 of the content, lowercase hex.
    pub hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default)]
        flag: bool,
        #[serde(default)]
        list: Vec<String>,
    }

    #[test]
    fn typed_block_defaults_when_missing() {
        let config = DialectConfig::new();
        let sample: Sample = config.typed("cursor").unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn typed_block_reads_values() {
        let mut block = Mapping::new();
        block.insert("flag".into(), true.into());
        block.insert("list".into(), vec!["a", "b"].into());
        let mut config = DialectConfig::new();
        config.set_block("cursor", block);

        let sample: Sample = config.typed("cursor").unwrap();
        assert!(sample.flag);
        assert_eq!(sample.list, vec!["a", "b"]);
    }

    #[test]
    fn typed_block_rejects_wrong_shape() {
        let mut block = Mapping::new();
        block.insert("list".into(), 5.into());
        let mut config = DialectConfig::new();
        config.set_block("cursor", block);

        let err = config.typed::<Sample>("cursor").unwrap_err();
        assert!(err.to_string().contains("'cursor'"));
    }

    #[test]
    fn with_tags_keeps_values_unique() {
        let item = Item::new("x", "  body  ").with_tags(["a", "b", "a"]);
        assert_eq!(item.tags, vec!["a", "b"]);
        assert_eq!(item.body, "body");
    }

    #[test]
    fn kind_display_and_plural() {
        assert_eq!(ItemKind::Command.to_string(), "command");
        assert_eq!(ItemKind::Rule.plural(), "rules");
    }
}
