//! Canonical store dialect.
//!
//! Items live under `commands/` and `rules/` as `.mdc` (or `.md`) files. The
//! header holds `description`, `tags`, and one nested block per dialect:
//!
//! ```text
//! ---
//! description: Review the current diff
//! tags:
//! - review
//! cursor:
//!   alwaysApply: true
//! vscode:
//!   mode: agent
//! ---
//! Review the staged changes...
//! ```

use super::traits::{DialectAdapter, KindLayout};
use super::utils::{read_common_header, string_seq};
use crate::common::{Item, ItemKind};
use crate::error::SyncError;
use crate::frontmatter::{parse_envelope, render};
use crate::Result;
use serde_yaml::{Mapping, Value};

/// Name under which the canonical dialect is registered.
pub const CANONICAL_DIALECT: &str = "central";

/// Blocks written first, in this order; any others follow alphabetically.
const BLOCK_ORDER: &[&str] = &["cursor", "windsurf", "vscode"];

pub(crate) const COMMANDS: KindLayout = KindLayout {
    dir: "commands",
    extensions: &[".mdc", ".md"],
};

pub(crate) const RULES: KindLayout = KindLayout {
    dir: "rules",
    extensions: &[".mdc", ".md"],
};

/// Adapter for the canonical store format.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentralAdapter;

impl CentralAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl DialectAdapter for CentralAdapter {
    fn name(&self) -> &str {
        CANONICAL_DIALECT
    }

    fn layout(&self, kind: ItemKind) -> Option<KindLayout> {
        Some(match kind {
            ItemKind::Command => COMMANDS,
            ItemKind::Rule => RULES,
        })
    }

    fn parse(&self, kind: ItemKind, content: &str, file_name: &str) -> Result<Item> {
        let envelope = parse_envelope(content).map_err(|message| SyncError::InvalidFrontmatter {
            file: file_name.to_string(),
            message,
        })?;
        let common = read_common_header(&envelope.header_or_empty());
        if !common.loose.is_empty() {
            tracing::debug!(
                file = %file_name,
                keys = common.loose.len(),
                "Ignoring top-level keys outside any dialect block"
            );
        }

        let layout = self.layout(kind).unwrap_or(COMMANDS);
        Ok(Item {
            name: layout.item_name(file_name).unwrap_or(file_name).to_string(),
            description: common.description.unwrap_or_default(),
            body: envelope.body,
            tags: common.tags,
            dialect_config: common.blocks,
        })
    }

    fn serialize(&self, _kind: ItemKind, item: &Item) -> Result<String> {
        let mut header = Mapping::new();
        if !item.description.is_empty() {
            header.insert("description".into(), item.description.as_str().into());
        }
        if !item.tags.is_empty() {
            header.insert("tags".into(), string_seq(&item.tags));
        }

        let mut ordered: Vec<&str> = BLOCK_ORDER.to_vec();
        ordered.extend(
            item.dialect_config
                .iter()
                .map(|(name, _)| name)
                .filter(|name| !BLOCK_ORDER.contains(name)),
        );
        for dialect in ordered {
            if let Some(block) = item.dialect_config.block(dialect) {
                if !block.is_empty() {
                    header.insert(Value::from(dialect), Value::Mapping(block.clone()));
                }
            }
        }

        render(&header, &item.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "---\ndescription: Review code\ntags:\n- review\n- daily\ncursor:\n  alwaysApply: true\nvscode:\n  mode: ask\n---\n\n# Review\n\nLook closely.\n";

    #[test]
    fn parse_reads_all_fields() {
        let item = CentralAdapter
            .parse(ItemKind::Command, SAMPLE, "review.mdc")
            .unwrap();
        assert_eq!(item.name, "review");
        assert_eq!(item.description, "Review code");
        assert_eq!(item.body, "# Review\n\nLook closely.");
        assert_eq!(item.tags, vec!["review", "daily"]);
        assert!(item.dialect_config.contains("cursor"));
        assert!(item.dialect_config.contains("vscode"));
        assert!(!item.dialect_config.contains("windsurf"));
    }

    #[test]
    fn parse_without_header_leaves_description_empty() {
        let item = CentralAdapter
            .parse(ItemKind::Rule, "# Style\n\nUse tabs.", "style.md")
            .unwrap();
        assert_eq!(item.name, "style");
        assert_eq!(item.description, "");
        assert!(item.tags.is_empty());
        assert!(item.dialect_config.is_empty());
    }

    #[test]
    fn serialize_orders_known_blocks_first() {
        let mut item = Item::new("x", "Body").with_description("D");
        let mut block = Mapping::new();
        block.insert("k".into(), "v".into());
        item.dialect_config.set_block("zed", block.clone());
        item.dialect_config.set_block("vscode", block.clone());
        item.dialect_config.set_block("cursor", block);

        let out = CentralAdapter.serialize(ItemKind::Command, &item).unwrap();
        let cursor = out.find("cursor:").unwrap();
        let vscode = out.find("vscode:").unwrap();
        let zed = out.find("zed:").unwrap();
        assert!(out.starts_with("---\ndescription: D\n"));
        assert!(cursor < vscode && vscode < zed);
    }

    #[test]
    fn serialize_omits_empty_fields() {
        let mut item = Item::new("x", "Body");
        item.dialect_config.set_block("cursor", Mapping::new());
        let out = CentralAdapter.serialize(ItemKind::Rule, &item).unwrap();
        assert_eq!(out, "Body\n");
    }

    #[test]
    fn round_trip_preserves_item() {
        let item = CentralAdapter
            .parse(ItemKind::Command, SAMPLE, "review.mdc")
            .unwrap();
        let out = CentralAdapter.serialize(ItemKind::Command, &item).unwrap();
        let again = CentralAdapter
            .parse(ItemKind::Command, &out, "review.mdc")
            .unwrap();
        assert_eq!(item, again);
    }

    #[test]
    fn invalid_yaml_is_reported_with_file_name() {
        let err = CentralAdapter
            .parse(ItemKind::Command, "---\ntags: [x\n---\nBody", "bad.mdc")
            .unwrap_err();
        assert!(err.to_string().contains("bad.mdc"));
    }
}
