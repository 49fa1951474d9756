//! Cursor adapter.
//!
//! Commands are plain markdown under `.cursor/commands/` with no header;
//! their description is recovered from the body. Rules are `.mdc` files under
//! `.cursor/rules/` with an `alwaysApply` flag and optional `patterns`.

use super::traits::{DialectAdapter, KindLayout};
use super::utils::{extend_with_extra, lift_native_keys, read_common_header, string_seq};
use crate::common::{Item, ItemKind};
use crate::error::SyncError;
use crate::frontmatter::{
    heuristic_description, parse_envelope, render, render_bare, DEFAULT_DESCRIPTION_LIMIT,
};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

const DIALECT: &str = "cursor";

const COMMANDS: KindLayout = KindLayout {
    dir: ".cursor/commands",
    extensions: &[".md"],
};

const RULES: KindLayout = KindLayout {
    dir: ".cursor/rules",
    extensions: &[".mdc"],
};

/// Settings block understood by Cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CursorConfig {
    #[serde(rename = "alwaysApply", default, skip_serializing_if = "Option::is_none")]
    pub always_apply: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    /// Keys Cursor may use that this adapter does not interpret (e.g. `globs`).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Adapter for Cursor's `.cursor/` layout.
#[derive(Debug, Clone)]
pub struct CursorAdapter {
    description_limit: usize,
}

impl Default for CursorAdapter {
    fn default() -> Self {
        Self {
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
        }
    }
}

impl CursorAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many characters of a paragraph become a derived description.
    pub fn with_description_limit(mut self, limit: usize) -> Self {
        self.description_limit = limit;
        self
    }
}

impl DialectAdapter for CursorAdapter {
    fn name(&self) -> &str {
        DIALECT
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
        let mut common = read_common_header(&envelope.header_or_empty());
        lift_native_keys(&mut common, DIALECT);

        let layout = match kind {
            ItemKind::Command => COMMANDS,
            ItemKind::Rule => RULES,
        };
        let name = layout.item_name(file_name).unwrap_or(file_name).to_string();

        let description = match (kind, common.description) {
            (_, Some(description)) => description,
            (ItemKind::Command, None) => {
                heuristic_description(&envelope.body, &name, self.description_limit)
            }
            (ItemKind::Rule, None) => String::new(),
        };

        Ok(Item {
            name,
            description,
            body: envelope.body,
            tags: common.tags,
            dialect_config: common.blocks,
        })
    }

    fn serialize(&self, kind: ItemKind, item: &Item) -> Result<String> {
        match kind {
            ItemKind::Command => Ok(render_bare(&item.body)),
            ItemKind::Rule => {
                let config: CursorConfig = item.dialect_config.typed(DIALECT)?;
                let mut header = Mapping::new();
                header.insert(
                    "alwaysApply".into(),
                    config.always_apply.unwrap_or(false).into(),
                );
                if !config.patterns.is_empty() {
                    header.insert("patterns".into(), string_seq(&config.patterns));
                }
                extend_with_extra(&mut header, &config.extra);
                render(&header, &item.body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serializes_to_body_only() {
        let item = Item::new("greet", "# Greet\n\nSay hi.").with_description("Say hello");
        let out = CursorAdapter::new()
            .serialize(ItemKind::Command, &item)
            .unwrap();
        assert_eq!(out, "# Greet\n\nSay hi.");
    }

    #[test]
    fn command_description_comes_from_heading() {
        let item = CursorAdapter::new()
            .parse(ItemKind::Command, "# Greet\n\nSay hi.", "greet.md")
            .unwrap();
        assert_eq!(item.name, "greet");
        assert_eq!(item.description, "Greet");
        assert_eq!(item.body, "# Greet\n\nSay hi.");
    }

    #[test]
    fn command_description_uses_configured_limit() {
        let adapter = CursorAdapter::new().with_description_limit(5);
        let item = adapter
            .parse(ItemKind::Command, "Explain this code", "explain.md")
            .unwrap();
        assert_eq!(item.description, "Expla...");
    }

    #[test]
    fn command_description_falls_back_to_file_name() {
        let item = CursorAdapter::new()
            .parse(ItemKind::Command, "", "fix_lint-errors.md")
            .unwrap();
        assert_eq!(item.description, "fix lint errors");
    }

    #[test]
    fn command_header_description_wins() {
        let item = CursorAdapter::new()
            .parse(
                ItemKind::Command,
                "---\ndescription: Explicit\n---\n# Heading",
                "x.md",
            )
            .unwrap();
        assert_eq!(item.description, "Explicit");
    }

    #[test]
    fn rule_defaults_always_apply_false() {
        let item = Item::new("style", "Use tabs.");
        let out = CursorAdapter::new().serialize(ItemKind::Rule, &item).unwrap();
        assert_eq!(out, "---\nalwaysApply: false\n---\nUse tabs.\n");
    }

    #[test]
    fn rule_emits_patterns_and_passthrough_keys() {
        let mut block = Mapping::new();
        block.insert("alwaysApply".into(), true.into());
        block.insert("patterns".into(), vec!["*.rs"].into());
        block.insert("globs".into(), "src/**".into());
        let mut item = Item::new("style", "Use tabs.");
        item.dialect_config.set_block("cursor", block);

        let out = CursorAdapter::new().serialize(ItemKind::Rule, &item).unwrap();
        let envelope = parse_envelope(&out).unwrap();
        let header = envelope.header.unwrap();
        let keys: Vec<&str> = header.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["alwaysApply", "patterns", "globs"]);
        assert_eq!(header.get("globs").and_then(Value::as_str), Some("src/**"));
        assert_eq!(envelope.body, "Use tabs.");
    }

    #[test]
    fn rule_parse_lifts_top_level_keys() {
        let item = CursorAdapter::new()
            .parse(
                ItemKind::Rule,
                "---\nalwaysApply: true\n---\nUse tabs.",
                "style.mdc",
            )
            .unwrap();
        assert_eq!(item.name, "style");
        assert_eq!(item.description, "");
        let config: CursorConfig = item.dialect_config.typed("cursor").unwrap();
        assert_eq!(config.always_apply, Some(true));
        assert!(config.patterns.is_empty());
    }

    #[test]
    fn rule_parse_does_not_invent_settings() {
        let item = CursorAdapter::new()
            .parse(ItemKind::Rule, "Use tabs.", "style.mdc")
            .unwrap();
        assert!(item.dialect_config.is_empty());
    }
}
