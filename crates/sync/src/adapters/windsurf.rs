//! Windsurf adapter.
//!
//! Commands are workflows under `.windsurf/workflows/`; rules live under
//! `.windsurf/rules/`. Both carry a header.
//!
//! `auto_execution_mode`: 1 = safe, 3 = turbo.
//! Rule `mode`: `always`, `auto`, `specific` or `disabled`.

use super::traits::{DialectAdapter, KindLayout};
use super::utils::{extend_with_extra, lift_native_keys, read_common_header, string_seq};
use crate::common::{Item, ItemKind};
use crate::error::SyncError;
use crate::frontmatter::{parse_envelope, render};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

const DIALECT: &str = "windsurf";

/// Safe mode.
pub const DEFAULT_AUTO_EXECUTION_MODE: i64 = 1;
pub const DEFAULT_RULE_MODE: &str = "auto";

const COMMANDS: KindLayout = KindLayout {
    dir: ".windsurf/workflows",
    extensions: &[".md"],
};

const RULES: KindLayout = KindLayout {
    dir: ".windsurf/rules",
    extensions: &[".md"],
};

/// Settings block understood by Windsurf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindsurfConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_execution_mode: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Adapter for Windsurf's `.windsurf/` layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindsurfAdapter;

impl WindsurfAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl DialectAdapter for WindsurfAdapter {
    fn name(&self) -> &str {
        DIALECT
    }

    fn layout(&self, kind: ItemKind) -> Option<KindLayout> {
        Some(match kind {
            ItemKind::Command => COMMANDS,
            ItemKind::Rule => RULES,
        })
    }

    fn parse(&self, _kind: ItemKind, content: &str, file_name: &str) -> Result<Item> {
        let envelope = parse_envelope(content).map_err(|message| SyncError::InvalidFrontmatter {
            file: file_name.to_string(),
            message,
        })?;
        let mut common = read_common_header(&envelope.header_or_empty());
        lift_native_keys(&mut common, DIALECT);

        Ok(Item {
            name: COMMANDS
                .item_name(file_name)
                .unwrap_or(file_name)
                .to_string(),
            description: common.description.unwrap_or_default(),
            body: envelope.body,
            tags: common.tags,
            dialect_config: common.blocks,
        })
    }

    fn serialize(&self, kind: ItemKind, item: &Item) -> Result<String> {
        let config: WindsurfConfig = item.dialect_config.typed(DIALECT)?;
        let mut header = Mapping::new();
        header.insert("description".into(), item.description.as_str().into());

        match kind {
            ItemKind::Command => {
                header.insert(
                    "auto_execution_mode".into(),
                    config
                        .auto_execution_mode
                        .unwrap_or(DEFAULT_AUTO_EXECUTION_MODE)
                        .into(),
                );
            }
            ItemKind::Rule => {
                let mode = config
                    .mode
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_RULE_MODE);
                header.insert("mode".into(), mode.into());
                if !config.patterns.is_empty() {
                    header.insert("patterns".into(), string_seq(&config.patterns));
                }
            }
        }

        extend_with_extra(&mut header, &config.extra);
        render(&header, &item.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_header_has_description_and_mode() {
        let item = Item::new("greet", "# Greet\n\nSay hi.").with_description("Say hello");
        let out = WindsurfAdapter.serialize(ItemKind::Command, &item).unwrap();
        assert_eq!(
            out,
            "---\ndescription: Say hello\nauto_execution_mode: 1\n---\n# Greet\n\nSay hi.\n"
        );
    }

    #[test]
    fn command_keeps_configured_execution_mode() {
        let mut block = Mapping::new();
        block.insert("auto_execution_mode".into(), 3.into());
        let mut item = Item::new("deploy", "Ship it.");
        item.dialect_config.set_block("windsurf", block);

        let out = WindsurfAdapter.serialize(ItemKind::Command, &item).unwrap();
        assert!(out.contains("auto_execution_mode: 3\n"));
    }

    #[test]
    fn rule_defaults_mode_auto() {
        let item = Item::new("style", "Use tabs.").with_description("Style");
        let out = WindsurfAdapter.serialize(ItemKind::Rule, &item).unwrap();
        assert_eq!(out, "---\ndescription: Style\nmode: auto\n---\nUse tabs.\n");
    }

    #[test]
    fn rule_mode_does_not_leak_into_commands() {
        let mut block = Mapping::new();
        block.insert("mode".into(), "always".into());
        let mut item = Item::new("x", "Body");
        item.dialect_config.set_block("windsurf", block);

        let out = WindsurfAdapter.serialize(ItemKind::Command, &item).unwrap();
        assert!(!out.contains("mode: always"));
    }

    #[test]
    fn parse_lifts_native_keys_without_inventing_others() {
        let item = WindsurfAdapter
            .parse(
                ItemKind::Command,
                "---\ndescription: Deploy\nauto_execution_mode: 3\n---\nShip it.",
                "deploy.md",
            )
            .unwrap();
        assert_eq!(item.name, "deploy");
        assert_eq!(item.description, "Deploy");
        let config: WindsurfConfig = item.dialect_config.typed("windsurf").unwrap();
        assert_eq!(config.auto_execution_mode, Some(3));
        assert_eq!(config.mode, None);
    }

    #[test]
    fn parse_prefers_nested_block() {
        let item = WindsurfAdapter
            .parse(
                ItemKind::Rule,
                "---\nmode: always\nwindsurf:\n  mode: specific\n---\nBody",
                "r.md",
            )
            .unwrap();
        let config: WindsurfConfig = item.dialect_config.typed("windsurf").unwrap();
        assert_eq!(config.mode.as_deref(), Some("specific"));
    }

    #[test]
    fn parse_without_header_defaults_description() {
        let item = WindsurfAdapter
            .parse(ItemKind::Command, "# Title\nBody", "t.md")
            .unwrap();
        assert_eq!(item.description, "");
        assert!(item.dialect_config.is_empty());
    }
}
