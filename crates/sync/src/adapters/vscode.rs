//! VS Code (GitHub Copilot) adapter.
//!
//! Commands are `*.prompt.md` files under `.github/prompts/` with `mode`,
//! `description`, `tools` and an optional `model`. Rules are
//! `*.instructions.md` files under `.github/instructions/` with `applyTo`
//! and `description`.

use super::traits::{DialectAdapter, KindLayout};
use super::utils::{extend_with_extra, lift_native_keys, read_common_header, string_seq};
use crate::common::{Item, ItemKind};
use crate::error::SyncError;
use crate::frontmatter::{parse_envelope, render};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

const DIALECT: &str = "vscode";

pub const DEFAULT_PROMPT_MODE: &str = "agent";
pub const DEFAULT_APPLY_TO: &str = "**";

const PROMPTS: KindLayout = KindLayout {
    dir: ".github/prompts",
    extensions: &[".prompt.md"],
};

const INSTRUCTIONS: KindLayout = KindLayout {
    dir: ".github/instructions",
    extensions: &[".instructions.md"],
};

/// Settings block understood by VS Code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VscodeConfig {
    /// `agent`, `ask` or `edit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
    #[serde(rename = "applyTo", default, skip_serializing_if = "Option::is_none")]
    pub apply_to: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Adapter for the `.github/` prompt and instruction layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct VscodeAdapter;

impl VscodeAdapter {
    pub fn new() -> Self {
        Self
    }

    fn kind_layout(kind: ItemKind) -> KindLayout {
        match kind {
            ItemKind::Command => PROMPTS,
            ItemKind::Rule => INSTRUCTIONS,
        }
    }
}

impl DialectAdapter for VscodeAdapter {
    fn name(&self) -> &str {
        DIALECT
    }

    fn layout(&self, kind: ItemKind) -> Option<KindLayout> {
        Some(Self::kind_layout(kind))
    }

    fn parse(&self, kind: ItemKind, content: &str, file_name: &str) -> Result<Item> {
        let envelope = parse_envelope(content).map_err(|message| SyncError::InvalidFrontmatter {
            file: file_name.to_string(),
            message,
        })?;
        let mut common = read_common_header(&envelope.header_or_empty());
        lift_native_keys(&mut common, DIALECT);

        Ok(Item {
            name: Self::kind_layout(kind)
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
        let config: VscodeConfig = item.dialect_config.typed(DIALECT)?;
        let mut header = Mapping::new();

        match kind {
            ItemKind::Command => {
                let mode = config
                    .mode
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_PROMPT_MODE);
                header.insert("mode".into(), mode.into());
                header.insert("description".into(), item.description.as_str().into());
                header.insert(
                    "tools".into(),
                    string_seq(config.tools.as_deref().unwrap_or_default()),
                );
                if let Some(model) = config.model.as_deref().filter(|m| !m.is_empty()) {
                    header.insert("model".into(), model.into());
                }
            }
            ItemKind::Rule => {
                let apply_to = config
                    .apply_to
                    .as_deref()
                    .filter(|a| !a.is_empty())
                    .unwrap_or(DEFAULT_APPLY_TO);
                header.insert("applyTo".into(), apply_to.into());
                header.insert("description".into(), item.description.as_str().into());
            }
        }

        extend_with_extra(&mut header, &config.extra);
        render(&header, &item.body)
    }
}
