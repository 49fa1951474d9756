//! Trait definition for dialect adapters.

use crate::common::{Item, ItemKind};
use crate::Result;

/// Where a dialect keeps one kind of item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindLayout {
    /// Directory relative to the project (or store) root.
    pub dir: &'static str,
    /// Recognised file extensions; the first one is used when writing.
    pub extensions: &'static [&'static str],
}

impl KindLayout {
    /// Extension used for newly written files.
    pub fn primary_extension(&self) -> &'static str {
        self.extensions.first().copied().unwrap_or(".md")
    }

    /// File name for an item written in this layout.
    pub fn file_name(&self, name: &str) -> String {
        format!("{}{}", name, self.primary_extension())
    }

    /// Item name for a file, or `None` if the extension is not recognised.
    pub fn item_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        self.extensions
            .iter()
            .filter_map(|ext| file_name.strip_suffix(ext))
            .find(|stem| !stem.is_empty())
    }
}

#[cfg(test)]
use mockall::automock;

/// Parse/serialize pair for one IDE dialect.
///
/// Both directions are pure: no I/O, no shared state. `serialize` must be
/// deterministic, and `parse(serialize(item))` must give back the same body.
#[cfg_attr(test, automock)]
pub trait DialectAdapter: Send + Sync {
    /// Dialect identifier (e.g., "cursor", "windsurf")
    fn name(&self) -> &str;

    /// Storage layout for a kind, or `None` when the dialect lacks that kind.
    fn layout(&self, kind: ItemKind) -> Option<KindLayout>;

    /// Whether the dialect can hold items of this kind.
    fn supports(&self, kind: ItemKind) -> bool {
        self.layout(kind).is_some()
    }

    /// Parses raw file content into the canonical form.
    fn parse(&self, kind: ItemKind, content: &str, file_name: &str) -> Result<Item>;

    /// Renders the canonical form as file content.
    fn serialize(&self, kind: ItemKind, item: &Item) -> Result<String>;
}
