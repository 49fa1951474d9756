//! Dialect-to-dialect conversion through the canonical form.

use crate::adapters::DialectAdapter;
use crate::common::{Item, ItemKind};
use crate::error::SyncError;
use crate::registry::Registry;
use crate::Result;

/// Converts content between any two registered dialects.
///
/// Every call is a fresh parse/serialize pair; nothing is cached.
pub struct Transformer<'a> {
    registry: &'a Registry,
}

impl<'a> Transformer<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Converts one file's content from `from` to `to`.
    ///
    /// Fails if either dialect is unknown or either side lacks `kind`.
    pub fn transform(
        &self,
        kind: ItemKind,
        content: &str,
        file_name: &str,
        from: &str,
        to: &str,
    ) -> Result<String> {
        let source = self.registry.get(from)?;
        let target = self.registry.get(to)?;
        require_support(source, kind)?;
        require_support(target, kind)?;

        let item = source.parse(kind, content, file_name)?;
        target.serialize(kind, &item)
    }

    pub fn transform_command(
        &self,
        content: &str,
        file_name: &str,
        from: &str,
        to: &str,
    ) -> Result<String> {
        self.transform(ItemKind::Command, content, file_name, from, to)
    }

    pub fn transform_rule(
        &self,
        content: &str,
        file_name: &str,
        from: &str,
        to: &str,
    ) -> Result<String> {
        self.transform(ItemKind::Rule, content, file_name, from, to)
    }

    /// Parses content with a dialect without converting it.
    pub fn parse(&self, kind: ItemKind, content: &str, file_name: &str, from: &str) -> Result<Item> {
        let source = self.registry.get(from)?;
        require_support(source, kind)?;
        source.parse(kind, content, file_name)
    }
}

fn require_support(adapter: &dyn DialectAdapter, kind: ItemKind) -> Result<()> {
    if adapter.supports(kind) {
        Ok(())
    } else {
        Err(SyncError::Unsupported {
            dialect: adapter.name().to_string(),
            kind,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::traits::MockDialectAdapter;
    use crate::error::classify;

    const CENTRAL_GREET: &str = "---\ndescription: Say hello\ntags:\n- basics\nwindsurf:\n  auto_execution_mode: 3\n---\n# Greet\n\nSay hi.\n";

    fn commands_only() -> MockDialectAdapter {
        let mut mock = MockDialectAdapter::new();
        mock.expect_name().return_const("notes".to_string());
        mock.expect_supports()
            .returning(|kind| kind == ItemKind::Command);
        mock.expect_serialize()
            .returning(|_, item| Ok(format!("NOTE {}", item.body)));
        mock
    }

    #[test]
    fn central_to_cursor_command_is_body_only() {
        let registry = Registry::builtin();
        let out = Transformer::new(&registry)
            .transform_command(CENTRAL_GREET, "greet.mdc", "central", "cursor")
            .unwrap();
        assert_eq!(out, "# Greet\n\nSay hi.");
    }

    #[test]
    fn central_to_windsurf_keeps_description_and_block() {
        let registry = Registry::builtin();
        let out = Transformer::new(&registry)
            .transform_command(CENTRAL_GREET, "greet.mdc", "central", "windsurf")
            .unwrap();
        assert_eq!(
            out,
            "---\ndescription: Say hello\nauto_execution_mode: 3\n---\n# Greet\n\nSay hi.\n"
        );
    }

    #[test]
    fn passthrough_blocks_survive_intermediate_dialect() {
        let registry = Registry::builtin();
        let transformer = Transformer::new(&registry);

        let vscode = transformer
            .transform_command(CENTRAL_GREET, "greet.mdc", "central", "vscode")
            .unwrap();
        let item = transformer
            .parse(ItemKind::Command, CENTRAL_GREET, "greet.mdc", "central")
            .unwrap();
        assert!(item.dialect_config.contains("windsurf"));
        assert!(vscode.contains("description: Say hello"));
    }

    #[test]
    fn cursor_rule_to_vscode_instructions() {
        let registry = Registry::builtin();
        let out = Transformer::new(&registry)
            .transform_rule(
                "---\nalwaysApply: true\n---\nPrefer small functions.",
                "style.mdc",
                "cursor",
                "vscode",
            )
            .unwrap();
        let envelope = crate::frontmatter::parse_envelope(&out).unwrap();
        let header = envelope.header.unwrap();
        assert_eq!(
            header.get("applyTo").and_then(serde_yaml::Value::as_str),
            Some("**")
        );
        assert_eq!(envelope.body, "Prefer small functions.");
    }

    #[test]
    fn unknown_dialect_is_configuration_error() {
        let registry = Registry::builtin();
        let err = Transformer::new(&registry)
            .transform_command("x", "x.md", "cursor", "atom")
            .unwrap_err();
        assert!(matches!(
            classify(&err),
            Some(SyncError::UnknownDialect { .. })
        ));
    }

    #[test]
    fn unsupported_kind_fails_instead_of_writing_nothing() {
        let mut registry = Registry::builtin();
        registry.register(Box::new(commands_only()));

        let err = Transformer::new(&registry)
            .transform_rule("Rule body", "r.mdc", "cursor", "notes")
            .unwrap_err();
        match classify(&err) {
            Some(SyncError::Unsupported { dialect, kind }) => {
                assert_eq!(dialect, "notes");
                assert_eq!(*kind, ItemKind::Rule);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn supported_kind_reaches_custom_adapter() {
        let mut registry = Registry::builtin();
        registry.register(Box::new(commands_only()));

        let out = Transformer::new(&registry)
            .transform_command("---\ndescription: d\n---\nHello", "h.mdc", "central", "notes")
            .unwrap();
        assert_eq!(out, "NOTE Hello");
    }
}
