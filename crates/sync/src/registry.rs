//! Lookup table from dialect name to adapter.

use crate::adapters::{
    CentralAdapter, CursorAdapter, DialectAdapter, VscodeAdapter, WindsurfAdapter,
    CANONICAL_DIALECT,
};
use crate::error::SyncError;
use crate::frontmatter::DEFAULT_DESCRIPTION_LIMIT;
use crate::Result;
use std::collections::BTreeMap;

/// Every adapter available to this process, keyed by name.
///
/// Built once at startup and only read afterwards.
///
/// ```
/// use conflows_sync::Registry;
///
/// let registry = Registry::builtin();
/// assert!(registry.get("cursor").is_ok());
/// assert!(registry.get("emacs").is_err());
/// assert_eq!(registry.target_names(), vec!["cursor", "vscode", "windsurf"]);
/// ```
#[derive(Default)]
pub struct Registry {
    adapters: BTreeMap<String, Box<dyn DialectAdapter>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in dialects with the default description limit.
    pub fn builtin() -> Self {
        Self::with_description_limit(DEFAULT_DESCRIPTION_LIMIT)
    }

    /// The built-in dialects, deriving descriptions with the given limit.
    pub fn with_description_limit(limit: usize) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CentralAdapter::new()));
        registry.register(Box::new(
            CursorAdapter::new().with_description_limit(limit),
        ));
        registry.register(Box::new(WindsurfAdapter::new()));
        registry.register(Box::new(VscodeAdapter::new()));
        registry
    }

    /// Adds an adapter, returning any adapter it replaced.
    pub fn register(
        &mut self,
        adapter: Box<dyn DialectAdapter>,
    ) -> Option<Box<dyn DialectAdapter>> {
        self.adapters.insert(adapter.name().to_string(), adapter)
    }

    /// Looks up an adapter by name.
    pub fn get(&self, name: &str) -> Result<&dyn DialectAdapter> {
        self.adapters
            .get(name)
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| {
                SyncError::UnknownDialect {
                    name: name.to_string(),
                    available: self.names().into_iter().map(String::from).collect(),
                }
                .into()
            })
    }

    /// Fails on the first name that is not a distribution target.
    ///
    /// The canonical dialect is registered but never a target.
    pub fn require_targets<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        for name in names {
            let name = name.as_ref();
            if name == CANONICAL_DIALECT || !self.adapters.contains_key(name) {
                return Err(SyncError::UnknownDialect {
                    name: name.to_string(),
                    available: self.target_names().into_iter().map(String::from).collect(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.adapters.keys().map(String::as_str).collect()
    }

    /// Registered names other than the canonical store's own dialect.
    pub fn target_names(&self) -> Vec<&str> {
        self.names()
            .into_iter()
            .filter(|name| *name != CANONICAL_DIALECT)
            .collect()
    }
}
