//! Command and rule sync engine for IDE configuration dialects.
//!
//! Items (commands and rules) live once in a canonical store and are
//! distributed into each IDE's own layout: Cursor, Windsurf and VS Code.
//! Every dialect converts through one canonical form, so adding a dialect
//! means writing one [`DialectAdapter`].
//!
//! # Examples
//!
//! ```
//! use conflows_sync::{Registry, Transformer};
//!
//! let registry = Registry::builtin();
//! let transformer = Transformer::new(&registry);
//!
//! let central = "---\ndescription: Say hello\n---\n# Greet\n\nSay hi.\n";
//!
//! let windsurf = transformer
//!     .transform_command(central, "greet.mdc", "central", "windsurf")
//!     .unwrap();
//! assert!(windsurf.starts_with("---\ndescription: Say hello\nauto_execution_mode: 1\n---\n"));
//!
//! let cursor = transformer
//!     .transform_command(central, "greet.mdc", "central", "cursor")
//!     .unwrap();
//! assert_eq!(cursor, "# Greet\n\nSay hi.");
//! ```

#![deny(unsafe_code)]

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub mod adapters;
pub mod common;
pub mod config;
pub mod conflict;
pub mod distributor;
pub mod error;
pub mod frontmatter;
pub mod registry;
pub mod report;
pub mod scanner;
pub mod store;
pub mod syncer;
pub mod transformer;

pub use adapters::{
    CentralAdapter, CursorAdapter, DialectAdapter, KindLayout, VscodeAdapter, WindsurfAdapter,
    CANONICAL_DIALECT,
};
pub use common::{DialectConfig, Item, ItemFile, ItemKind};
pub use config::{
    resolve_policy, CentralConfig, ConfigResolver, ResolvedPolicy, SyncOptions, TagDefinition,
    DEFAULT_DIALECTS,
};
pub use conflict::{Classification, Conflict, Decision};
pub use distributor::{DialectReport, DistributeParams, DistributionReport, Distributor};
pub use error::SyncError;
pub use frontmatter::DEFAULT_DESCRIPTION_LIMIT;
pub use registry::Registry;
pub use report::{SkipReason, WriteReport};
pub use scanner::{detect, DialectInventory};
pub use store::{CanonicalStore, InitOutcome};
pub use syncer::{
    BidirectionalSyncer, BisyncParams, BisyncReport, KindPlan, Prompter, ScriptedPrompter,
    SyncPlan,
};
pub use transformer::Transformer;
