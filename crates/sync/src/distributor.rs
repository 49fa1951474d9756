//! One-directional distribution from the canonical store into a project.

use crate::adapters::utils::{sanitize_name, write_or_plan, WriteOutcome};
use crate::adapters::CANONICAL_DIALECT;
use crate::common::{ItemFile, ItemKind};
use crate::config::ResolvedPolicy;
use crate::registry::Registry;
use crate::report::{SkipReason, WriteReport};
use crate::store::CanonicalStore;
use crate::transformer::Transformer;
use crate::Result;
use std::path::{Path, PathBuf};

/// Parameters for a distribution run.
///
/// ```
/// use conflows_sync::DistributeParams;
///
/// let params = DistributeParams { dry_run: true };
/// assert!(params.dry_run);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistributeParams {
    /// Plan and report without touching the filesystem.
    pub dry_run: bool,
}

/// Outcome for one target dialect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialectReport {
    pub dialect: String,
    pub report: WriteReport,
}

/// Outcome of a whole distribution run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistributionReport {
    pub dialects: Vec<DialectReport>,
    /// Selected items that never reached a dialect: absent from the store
    /// or unreadable.
    pub skipped: Vec<SkipReason>,
    pub dry_run: bool,
}

impl DistributionReport {
    pub fn total_written(&self) -> usize {
        self.dialects.iter().map(|d| d.report.written).sum()
    }

    /// Selected names with no command or rule in the store.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().filter_map(|reason| match reason {
            SkipReason::NotFound { item } => Some(item.as_str()),
            _ => None,
        })
    }

    /// Every path written, or that would be on a dry run.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.dialects.iter().flat_map(|d| d.report.paths.iter())
    }
}

/// Writes canonical items into each target dialect's layout.
pub struct Distributor<'a> {
    store: &'a CanonicalStore,
    registry: &'a Registry,
}

impl<'a> Distributor<'a> {
    pub fn new(store: &'a CanonicalStore, registry: &'a Registry) -> Self {
        Self { store, registry }
    }

    /// Distributes every item the policy selects.
    ///
    /// An uninitialized store or an unknown dialect fails before anything is
    /// written. Problems with single items are recorded and skipped.
    pub fn distribute(
        &self,
        project_root: &Path,
        policy: &ResolvedPolicy,
        params: &DistributeParams,
    ) -> Result<DistributionReport> {
        self.store.ensure_initialized()?;
        self.registry.require_targets(&policy.dialects)?;

        let mut out = DistributionReport {
            dry_run: params.dry_run,
            ..Default::default()
        };
        let sources = self.collect_sources(&policy.items, &mut out.skipped);

        for dialect in &policy.dialects {
            let report = self.distribute_to(project_root, dialect, &sources, params)?;
            tracing::info!(
                dialect = %dialect,
                written = report.written,
                skipped = report.skipped.len(),
                dry_run = params.dry_run,
                "Distributed items"
            );
            out.dialects.push(DialectReport {
                dialect: dialect.clone(),
                report,
            });
        }
        Ok(out)
    }

    fn collect_sources(&self, names: &[String], skipped: &mut Vec<SkipReason>) -> Vec<ItemFile> {
        let mut sources = Vec::new();
        for name in names {
            let mut found = false;
            for kind in ItemKind::ALL {
                match self.store.get(kind, name) {
                    Ok(Some(file)) => {
                        sources.push(file);
                        found = true;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(item = %name, kind = %kind, error = ?e, "Unreadable canonical item, skipping");
                        skipped.push(SkipReason::Unreadable {
                            item: name.clone(),
                            error: format!("{:#}", e),
                        });
                        found = true;
                    }
                }
            }
            if !found {
                tracing::warn!(item = %name, "Item not found in canonical store, skipping");
                skipped.push(SkipReason::NotFound { item: name.clone() });
            }
        }
        sources
    }

    fn distribute_to(
        &self,
        project_root: &Path,
        dialect: &str,
        sources: &[ItemFile],
        params: &DistributeParams,
    ) -> Result<WriteReport> {
        let adapter = self.registry.get(dialect)?;
        let transformer = Transformer::new(self.registry);
        let mut report = WriteReport::default();

        for source in sources {
            let Some(layout) = adapter.layout(source.kind) else {
                tracing::debug!(item = %source.name, dialect, kind = %source.kind, "Kind not supported");
                report.skip(SkipReason::UnsupportedKind {
                    item: source.name.clone(),
                    dialect: dialect.to_string(),
                    kind: source.kind,
                });
                continue;
            };

            let content = match transformer.transform(
                source.kind,
                &source.content,
                &source.file_name,
                CANONICAL_DIALECT,
                dialect,
            ) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(item = %source.name, dialect, error = %e, "Failed to convert");
                    report.skip(SkipReason::ParseError {
                        item: source.name.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let path = project_root
                .join(layout.dir)
                .join(layout.file_name(&sanitize_name(&source.name)));
            match write_or_plan(&path, &content, params.dry_run) {
                Ok(WriteOutcome::Written) => report.record_write(path),
                Ok(WriteOutcome::Unchanged) => {
                    tracing::debug!(path = %path.display(), "Unchanged");
                    report.skip(SkipReason::Unchanged {
                        item: source.name.clone(),
                    });
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Write failed");
                    report.warn(format!("{}: {:#}", path.display(), e));
                }
            }
        }
        Ok(report)
    }
}
