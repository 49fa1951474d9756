//! Sync between two dialect trees in one project.
//!
//! Runs `scan → classify → resolve → confirm → apply`, strictly in that
//! order. Nothing is written before the confirm gate passes. A syncer made
//! with [`BidirectionalSyncer::one_way`] only ever writes into the right side.

use crate::adapters::utils::{sanitize_name, write_or_plan, WriteOutcome};
use crate::adapters::DialectAdapter;
use crate::common::{ItemFile, ItemKind};
use crate::conflict::{classify, resolve_conflicts, Conflict, Decision};
use crate::registry::Registry;
use crate::report::{SkipReason, WriteReport};
use crate::scanner::scan_project;
use crate::transformer::Transformer;
use crate::Result;
use anyhow::bail;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// Parameters for a bidirectional sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BisyncParams {
    /// Skip every conflict and the confirm gate.
    pub force: bool,
    /// Classify and report without prompting or writing.
    pub dry_run: bool,
}

/// Source of conflict decisions and the final go-ahead.
#[cfg_attr(test, automock)]
pub trait Prompter {
    /// Picks a side for one conflict. `left`/`right` are the dialect names.
    fn decide(&mut self, conflict: &Conflict, left: &str, right: &str) -> Result<Decision>;

    /// Asks once whether to apply the plan.
    fn confirm(&mut self, plan: &SyncPlan) -> Result<bool>;
}

/// A [`Prompter`] that answers from a fixed script.
///
/// ```
/// use conflows_sync::{Decision, ScriptedPrompter};
///
/// let prompter = ScriptedPrompter::new(Decision::Skip)
///     .with_decision("deploy", Decision::KeepLeft)
///     .confirming(true);
/// assert!(prompter.asked.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedPrompter {
    decisions: BTreeMap<String, Decision>,
    default: Decision,
    confirm: bool,
    /// Names of conflicts that were asked about, in order.
    pub asked: Vec<String>,
    /// Number of times the confirm gate was reached.
    pub confirmations: usize,
}

impl ScriptedPrompter {
    pub fn new(default: Decision) -> Self {
        Self {
            decisions: BTreeMap::new(),
            default,
            confirm: true,
            asked: Vec::new(),
            confirmations: 0,
        }
    }

    pub fn with_decision(mut self, name: impl Into<String>, decision: Decision) -> Self {
        self.decisions.insert(name.into(), decision);
        self
    }

    /// Answer for the confirm gate (default yes).
    pub fn confirming(mut self, answer: bool) -> Self {
        self.confirm = answer;
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn decide(&mut self, conflict: &Conflict, _left: &str, _right: &str) -> Result<Decision> {
        self.asked.push(conflict.name.clone());
        Ok(self
            .decisions
            .get(&conflict.name)
            .copied()
            .unwrap_or(self.default))
    }

    fn confirm(&mut self, _plan: &SyncPlan) -> Result<bool> {
        self.confirmations += 1;
        Ok(self.confirm)
    }
}

/// Planned work for one item kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindPlan {
    pub kind: ItemKind,
    /// Same body on both sides.
    pub identical: Vec<String>,
    /// Only on the right; will be copied left.
    pub to_left: Vec<ItemFile>,
    /// Only on the left; will be copied right.
    pub to_right: Vec<ItemFile>,
    /// Conflicts with their decisions.
    pub conflicts: Vec<(Conflict, Decision)>,
}

impl KindPlan {
    fn changes(&self, one_way: bool) -> usize {
        self.to_left.len()
            + self.to_right.len()
            + self
                .conflicts
                .iter()
                .filter(|(_, d)| match d {
                    Decision::KeepLeft => true,
                    Decision::KeepRight => !one_way,
                    Decision::Skip => false,
                })
                .count()
    }
}

/// Everything a bidirectional sync would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub left: String,
    pub right: String,
    pub sections: Vec<KindPlan>,
    /// Kinds one side cannot hold.
    pub unsupported: Vec<ItemKind>,
    /// Only left → right is applied; keeping the right side writes nothing.
    pub one_way: bool,
}

impl SyncPlan {
    /// Number of files the plan would write.
    pub fn changes(&self) -> usize {
        self.sections.iter().map(|s| s.changes(self.one_way)).sum()
    }

    pub fn has_changes(&self) -> bool {
        self.changes() > 0
    }

    pub fn conflict_count(&self) -> usize {
        self.sections.iter().map(|s| s.conflicts.len()).sum()
    }
}

/// Outcome of a bidirectional sync.
#[derive(Debug, Clone, PartialEq)]
pub struct BisyncReport {
    pub plan: SyncPlan,
    /// Writes into the right-hand tree.
    pub left_to_right: WriteReport,
    /// Writes into the left-hand tree.
    pub right_to_left: WriteReport,
    /// The user said no at the confirm gate.
    pub declined: bool,
    pub dry_run: bool,
}

impl BisyncReport {
    pub fn total_written(&self) -> usize {
        self.left_to_right.written + self.right_to_left.written
    }
}

/// Reconciles two dialect trees in one project directory.
pub struct BidirectionalSyncer<'a> {
    registry: &'a Registry,
    project_root: PathBuf,
    left: String,
    right: String,
    one_way: bool,
}

impl<'a> BidirectionalSyncer<'a> {
    pub fn new(
        registry: &'a Registry,
        project_root: impl Into<PathBuf>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            project_root: project_root.into(),
            left: left.into(),
            right: right.into(),
            one_way: false,
        }
    }

    /// Copies from left to right only.
    ///
    /// Items only on the right are left alone, and a conflict resolved as
    /// [`Decision::KeepRight`] keeps the right file without writing.
    pub fn one_way(mut self) -> Self {
        self.one_way = true;
        self
    }

    /// Scans and classifies both trees, asking `prompter` about conflicts
    /// unless `force` or `dry_run` is set.
    pub fn plan(&self, params: &BisyncParams, prompter: &mut dyn Prompter) -> Result<SyncPlan> {
        let left = self.registry.get(&self.left)?;
        let right = self.registry.get(&self.right)?;
        if self.left == self.right {
            bail!("Cannot sync dialect '{}' with itself", self.left);
        }

        let mut plan = SyncPlan {
            left: self.left.clone(),
            right: self.right.clone(),
            sections: Vec::new(),
            unsupported: Vec::new(),
            one_way: self.one_way,
        };

        for kind in ItemKind::ALL {
            if !left.supports(kind) || !right.supports(kind) {
                tracing::debug!(kind = %kind, "Not supported on both sides, skipping");
                plan.unsupported.push(kind);
                continue;
            }

            // scan
            let left_files = scan_project(&self.project_root, left, kind)?;
            let right_files = scan_project(&self.project_root, right, kind)?;

            // classify
            let classification = classify(kind, left_files, right_files);

            // resolve
            let skip_all = params.force || params.dry_run;
            let conflicts = resolve_conflicts(classification.conflicts, skip_all, |conflict| {
                prompter.decide(conflict, &self.left, &self.right)
            })?;

            let to_left = if self.one_way {
                tracing::debug!(kind = %kind, ignored = classification.only_right.len(), "One-way sync leaves right-only items alone");
                Vec::new()
            } else {
                classification.only_right
            };

            plan.sections.push(KindPlan {
                kind,
                identical: classification.identical,
                to_left,
                to_right: classification.only_left,
                conflicts,
            });
        }
        Ok(plan)
    }

    /// Runs the whole state machine.
    pub fn sync(&self, params: &BisyncParams, prompter: &mut dyn Prompter) -> Result<BisyncReport> {
        let plan = self.plan(params, prompter)?;
        let mut report = BisyncReport {
            left_to_right: WriteReport::default(),
            right_to_left: WriteReport::default(),
            declined: false,
            dry_run: params.dry_run,
            plan,
        };

        // confirm
        if !params.force && !params.dry_run && report.plan.has_changes() {
            if !prompter.confirm(&report.plan)? {
                tracing::info!("Sync declined; nothing written");
                report.declined = true;
                return Ok(report);
            }
        }

        // apply
        let left = self.registry.get(&self.left)?;
        let right = self.registry.get(&self.right)?;
        let transformer = Transformer::new(self.registry);
        let dry_run = params.dry_run;

        for section in &report.plan.sections {
            for file in &section.to_left {
                self.propagate(&transformer, file, right, left, None, dry_run, &mut report.right_to_left);
            }
        }
        for section in &report.plan.sections {
            for file in &section.to_right {
                self.propagate(&transformer, file, left, right, None, dry_run, &mut report.left_to_right);
            }
        }
        for section in &report.plan.sections {
            for (conflict, decision) in &section.conflicts {
                match decision {
                    Decision::KeepLeft => self.propagate(
                        &transformer,
                        &conflict.left,
                        left,
                        right,
                        Some(&conflict.right.path),
                        dry_run,
                        &mut report.left_to_right,
                    ),
                    Decision::KeepRight if self.one_way => {
                        tracing::info!(item = %conflict.name, "Kept target version");
                        report.left_to_right.skip(SkipReason::ConflictSkipped {
                            item: conflict.name.clone(),
                        });
                    }
                    Decision::KeepRight => self.propagate(
                        &transformer,
                        &conflict.right,
                        right,
                        left,
                        Some(&conflict.left.path),
                        dry_run,
                        &mut report.right_to_left,
                    ),
                    Decision::Skip => {
                        tracing::info!(item = %conflict.name, "Conflict left unresolved");
                        report.left_to_right.skip(SkipReason::ConflictSkipped {
                            item: conflict.name.clone(),
                        });
                    }
                }
            }
        }

        Ok(report)
    }

    /// Converts one file into the other dialect and writes it.
    ///
    /// `existing` overrides the target path when the item is already there.
    #[allow(clippy::too_many_arguments)]
    fn propagate(
        &self,
        transformer: &Transformer<'_>,
        file: &ItemFile,
        from: &dyn DialectAdapter,
        to: &dyn DialectAdapter,
        existing: Option<&Path>,
        dry_run: bool,
        report: &mut WriteReport,
    ) {
        let content = match transformer.transform(
            file.kind,
            &file.content,
            &file.file_name,
            from.name(),
            to.name(),
        ) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(item = %file.name, error = %e, "Failed to convert");
                report.skip(SkipReason::ParseError {
                    item: file.name.clone(),
                    error: e.to_string(),
                });
                return;
            }
        };

        let path = match (existing, to.layout(file.kind)) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(layout)) => self
                .project_root
                .join(layout.dir)
                .join(layout.file_name(&sanitize_name(&file.name))),
            (None, None) => {
                report.skip(SkipReason::UnsupportedKind {
                    item: file.name.clone(),
                    dialect: to.name().to_string(),
                    kind: file.kind,
                });
                return;
            }
        };

        match write_or_plan(&path, &content, dry_run) {
            Ok(WriteOutcome::Written) => {
                tracing::debug!(item = %file.name, from = from.name(), to = to.name(), "Propagated");
                report.record_write(path);
            }
            Ok(WriteOutcome::Unchanged) => report.skip(SkipReason::Unchanged {
                item: file.name.clone(),
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Write failed");
                report.warn(format!("{}: {:#}", path.display(), e));
            }
        }
    }
}
