//! Classification of same-named items across two dialect trees.
//!
//! Only the envelope-stripped body is compared. Two files whose headers
//! differ but whose bodies match are identical for sync purposes.

use crate::common::{ItemFile, ItemKind};
use crate::frontmatter::extract_body;
use crate::Result;
use similar::TextDiff;
use std::collections::BTreeMap;

/// What to do with one conflicting item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Copy the left side over the right.
    KeepLeft,
    /// Copy the right side over the left.
    KeepRight,
    /// Leave both files untouched.
    Skip,
}

/// One item present on both sides with differing bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ItemKind,
    pub name: String,
    pub left: ItemFile,
    pub right: ItemFile,
}

impl Conflict {
    /// Unified diff of the two bodies, left as old and right as new.
    pub fn unified_diff(&self, left_label: &str, right_label: &str) -> String {
        let left = format!("{}\n", extract_body(&self.left.content));
        let right = format!("{}\n", extract_body(&self.right.content));
        TextDiff::from_lines(&left, &right)
            .unified_diff()
            .context_radius(3)
            .header(left_label, right_label)
            .to_string()
    }
}

/// Items of one kind, partitioned by where they exist and whether they match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Names whose bodies match on both sides.
    pub identical: Vec<String>,
    pub only_left: Vec<ItemFile>,
    pub only_right: Vec<ItemFile>,
    pub conflicts: Vec<Conflict>,
}

impl Classification {
    /// True when applying this classification would write nothing.
    pub fn is_settled(&self) -> bool {
        self.only_left.is_empty() && self.only_right.is_empty() && self.conflicts.is_empty()
    }
}

/// Partitions two collections of the same kind by item name.
///
/// Output lists are sorted by name.
pub fn classify(kind: ItemKind, left: Vec<ItemFile>, right: Vec<ItemFile>) -> Classification {
    let mut right: BTreeMap<String, ItemFile> =
        right.into_iter().map(|f| (f.name.clone(), f)).collect();
    let mut left_sorted = left;
    left_sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = Classification::default();
    for l in left_sorted {
        match right.remove(&l.name) {
            None => out.only_left.push(l),
            Some(r) => {
                if extract_body(&l.content) == extract_body(&r.content) {
                    out.identical.push(l.name);
                } else {
                    out.conflicts.push(Conflict {
                        kind,
                        name: l.name.clone(),
                        left: l,
                        right: r,
                    });
                }
            }
        }
    }
    out.only_right = right.into_values().collect();
    out
}

/// Pairs each conflict with a decision.
///
/// With `force`, every conflict is skipped and `decide` is never called.
pub fn resolve_conflicts<F>(
    conflicts: Vec<Conflict>,
    force: bool,
    mut decide: F,
) -> Result<Vec<(Conflict, Decision)>>
where
    F: FnMut(&Conflict) -> Result<Decision>,
{
    let mut out = Vec::with_capacity(conflicts.len());
    for conflict in conflicts {
        let decision = if force {
            tracing::debug!(item = %conflict.name, "Skipping conflict under --force");
            Decision::Skip
        } else {
            decide(&conflict)?
        };
        out.push((conflict, decision));
    }
    Ok(out)
}
