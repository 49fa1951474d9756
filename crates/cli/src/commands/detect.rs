use crate::commands::project_root;
use anyhow::Result;
use conflows_sync::{detect, ItemKind, Registry};
use std::path::PathBuf;

pub(crate) fn handle_detect_command(project: Option<PathBuf>) -> Result<()> {
    let project = project_root(project)?;
    let registry = Registry::builtin();
    let found = detect(&project, &registry)?;

    println!("Dialects in {}:", project.display());
    let mut any = false;
    for inventory in &found {
        if inventory.is_empty() {
            continue;
        }
        any = true;
        let counts: Vec<String> = ItemKind::ALL
            .iter()
            .map(|&kind| format!("{} {}", inventory.items(kind).len(), kind.plural()))
            .collect();
        println!("  {}: {}", inventory.dialect, counts.join(", "));
    }
    if !any {
        println!("  (none)");
    }
    Ok(())
}
