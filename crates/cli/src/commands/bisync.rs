use crate::commands::project_root;
use crate::prompt::InquirePrompter;
use anyhow::Result;
use conflows_sync::{
    BidirectionalSyncer, BisyncParams, BisyncReport, CanonicalStore, Decision, Registry, SyncPlan,
};
use std::fmt::Write as _;
use std::io::IsTerminal;
use std::path::PathBuf;

pub(crate) fn handle_bisync_command(
    store: &CanonicalStore,
    left: String,
    right: String,
    project: Option<PathBuf>,
    one_way: bool,
    force: bool,
    dry_run: bool,
) -> Result<()> {
    let project = project_root(project)?;
    let registry = Registry::with_description_limit(store.config()?.description_limit());

    // Without a terminal there is nobody to ask, so every conflict is skipped.
    let force = if !force && !dry_run && !std::io::stdin().is_terminal() {
        eprintln!("Not a terminal: conflicts will be skipped (as with --force)");
        true
    } else {
        force
    };

    let syncer = BidirectionalSyncer::new(&registry, &project, &left, &right);
    let syncer = if one_way { syncer.one_way() } else { syncer };
    let mut prompter = InquirePrompter;
    let report = syncer.sync(&BisyncParams { force, dry_run }, &mut prompter)?;

    if force || dry_run {
        print!("{}", format_plan(&report.plan));
    }
    print_report(&report);
    Ok(())
}

/// Renders a plan the way it is shown before the confirm prompt.
pub(crate) fn format_plan(plan: &SyncPlan) -> String {
    let mut out = String::new();
    let arrow = if plan.one_way { "->" } else { "<->" };
    let _ = writeln!(out, "Plan for {} {} {}", plan.left, arrow, plan.right);
    for section in &plan.sections {
        let _ = writeln!(out, "  {}:", section.kind.plural());
        if !section.identical.is_empty() {
            let _ = writeln!(out, "    identical: {}", section.identical.join(", "));
        }
        for file in &section.to_right {
            let _ = writeln!(out, "    {} -> {}: {}", plan.left, plan.right, file.name);
        }
        for file in &section.to_left {
            let _ = writeln!(out, "    {} -> {}: {}", plan.right, plan.left, file.name);
        }
        for (conflict, decision) in &section.conflicts {
            let action = match decision {
                Decision::KeepRight if plan.one_way => format!("leave {}", plan.right),
                Decision::KeepLeft => format!("keep {}", plan.left),
                Decision::KeepRight => format!("keep {}", plan.right),
                Decision::Skip => "skip".to_string(),
            };
            let _ = writeln!(out, "    conflict: {} ({})", conflict.name, action);
        }
    }
    for kind in &plan.unsupported {
        let _ = writeln!(out, "  {}: not supported by both dialects", kind.plural());
    }
    let _ = writeln!(
        out,
        "  {} change(s), {} conflict(s)",
        plan.changes(),
        plan.conflict_count()
    );
    out
}

fn print_report(report: &BisyncReport) {
    if report.declined {
        println!("Cancelled; nothing written.");
        return;
    }
    let plan = &report.plan;
    println!(
        "{} -> {}: {}",
        plan.left,
        plan.right,
        report.left_to_right.format_line()
    );
    if !plan.one_way {
        println!(
            "{} -> {}: {}",
            plan.right,
            plan.left,
            report.right_to_left.format_line()
        );
    }
    for side in [&report.left_to_right, &report.right_to_left] {
        for reason in side.skipped.iter().filter(|r| !r.is_quiet()) {
            println!("  skipped: {}", reason.description());
        }
        for warning in &side.warnings {
            eprintln!("  warning: {}", warning);
        }
    }
    if report.dry_run {
        println!("Dry run: {} file(s) would change.", plan.changes());
    } else {
        println!("Done: {} file(s) written.", report.total_written());
    }
}
