use crate::cli::SelectionArgs;
use crate::commands::{non_empty, project_root};
use anyhow::{Context, Result};
use conflows_sync::{
    CanonicalStore, ConfigResolver, DistributeParams, DistributionReport, Distributor, Registry,
    ResolvedPolicy, SyncOptions,
};
use inquire::Confirm;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

pub(crate) fn handle_sync_command(
    store: &CanonicalStore,
    selection: SelectionArgs,
    project: Option<PathBuf>,
    dry_run: bool,
    force: bool,
) -> Result<()> {
    store.ensure_initialized()?;
    let project = project_root(project)?;
    let config = store.config()?;
    let registry = Registry::with_description_limit(config.description_limit());
    let resolver = ConfigResolver::new(store);

    let options = SyncOptions {
        dialects: non_empty(selection.ides),
        tags: non_empty(selection.tags),
        include: non_empty(selection.include),
        exclude: non_empty(selection.exclude),
    };
    let policy = resolver.resolve(&project, &options)?;
    registry.require_targets(&policy.dialects)?;

    for tag in &policy.unknown_tags {
        eprintln!("Warning: unknown tag '{}' selects nothing", tag);
    }

    print_plan(&project, &policy, dry_run);
    if policy.items.is_empty() {
        println!("Nothing to sync.");
        return Ok(());
    }

    let interactive = std::io::stdin().is_terminal();
    if !force && !dry_run && interactive {
        let proceed = Confirm::new(&format!(
            "Write {} item(s) into {} dialect(s)?",
            policy.items.len(),
            policy.dialects.len()
        ))
        .with_default(true)
        .prompt()
        .context("Failed to read confirmation")?;
        if !proceed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let report = Distributor::new(store, &registry).distribute(
        &project,
        &policy,
        &DistributeParams { dry_run },
    )?;
    print_report(&report);

    if !dry_run {
        resolver.remember(&project, &policy)?;
        tracing::debug!(project = %project.display(), "Saved project settings");
    }
    Ok(())
}

fn print_plan(project: &Path, policy: &ResolvedPolicy, dry_run: bool) {
    let mode = if dry_run { " (dry run)" } else { "" };
    println!("Syncing into {}{}", project.display(), mode);
    println!("  dialects: {}", policy.dialects.join(", "));
    if !policy.tags.is_empty() {
        println!("  tags:     {}", policy.tags.join(", "));
    }
    if !policy.exclude.is_empty() {
        println!("  excluded: {}", policy.exclude.join(", "));
    }
    println!("  items:    {}", policy.items.len());
    for name in &policy.items {
        println!("    - {}", name);
    }
    println!();
}

fn print_report(report: &DistributionReport) {
    let verb = if report.dry_run { "would write" } else { "wrote" };
    for dialect in &report.dialects {
        println!("{}: {}", dialect.dialect, dialect.report.format_line());
        for path in &dialect.report.paths {
            println!("  {} {}", verb, path.display());
        }
        for reason in dialect.report.skipped.iter().filter(|r| !r.is_quiet()) {
            println!("  skipped: {}", reason.description());
            if let Some(hint) = reason.guidance() {
                println!("    {}", hint);
            }
        }
        for warning in &dialect.report.warnings {
            eprintln!("  warning: {}", warning);
        }
    }
    for reason in &report.skipped {
        eprintln!("Warning: {}", reason.description());
        if let Some(hint) = reason.guidance() {
            eprintln!("  {}", hint);
        }
    }
    println!();
    if report.dry_run {
        println!("Dry run: {} file(s) would change.", report.total_written());
    } else {
        println!("Done: {} file(s) written.", report.total_written());
    }
}
