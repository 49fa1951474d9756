use crate::cli::{Cli, Commands, ProjectsAction, TagsAction};
use crate::commands::{
    handle_bisync_command, handle_convert_command, handle_detect_command, handle_init_command,
    handle_list_command, handle_projects_list_command, handle_projects_remove_command,
    handle_projects_set_command, handle_projects_show_command, handle_sync_command,
    handle_tags_list_command, handle_tags_show_command,
};
use anyhow::Result;
use clap::Parser;
use conflows_state::resolve_central_root;
use conflows_sync::CanonicalStore;

/// Main application entry point.
///
/// Logs go to stderr and are filtered by `RUST_LOG`.
pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let central = resolve_central_root(cli.central.as_deref())?;
    tracing::debug!(central = %central.display(), "Using canonical store");
    let store = CanonicalStore::with_root(&central);

    match cli.command {
        Commands::Init => handle_init_command(&store),
        Commands::List { tag } => handle_list_command(&store, tag),
        Commands::Sync {
            from: Some(from),
            to: Some(to),
            project,
            dry_run,
            force,
            ..
        } => handle_bisync_command(&store, from, to, project, true, force, dry_run),
        Commands::Sync {
            selection,
            project,
            dry_run,
            force,
            ..
        } => handle_sync_command(&store, selection, project, dry_run, force),
        Commands::Bisync {
            left,
            right,
            project,
            force,
            dry_run,
        } => handle_bisync_command(&store, left, right, project, false, force, dry_run),
        Commands::Detect { project } => handle_detect_command(project),
        Commands::Projects { action } => match action {
            ProjectsAction::List => handle_projects_list_command(&central),
            ProjectsAction::Show { project } => handle_projects_show_command(&central, project),
            ProjectsAction::Set {
                project,
                name,
                selection,
            } => handle_projects_set_command(&central, project, name, selection),
            ProjectsAction::Remove { project } => {
                handle_projects_remove_command(&central, project)
            }
        },
        Commands::Tags { action } => match action {
            TagsAction::List => handle_tags_list_command(&store),
            TagsAction::Show { tag } => handle_tags_show_command(&store, &tag),
        },
        Commands::Convert {
            from,
            to,
            kind,
            file,
        } => handle_convert_command(&store, &from, &to, kind, &file),
    }
}
