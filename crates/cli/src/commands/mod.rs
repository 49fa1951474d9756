//! CLI command handlers for the conflows application.

mod bisync;
mod convert;
mod detect;
mod init;
mod list;
mod projects;
mod sync;
mod tags;

use std::path::PathBuf;

pub(crate) use bisync::{format_plan, handle_bisync_command};
pub(crate) use convert::handle_convert_command;
pub(crate) use detect::handle_detect_command;
pub(crate) use init::handle_init_command;
pub(crate) use list::handle_list_command;
pub(crate) use projects::{
    handle_projects_list_command, handle_projects_remove_command, handle_projects_set_command,
    handle_projects_show_command,
};
pub(crate) use sync::handle_sync_command;
pub(crate) use tags::{handle_tags_list_command, handle_tags_show_command};

/// Resolves `--project`, falling back to the working directory.
pub(crate) fn project_root(project: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match project {
        Some(path) => Ok(path),
        None => Ok(std::env::current_dir()?),
    }
}

/// Empty repeatable flags mean "not given".
pub(crate) fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
