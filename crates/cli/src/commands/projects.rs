use crate::cli::SelectionArgs;
use crate::commands::{non_empty, project_root};
use anyhow::Result;
use conflows_state::{ProjectConfig, ProjectStore};
use std::path::{Path, PathBuf};

pub(crate) fn handle_projects_list_command(central: &Path) -> Result<()> {
    let mapping = ProjectStore::new(central).load()?;
    if mapping.projects.is_empty() {
        println!("No projects have saved settings.");
        return Ok(());
    }
    for (key, config) in &mapping.projects {
        println!("{}", key);
        print_config(config, "  ");
    }
    Ok(())
}

pub(crate) fn handle_projects_show_command(central: &Path, project: Option<PathBuf>) -> Result<()> {
    let project = project_root(project)?;
    match ProjectStore::new(central).get(&project)? {
        Some(config) => {
            println!("{}", project.display());
            print_config(&config, "  ");
        }
        None => println!("No saved settings for {}", project.display()),
    }
    Ok(())
}

pub(crate) fn handle_projects_set_command(
    central: &Path,
    project: Option<PathBuf>,
    name: Option<String>,
    selection: SelectionArgs,
) -> Result<()> {
    let project = project_root(project)?;
    let update = ProjectConfig {
        name,
        tags: selection.tags,
        dialects: non_empty(selection.ides),
        include: non_empty(selection.include),
        exclude: non_empty(selection.exclude),
        last_sync: None,
    };
    let saved = ProjectStore::new(central).upsert(&project, update)?;
    println!("Saved settings for {}", project.display());
    print_config(&saved, "  ");
    Ok(())
}

pub(crate) fn handle_projects_remove_command(central: &Path, project: Option<PathBuf>) -> Result<()> {
    let project = project_root(project)?;
    if ProjectStore::new(central).remove(&project)? {
        println!("Removed settings for {}", project.display());
    } else {
        println!("No saved settings for {}", project.display());
    }
    Ok(())
}

fn print_config(config: &ProjectConfig, indent: &str) {
    if let Some(name) = &config.name {
        println!("{}name:      {}", indent, name);
    }
    let show = |label: &str, values: Option<&Vec<String>>| {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            println!("{}{:<10} {}", indent, format!("{}:", label), values.join(", "));
        }
    };
    show("dialects", config.dialects.as_ref());
    show("tags", Some(&config.tags));
    show("include", config.include.as_ref());
    show("exclude", config.exclude.as_ref());
    if let Some(when) = &config.last_sync {
        println!("{}last sync: {}", indent, when);
    }
}
