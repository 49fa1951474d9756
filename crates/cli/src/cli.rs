use clap::{Args, Parser, Subcommand, ValueEnum};
use conflows_sync::ItemKind;
use std::path::PathBuf;

/// Item kind accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum KindArg {
    /// Commands, prompts and workflows.
    #[default]
    Command,
    /// Rules and instructions.
    Rule,
}

impl From<KindArg> for ItemKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Command => ItemKind::Command,
            KindArg::Rule => ItemKind::Rule,
        }
    }
}

/// Command-line interface for the `conflows` application.
#[derive(Debug, Parser)]
#[command(
    name = "conflows",
    version,
    about = "Keep IDE command and rule files in sync from one canonical store"
)]
pub struct Cli {
    /// Canonical store root (default: ~/.conflows).
    #[arg(long, global = true, value_name = "DIR", env = "CONFLOWS_HOME")]
    pub central: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Selection filters shared by `sync` and `projects set`.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Target dialect (repeatable or comma-separated).
    #[arg(long = "ide", value_name = "DIALECT", value_delimiter = ',')]
    pub ides: Vec<String>,
    /// Tag to select items by (repeatable or comma-separated).
    #[arg(long = "tag", value_name = "TAG", value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Extra item to include.
    #[arg(long, value_name = "ITEM", value_delimiter = ',')]
    pub include: Vec<String>,
    /// Item to leave out.
    #[arg(long, value_name = "ITEM", value_delimiter = ',')]
    pub exclude: Vec<String>,
}

/// Available `conflows` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Creates the canonical store layout.
    Init,
    /// Lists canonical commands and rules.
    List {
        /// Only items belonging to this tag.
        #[arg(long)]
        tag: Option<String>,
    },
    /// Distributes canonical items into a project.
    Sync {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Copy one project dialect into another instead of distributing.
        #[arg(
            long,
            value_name = "DIALECT",
            requires = "to",
            conflicts_with_all = ["ides", "tags", "include", "exclude"]
        )]
        from: Option<String>,
        /// Dialect that receives the `--from` files.
        #[arg(long, value_name = "DIALECT", requires = "from")]
        to: Option<String>,
        /// Project directory (default: current directory).
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
        /// Show the plan without writing.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// Do not ask before writing.
        #[arg(long, short, default_value_t = false)]
        force: bool,
    },
    /// Reconciles two dialects inside one project.
    Bisync {
        /// Left-hand dialect.
        left: String,
        /// Right-hand dialect.
        right: String,
        /// Project directory (default: current directory).
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
        /// Skip every conflict and the confirmation prompt.
        #[arg(long, short, default_value_t = false)]
        force: bool,
        /// Show the plan without prompting or writing.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Shows which dialects have files in a project.
    Detect {
        /// Project directory (default: current directory).
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
    },
    /// Manages saved per-project settings.
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },
    /// Shows tag definitions.
    Tags {
        #[command(subcommand)]
        action: TagsAction,
    },
    /// Converts one file between dialects and prints the result.
    Convert {
        /// Source dialect.
        #[arg(long)]
        from: String,
        /// Target dialect.
        #[arg(long)]
        to: String,
        /// Item kind of the file.
        #[arg(long, value_enum, default_value_t = KindArg::Command)]
        kind: KindArg,
        /// File to convert.
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectsAction {
    /// Lists every project with saved settings.
    List,
    /// Shows saved settings for a project.
    Show {
        /// Project directory (default: current directory).
        project: Option<PathBuf>,
    },
    /// Saves settings for a project, merging over what is there.
    Set {
        /// Project directory (default: current directory).
        project: Option<PathBuf>,
        /// Display name.
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Forgets a project's saved settings.
    Remove {
        /// Project directory (default: current directory).
        project: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum TagsAction {
    /// Lists every tag.
    List,
    /// Shows the items of one tag.
    Show {
        tag: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_accepts_repeated_and_comma_separated_filters() {
        let cli = Cli::try_parse_from([
            "conflows", "sync", "--ide", "cursor,windsurf", "--ide", "vscode", "--tag", "web",
            "--exclude", "legacy", "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Sync {
                selection, dry_run, force, ..
            } => {
                assert_eq!(selection.ides, vec!["cursor", "windsurf", "vscode"]);
                assert_eq!(selection.tags, vec!["web"]);
                assert_eq!(selection.exclude, vec!["legacy"]);
                assert!(selection.include.is_empty());
                assert!(dry_run);
                assert!(!force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn sync_from_needs_to_and_excludes_selection() {
        let cli = Cli::try_parse_from([
            "conflows", "sync", "--from", "cursor", "--to", "windsurf", "--force",
        ])
        .unwrap();
        match cli.command {
            Commands::Sync { from, to, force, .. } => {
                assert_eq!(from.as_deref(), Some("cursor"));
                assert_eq!(to.as_deref(), Some("windsurf"));
                assert!(force);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["conflows", "sync", "--from", "cursor"]).is_err());
        assert!(Cli::try_parse_from([
            "conflows", "sync", "--from", "cursor", "--to", "windsurf", "--ide", "vscode",
        ])
        .is_err());
    }

    #[test]
    fn central_flag_is_global() {
        let cli = Cli::try_parse_from(["conflows", "list", "--central", "/tmp/store"]).unwrap();
        assert_eq!(cli.central, Some(PathBuf::from("/tmp/store")));
    }

    #[test]
    fn convert_defaults_to_commands() {
        let cli = Cli::try_parse_from([
            "conflows", "convert", "--from", "cursor", "--to", "windsurf", "a.md",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert { kind, .. } => assert_eq!(kind, KindArg::Command),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
