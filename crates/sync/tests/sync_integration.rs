//! End-to-end tests for distribution and bidirectional sync.
//!
//! Each test builds a temp canonical store and project directory, then
//! checks the files that land on disk.

use conflows_sync::{
    BidirectionalSyncer, BisyncParams, CanonicalStore, ConfigResolver, Decision,
    DistributeParams, Distributor, Registry, ScriptedPrompter, SyncOptions,
};
use conflows_test_utils::TestFixture;
use std::fs;

const GREET: &str = "---\ndescription: Say hello\ntags:\n- basics\n---\n# Greet\n\nSay hi.\n";

fn options(dialects: &[&str]) -> SyncOptions {
    SyncOptions {
        dialects: Some(dialects.iter().map(|d| d.to_string()).collect()),
        ..Default::default()
    }
}

#[test]
fn given_canonical_command_when_distributed_then_each_dialect_gets_its_envelope() {
    // GIVEN a canonical store with `greet`
    let fixture = TestFixture::new().unwrap();
    fixture.write_command("greet.mdc", GREET).unwrap();
    let store = CanonicalStore::with_root(&fixture.central);
    let registry = Registry::builtin();

    // WHEN it is distributed to cursor and windsurf
    let policy = ConfigResolver::new(&store)
        .resolve(&fixture.project, &options(&["cursor", "windsurf"]))
        .unwrap();
    let report = Distributor::new(&store, &registry)
        .distribute(&fixture.project, &policy, &DistributeParams::default())
        .unwrap();
    assert_eq!(report.total_written(), 2);

    // THEN cursor holds exactly the body, with no header block
    let cursor = fixture
        .read_project_file(".cursor/commands/greet.md")
        .unwrap();
    assert_eq!(cursor, "# Greet\n\nSay hi.");

    // AND windsurf's header carries the description before the same body
    let windsurf = fixture
        .read_project_file(".windsurf/workflows/greet.md")
        .unwrap();
    assert!(windsurf.starts_with("---\ndescription: Say hello\n"));
    assert!(windsurf.ends_with("---\n# Greet\n\nSay hi.\n"));
}

#[test]
fn given_same_policy_when_distributed_twice_then_output_is_byte_identical() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_command("greet.mdc", GREET).unwrap();
    fixture
        .write_rule(
            "style.mdc",
            "---\ndescription: House style\ncursor:\n  alwaysApply: true\n---\nUse tabs.",
        )
        .unwrap();
    let store = CanonicalStore::with_root(&fixture.central);
    let registry = Registry::builtin();
    let policy = ConfigResolver::new(&store)
        .resolve(&fixture.project, &options(&["cursor", "windsurf", "vscode"]))
        .unwrap();
    let distributor = Distributor::new(&store, &registry);

    let first = distributor
        .distribute(&fixture.project, &policy, &DistributeParams::default())
        .unwrap();
    let snapshot: Vec<(std::path::PathBuf, Vec<u8>)> = first
        .paths()
        .map(|p| (p.clone(), fs::read(p).unwrap()))
        .collect();
    assert_eq!(snapshot.len(), 6);

    let second = distributor
        .distribute(&fixture.project, &policy, &DistributeParams::default())
        .unwrap();
    assert_eq!(second.total_written(), 0);
    for (path, bytes) in snapshot {
        assert_eq!(fs::read(&path).unwrap(), bytes, "{} changed", path.display());
    }
}

#[test]
fn given_saved_project_dialects_when_cli_overrides_then_cli_wins() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_command("greet.mdc", GREET).unwrap();
    fixture.write_config(r#"{"defaultIDEs": ["vscode"]}"#).unwrap();
    let store = CanonicalStore::with_root(&fixture.central);
    let resolver = ConfigResolver::new(&store);

    // Global default applies first
    let policy = resolver
        .resolve(&fixture.project, &SyncOptions::default())
        .unwrap();
    assert_eq!(policy.dialects, vec!["vscode"]);

    // Saved project settings beat the global default
    let saved = resolver
        .resolve(&fixture.project, &options(&["windsurf"]))
        .unwrap();
    resolver.remember(&fixture.project, &saved).unwrap();
    let policy = resolver
        .resolve(&fixture.project, &SyncOptions::default())
        .unwrap();
    assert_eq!(policy.dialects, vec!["windsurf"]);

    // The invocation beats both
    let policy = resolver
        .resolve(&fixture.project, &options(&["cursor"]))
        .unwrap();
    assert_eq!(policy.dialects, vec!["cursor"]);
}

#[test]
fn given_divergent_bodies_when_force_bisync_then_both_files_unchanged() {
    // GIVEN foo.md with different bodies on each side
    let fixture = TestFixture::new().unwrap();
    fixture
        .write_project_file(".cursor/commands/foo.md", "X")
        .unwrap();
    fixture
        .write_project_file(".windsurf/workflows/foo.md", "Y")
        .unwrap();
    let registry = Registry::builtin();
    let mut prompter = ScriptedPrompter::new(Decision::KeepLeft);

    // WHEN syncing with force
    let report = BidirectionalSyncer::new(&registry, &fixture.project, "cursor", "windsurf")
        .sync(
            &BisyncParams {
                force: true,
                dry_run: false,
            },
            &mut prompter,
        )
        .unwrap();

    // THEN nobody was asked and nothing moved
    assert!(prompter.asked.is_empty());
    assert_eq!(prompter.confirmations, 0);
    assert_eq!(report.total_written(), 0);
    assert_eq!(
        fixture.read_project_file(".cursor/commands/foo.md").unwrap(),
        "X"
    );
    assert_eq!(
        fixture
            .read_project_file(".windsurf/workflows/foo.md")
            .unwrap(),
        "Y"
    );
}

#[test]
fn given_item_only_on_one_side_when_bisync_then_it_propagates_after_confirmation() {
    // GIVEN bar.md only in cursor
    let fixture = TestFixture::new().unwrap();
    fixture
        .write_project_file(".cursor/commands/bar.md", "Z")
        .unwrap();
    let registry = Registry::builtin();
    let mut prompter = ScriptedPrompter::new(Decision::Skip);

    // WHEN syncing interactively
    let report = BidirectionalSyncer::new(&registry, &fixture.project, "cursor", "windsurf")
        .sync(&BisyncParams::default(), &mut prompter)
        .unwrap();

    // THEN the confirm gate was reached exactly once
    assert_eq!(prompter.confirmations, 1);
    assert!(!report.declined);

    // AND bar arrived in windsurf's dialect
    let bar = fixture
        .read_project_file(".windsurf/workflows/bar.md")
        .unwrap();
    assert!(bar.starts_with("---\n"));
    assert!(bar.contains("auto_execution_mode: 1\n"));
    assert!(bar.ends_with("---\nZ\n"));
}

#[test]
fn given_vscode_and_windsurf_when_bisync_then_rules_and_commands_cross_over() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .write_project_file(
            ".github/prompts/review.prompt.md",
            "---\nmode: ask\ndescription: Review the diff\ntools: []\n---\nReview it.",
        )
        .unwrap();
    fixture
        .write_project_file(
            ".windsurf/rules/style.md",
            "---\ndescription: Style\nmode: always\n---\nUse tabs.",
        )
        .unwrap();
    let registry = Registry::builtin();
    let mut prompter = ScriptedPrompter::new(Decision::Skip);

    let report = BidirectionalSyncer::new(&registry, &fixture.project, "vscode", "windsurf")
        .sync(&BisyncParams::default(), &mut prompter)
        .unwrap();
    assert_eq!(report.total_written(), 2);

    let workflow = fixture
        .read_project_file(".windsurf/workflows/review.md")
        .unwrap();
    assert!(workflow.starts_with("---\ndescription: Review the diff\n"));
    let instructions = fixture
        .read_project_file(".github/instructions/style.instructions.md")
        .unwrap();
    assert!(instructions.contains("description: Style\n"));
    assert!(instructions.ends_with("Use tabs.\n"));
}

#[test]
fn given_forced_one_way_sync_when_run_then_only_the_target_changes() {
    // GIVEN a conflict on foo, cursor-only bar and windsurf-only baz
    let fixture = TestFixture::new().unwrap();
    fixture
        .write_project_file(".cursor/commands/foo.md", "X")
        .unwrap();
    fixture
        .write_project_file(".windsurf/workflows/foo.md", "Y")
        .unwrap();
    fixture
        .write_project_file(".cursor/commands/bar.md", "Z")
        .unwrap();
    fixture
        .write_project_file(".windsurf/workflows/baz.md", "W")
        .unwrap();
    let registry = Registry::builtin();
    let mut prompter = ScriptedPrompter::new(Decision::KeepLeft);

    // WHEN cursor is copied into windsurf with --force
    let report = BidirectionalSyncer::new(&registry, &fixture.project, "cursor", "windsurf")
        .one_way()
        .sync(
            &BisyncParams {
                force: true,
                dry_run: false,
            },
            &mut prompter,
        )
        .unwrap();

    // THEN nobody was asked and only bar was written
    assert!(prompter.asked.is_empty());
    assert_eq!(prompter.confirmations, 0);
    assert_eq!(report.total_written(), 1);
    assert!(fixture
        .read_project_file(".windsurf/workflows/bar.md")
        .unwrap()
        .ends_with("---\nZ\n"));

    // AND the conflict and the source tree are untouched
    assert_eq!(
        fixture
            .read_project_file(".windsurf/workflows/foo.md")
            .unwrap(),
        "Y"
    );
    assert!(!fixture.project.join(".cursor/commands/baz.md").exists());
}
