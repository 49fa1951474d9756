//! Fixtures shared by the conflows test suites.
//!
//! Everything here works inside a throwaway directory; nothing touches the
//! real `~/.conflows`.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Holds the process-wide lock for tests that change environment variables.
///
/// A test that panicked while holding the lock does not poison it for the rest.
pub fn env_guard() -> MutexGuard<'static, ()> {
    match ENV_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Puts one environment variable back the way it was when dropped.
pub struct EnvVarGuard {
    name: &'static str,
    saved: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        apply(self.name, self.saved.as_deref());
    }
}

fn apply(name: &str, value: Option<&str>) {
    match value {
        Some(value) => std::env::set_var(name, value),
        None => std::env::remove_var(name),
    }
}

/// Sets (`Some`) or clears (`None`) `name` until the returned guard drops.
///
/// ```
/// let _home = conflows_test_utils::set_env_var("CONFLOWS_DOCTEST", Some("/tmp/store"));
/// assert_eq!(std::env::var("CONFLOWS_DOCTEST").as_deref(), Ok("/tmp/store"));
/// ```
pub fn set_env_var(name: &'static str, value: Option<&str>) -> EnvVarGuard {
    let saved = std::env::var(name).ok();
    apply(name, value);
    EnvVarGuard { name, saved }
}

/// A temp canonical store plus an empty project directory.
///
/// Both live under one tempdir that is removed when this struct drops.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
    /// Canonical store root, with `commands/` and `rules/` created.
    pub central: PathBuf,
    /// Project directory that dialect files are written into.
    pub project: PathBuf,
}

impl TestFixture {
    /// Creates `central/commands/`, `central/rules/` and `project/`.
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let central = tempdir.path().join("central");
        let project = tempdir.path().join("project");

        std::fs::create_dir_all(central.join("commands"))?;
        std::fs::create_dir_all(central.join("rules"))?;
        std::fs::create_dir_all(&project)?;

        Ok(Self {
            tempdir,
            central,
            project,
        })
    }

    /// Writes `central/commands/<file_name>`.
    pub fn write_command(&self, file_name: &str, content: &str) -> std::io::Result<PathBuf> {
        write(&self.central.join("commands").join(file_name), content)
    }

    /// Writes `central/rules/<file_name>`.
    pub fn write_rule(&self, file_name: &str, content: &str) -> std::io::Result<PathBuf> {
        write(&self.central.join("rules").join(file_name), content)
    }

    /// Writes `central/config.json`.
    pub fn write_config(&self, json: &str) -> std::io::Result<PathBuf> {
        write(&self.central.join("config.json"), json)
    }

    /// Writes a file at a path relative to the project directory.
    pub fn write_project_file(&self, relative: &str, content: &str) -> std::io::Result<PathBuf> {
        write(&self.project.join(relative), content)
    }

    /// Reads a file relative to the project directory.
    pub fn read_project_file(&self, relative: &str) -> std::io::Result<String> {
        std::fs::read_to_string(self.project.join(relative))
    }

    /// Create an RAII guard that points `CONFLOWS_HOME` at this fixture's store.
    pub fn central_guard(&self) -> EnvVarGuard {
        set_env_var("CONFLOWS_HOME", self.central.to_str())
    }
}

fn write(path: &Path, content: &str) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_restores_previous_value() {
        let _lock = env_guard();
        const NAME: &str = "CONFLOWS_TEST_UTILS_RESTORE";
        std::env::set_var(NAME, "before");

        let guard = set_env_var(NAME, Some("during"));
        assert_eq!(std::env::var(NAME).as_deref(), Ok("during"));
        drop(guard);

        assert_eq!(std::env::var(NAME).as_deref(), Ok("before"));
        std::env::remove_var(NAME);
    }

    #[test]
    fn guard_clears_then_unsets_again() {
        let _lock = env_guard();
        const NAME: &str = "CONFLOWS_TEST_UTILS_CLEAR";
        std::env::remove_var(NAME);

        let guard = set_env_var(NAME, Some("x"));
        drop(guard);
        assert!(std::env::var(NAME).is_err());

        std::env::set_var(NAME, "kept");
        let guard = set_env_var(NAME, None);
        assert!(std::env::var(NAME).is_err());
        drop(guard);
        assert_eq!(std::env::var(NAME).as_deref(), Ok("kept"));
        std::env::remove_var(NAME);
    }

    #[test]
    fn fixture_creates_store_and_project() {
        let fixture = TestFixture::new().expect("fixture creation");
        assert!(fixture.central.join("commands").is_dir());
        assert!(fixture.central.join("rules").is_dir());
        assert!(fixture.project.is_dir());
    }

    #[test]
    fn project_files_get_parent_dirs() {
        let fixture = TestFixture::new().expect("fixture creation");
        fixture
            .write_project_file(".cursor/commands/a.md", "Body")
            .expect("write");
        assert_eq!(
            fixture.read_project_file(".cursor/commands/a.md").unwrap(),
            "Body"
        );
    }

    #[test]
    fn central_guard_points_home_at_store() {
        let _g = env_guard();
        let fixture = TestFixture::new().expect("fixture creation");

        let original = std::env::var("CONFLOWS_HOME").ok();
        {
            let _guard = fixture.central_guard();
            assert_eq!(
                std::env::var("CONFLOWS_HOME").unwrap(),
                fixture.central.to_str().unwrap()
            );
        }
        assert_eq!(std::env::var("CONFLOWS_HOME").ok(), original);
    }
}
