use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable overriding the canonical store root.
pub const CENTRAL_ROOT_ENV: &str = "CONFLOWS_HOME";

/// Directory under `$HOME` used when nothing else names a root.
pub const DEFAULT_ROOT_DIR: &str = ".conflows";

/// Returns the user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("home directory not found"))
}

/// Returns the canonical store root from `CONFLOWS_HOME`, else `~/.conflows`.
pub fn central_root() -> Result<PathBuf> {
    resolve_central_root(None)
}

/// Like [`central_root`], with an explicit override taking precedence.
///
/// Empty values are ignored at every level.
pub fn resolve_central_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }
    if let Ok(custom) = std::env::var(CENTRAL_ROOT_ENV) {
        if !custom.trim().is_empty() {
            return Ok(PathBuf::from(custom));
        }
    }
    Ok(home_dir()?.join(DEFAULT_ROOT_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use conflows_test_utils::{env_guard, set_env_var};

    #[test]
    fn explicit_root_wins() {
        let _g = env_guard();
        let _env = set_env_var(CENTRAL_ROOT_ENV, Some("/from/env"));
        let root = resolve_central_root(Some(Path::new("/explicit"))).unwrap();
        assert_eq!(root, PathBuf::from("/explicit"));
    }

    #[test]
    fn env_root_beats_home() {
        let _g = env_guard();
        let _env = set_env_var(CENTRAL_ROOT_ENV, Some("/from/env"));
        assert_eq!(central_root().unwrap(), PathBuf::from("/from/env"));
    }

    #[test]
    fn falls_back_to_home_dir() {
        let _g = env_guard();
        let tmp = tempfile::tempdir().unwrap();
        let _env = set_env_var(CENTRAL_ROOT_ENV, Some("  "));
        let _home = set_env_var("HOME", tmp.path().to_str());
        assert_eq!(central_root().unwrap(), tmp.path().join(".conflows"));
    }
}
