//! Manages conflows' persisted state and environment.
//!
//! This crate provides utilities for:
//! - Locating the canonical store root (`--central`, `CONFLOWS_HOME`, `~/.conflows`).
//! - Reading and writing saved per-project settings (`projects.json`).

pub mod env;
pub mod persistence;

pub use env::{central_root, home_dir, resolve_central_root, CENTRAL_ROOT_ENV, DEFAULT_ROOT_DIR};
pub use persistence::{
    now_rfc3339, project_key, ProjectConfig, ProjectStore, ProjectsMapping, PROJECTS_FILE,
};
