//! Command-line interface for `conflows`.
//!
//! Parses arguments, installs logging and hands off to the sync engine in
//! `conflows_sync`.

mod app;
mod cli;
mod commands;
mod prompt;

fn main() -> anyhow::Result<()> {
    app::run()
}
