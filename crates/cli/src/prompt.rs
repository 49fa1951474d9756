//! Interactive answers for bidirectional sync.

use crate::commands::format_plan;
use anyhow::{Context, Result};
use conflows_sync::{Conflict, Decision, Prompter, SyncPlan};
use inquire::{Confirm, Select};

/// Asks on the terminal through `inquire`.
pub(crate) struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn decide(&mut self, conflict: &Conflict, left: &str, right: &str) -> Result<Decision> {
        let message = format!(
            "{} '{}' differs between {} and {}",
            conflict.kind, conflict.name, left, right
        );
        loop {
            let options = vec![
                format!("Keep {}", left),
                format!("Keep {}", right),
                "Skip".to_string(),
                "Show diff".to_string(),
            ];
            let choice = Select::new(&message, options)
                .raw_prompt()
                .context("Failed to read conflict decision")?;
            match choice.index {
                0 => return Ok(Decision::KeepLeft),
                1 => return Ok(Decision::KeepRight),
                2 => return Ok(Decision::Skip),
                _ => println!("{}", conflict.unified_diff(left, right)),
            }
        }
    }

    fn confirm(&mut self, plan: &SyncPlan) -> Result<bool> {
        print!("{}", format_plan(plan));
        Confirm::new("Apply these changes?")
            .with_default(true)
            .prompt()
            .context("Failed to read confirmation")
    }
}
