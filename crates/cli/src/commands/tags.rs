use anyhow::{bail, Result};
use conflows_sync::CanonicalStore;
use std::collections::BTreeSet;

pub(crate) fn handle_tags_list_command(store: &CanonicalStore) -> Result<()> {
    let config = store.config()?;
    if config.tags.is_empty() {
        println!("No tags defined in {}", store.config_path().display());
        return Ok(());
    }
    let width = config.tags.keys().map(String::len).max().unwrap_or(0);
    for (name, tag) in &config.tags {
        println!(
            "{:<width$}  {:>3} item(s)  {}",
            name,
            tag.items.len(),
            tag.description,
            width = width
        );
    }
    Ok(())
}

pub(crate) fn handle_tags_show_command(store: &CanonicalStore, tag: &str) -> Result<()> {
    let config = store.config()?;
    let Some(items) = config.expand_tag(tag) else {
        let known: Vec<&str> = config.tags.keys().map(String::as_str).collect();
        bail!("Unknown tag '{}'. Defined tags: {}", tag, known.join(", "));
    };

    let present: BTreeSet<String> = store.item_names()?.into_iter().collect();
    println!("{} ({} item(s)):", tag, items.len());
    for item in &items {
        let marker = if present.contains(item) { " " } else { "!" };
        println!("  {} {}", marker, item);
    }
    if items.iter().any(|i| !present.contains(i)) {
        println!();
        println!("! = not in the canonical store");
    }
    Ok(())
}
