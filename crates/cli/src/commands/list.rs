use anyhow::Result;
use conflows_sync::{CanonicalStore, ItemFile, ItemKind};
use std::time::SystemTime;
use time::{format_description, OffsetDateTime};

pub(crate) fn handle_list_command(store: &CanonicalStore, tag: Option<String>) -> Result<()> {
    store.ensure_initialized()?;

    let filter = match tag {
        Some(tag) => match store.config()?.expand_tag(&tag) {
            Some(items) => Some(items),
            None => {
                eprintln!("Warning: unknown tag '{}'", tag);
                Some(Vec::new())
            }
        },
        None => None,
    };

    for kind in ItemKind::ALL {
        let items: Vec<ItemFile> = store
            .scan(kind)?
            .into_iter()
            .filter(|item| filter.as_ref().is_none_or(|names| names.contains(&item.name)))
            .collect();

        println!("{} ({}):", capitalize(kind.plural()), items.len());
        if items.is_empty() {
            println!("  (none)");
        }
        let width = items.iter().map(|i| i.name.len()).max().unwrap_or(0);
        for item in &items {
            println!(
                "  {:<width$}  {:>8}  {}",
                item.name,
                format_size(item.size),
                format_modified(item.modified),
                width = width
            );
        }
        println!();
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

fn format_modified(modified: SystemTime) -> String {
    let Ok(description) = format_description::parse("[year]-[month]-[day] [hour]:[minute]") else {
        return String::new();
    };
    OffsetDateTime::from(modified)
        .format(&description)
        .unwrap_or_default()
}
