use anyhow::Result;
use conflows_sync::CanonicalStore;

pub(crate) fn handle_init_command(store: &CanonicalStore) -> Result<()> {
    let outcome = store.init()?;
    if outcome.already_initialized && outcome.created.is_empty() {
        println!(
            "Canonical store already initialized at {}",
            store.root().display()
        );
        return Ok(());
    }

    println!("Initialized canonical store at {}", store.root().display());
    for path in &outcome.created {
        println!("  created {}", path.display());
    }
    println!();
    println!("Add commands to {}", store.dir(conflows_sync::ItemKind::Command).display());
    println!("Add rules to    {}", store.dir(conflows_sync::ItemKind::Rule).display());
    Ok(())
}
