use crate::cli::KindArg;
use anyhow::{Context, Result};
use conflows_sync::{CanonicalStore, Registry, Transformer};
use std::fs;
use std::path::Path;

/// Prints `file` rewritten from one dialect into another.
///
/// The description limit comes from the store config when one exists.
pub(crate) fn handle_convert_command(
    store: &CanonicalStore,
    from: &str,
    to: &str,
    kind: KindArg,
    file: &Path,
) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file: {}", file.display()))?;

    let registry = Registry::with_description_limit(store.config()?.description_limit());
    let output = Transformer::new(&registry).transform(kind.into(), &content, &file_name, from, to)?;

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
