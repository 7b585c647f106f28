//! `tally init` command - create a new store

use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use tally_core::error::Result;
use tally_core::store::Store;

/// Execute the init command
pub fn execute(cli: &Cli, root: &Path, visible: bool) -> Result<()> {
    let store = if let Some(path) = cli.store.as_ref() {
        let resolved = if path.is_absolute() {
            path.clone()
        } else {
            root.join(path)
        };
        Store::init_at(&resolved)?
    } else {
        Store::init(root, visible)?
    };

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "store": store.root().display().to_string(),
                "message": "Store initialized"
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("Initialized tally store at {}", store.root().display());
            if !cli.quiet {
                println!();
                println!("Run `tally new <name>` to author your first rubric.");
            }
        }
    }

    Ok(())
}
