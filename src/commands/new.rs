//! `tally new` command - author a rubric skeleton

use crate::cli::{Cli, OutputFormat};
use tally_core::error::Result;
use tally_core::id;
use tally_core::rubric::{Rubric, RubricCategory};
use tally_core::store::Store;

/// Execute the new command
pub fn execute(cli: &Cli, store: &Store, name: &str, categories: &[String]) -> Result<()> {
    let existing = store.existing_ids()?;
    let rubric_id = id::generate(store.config().id_scheme, name, &existing);

    let rubric = Rubric::new().with_id(rubric_id).with_name(name).with_categories(
        categories
            .iter()
            .map(|category_name| RubricCategory::new().with_name(category_name))
            .collect(),
    );

    let path = store.save_rubric(&rubric)?;
    tracing::debug!(id = %rubric.id, path = %path.display(), "created rubric");

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": rubric.id,
                "name": rubric.name,
                "categories": rubric
                    .categories
                    .iter()
                    .map(|c| serde_json::json!({ "id": c.id, "name": c.name }))
                    .collect::<Vec<_>>(),
                "created": rubric.created_at,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("{}", rubric.id);
        }
    }

    Ok(())
}
