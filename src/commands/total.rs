//! `tally total` command - recompute and print a card's aggregate

use crate::cli::{Cli, OutputFormat};
use crate::commands::helpers::{format_score, load_score_pair};
use tally_core::error::Result;
use tally_core::rubric::{rescore, Score};
use tally_core::store::Store;

/// Execute the total command
pub fn execute(cli: &Cli, store: &Store, score_id: &str) -> Result<()> {
    let (rubric, mut card) = load_score_pair(store, score_id)?;

    let total = rescore(&rubric, &mut card)?;
    store.save_score(&mut card)?;

    // Category names come from the rubric; the card only holds foreign keys
    let breakdown: Vec<(String, Option<Score>)> = card
        .categories
        .iter()
        .map(|category_score| {
            let name = rubric
                .categories
                .iter()
                .find(|c| c.id == category_score.category_id)
                .map_or_else(|| category_score.category_id.clone(), |c| c.name.clone());
            (name, category_score.computed_score)
        })
        .collect();

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": card.id,
                "name": card.name,
                "total": total,
                "categories": breakdown
                    .iter()
                    .map(|(name, score)| serde_json::json!({ "name": name, "total": score }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                for (name, score) in &breakdown {
                    match score {
                        Some(score) => println!("{}: {}", name, format_score(*score)),
                        None => println!("{}: -", name),
                    }
                }
            }
            println!("total: {}", format_score(total));
        }
    }

    Ok(())
}
