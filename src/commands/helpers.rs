//! Helper functions shared across commands

use tally_core::error::Result;
use tally_core::rubric::{Rubric, RubricScore, Score};
use tally_core::store::Store;

use crate::cli::{Cli, OutputFormat};

/// Load a score card together with the rubric it shadows
pub fn load_score_pair(store: &Store, score_id: &str) -> Result<(Rubric, RubricScore)> {
    let score = store.load_score(score_id)?;
    let rubric = store.load_rubric(&score.rubric_id)?;
    Ok((rubric, score))
}

/// Render an aggregate as `earned/possible (n unscored)`
pub fn format_score(score: Score) -> String {
    if score.unscored_items == 0 {
        format!("{}/{}", score.score, score.point_value)
    } else {
        format!(
            "{}/{} ({} unscored)",
            score.score, score.point_value, score.unscored_items
        )
    }
}

/// Report a persisted card mutation: the card id plus its fresh aggregate
pub fn print_card_mutation(cli: &Cli, card: &RubricScore) -> Result<()> {
    let total = card.computed_score.unwrap_or_default();
    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": card.id,
                "name": card.name,
                "total": total,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("{}", card.id);
            if !cli.quiet {
                println!("score: {}", format_score(total));
            }
        }
    }
    Ok(())
}
