//! `tally sync` command - reconcile a score card after rubric edits
//!
//! Pure structural repair: marks and comments survive wherever their
//! item or category still exists, new rubric nodes get empty score
//! nodes, and score nodes for removed rubric nodes are dropped.

use crate::cli::Cli;
use crate::commands::helpers::{load_score_pair, print_card_mutation};
use tally_core::error::Result;
use tally_core::rubric::update_rubric_score;
use tally_core::store::Store;

/// Execute the sync command
pub fn execute(cli: &Cli, store: &Store, score_id: &str) -> Result<()> {
    let (rubric, prior) = load_score_pair(store, score_id)?;

    let mut next = update_rubric_score(&rubric, &prior, None)?;
    store.save_score(&mut next)?;
    tracing::debug!(id = %next.id, rubric = %rubric.id, "reconciled score card");

    print_card_mutation(cli, &next)
}
