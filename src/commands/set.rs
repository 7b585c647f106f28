//! `tally set` command - record a score or comment on a card
//!
//! Builds an update descriptor, reconciles the card against its rubric,
//! and persists the result. A target id the rubric no longer defines is
//! a warning, not an error: the reconcile pass simply has nothing to
//! apply it to.

use crate::cli::Cli;
use crate::commands::helpers::{load_score_pair, print_card_mutation};
use tally_core::error::{Result, TallyError};
use tally_core::rubric::{find_category, find_item_in_rubric, update_rubric_score, ScoreUpdate};
use tally_core::store::Store;

pub struct SetArgs<'a> {
    pub item: Option<&'a str>,
    pub category: Option<&'a str>,
    pub score: Option<f64>,
    pub clear_score: bool,
    pub comments: Option<&'a str>,
    pub clear_comments: bool,
}

/// Execute the set command
pub fn execute(cli: &Cli, store: &Store, score_id: &str, args: &SetArgs) -> Result<()> {
    let update = build_update(args)?;
    let (rubric, prior) = load_score_pair(store, score_id)?;

    let target_known = match &update {
        ScoreUpdate::Item { item_id, .. } => find_item_in_rubric(&rubric, item_id).is_some(),
        ScoreUpdate::Category { category_id, .. } => {
            find_category(&rubric, category_id).is_some()
        }
    };
    if !target_known && !cli.quiet {
        eprintln!("warning: rubric {} has no such target, nothing updated", rubric.id);
    }

    let mut next = update_rubric_score(&rubric, &prior, Some(&update))?;
    store.save_score(&mut next)?;

    print_card_mutation(cli, &next)
}

fn build_update(args: &SetArgs) -> Result<ScoreUpdate> {
    let update_score = args.score.is_some() || args.clear_score;
    let update_comments = args.comments.is_some() || args.clear_comments;

    if !update_score && !update_comments {
        return Err(TallyError::UsageError(
            "nothing to update: pass --score, --clear-score, --comments, or --clear-comments"
                .to_string(),
        ));
    }

    match (args.item, args.category) {
        (Some(item_id), None) => Ok(ScoreUpdate::Item {
            item_id: item_id.to_string(),
            update_score,
            score: args.score,
            update_comments,
            comments: args.comments.map(str::to_string),
        }),
        (None, Some(category_id)) => {
            if update_score {
                return Err(TallyError::UsageError(
                    "categories hold comments only; use --item to record scores".to_string(),
                ));
            }
            Ok(ScoreUpdate::Category {
                category_id: category_id.to_string(),
                update_comments,
                comments: args.comments.map(str::to_string),
            })
        }
        _ => Err(TallyError::UsageError(
            "one of --item or --category is required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<'a>() -> SetArgs<'a> {
        SetArgs {
            item: None,
            category: None,
            score: None,
            clear_score: false,
            comments: None,
            clear_comments: false,
        }
    }

    #[test]
    fn test_item_score_descriptor() {
        let update = build_update(&SetArgs {
            item: Some("ty-i1"),
            score: Some(2.0),
            ..args()
        })
        .unwrap();
        assert_eq!(
            update,
            ScoreUpdate::Item {
                item_id: "ty-i1".to_string(),
                update_score: true,
                score: Some(2.0),
                update_comments: false,
                comments: None,
            }
        );
    }

    #[test]
    fn test_clear_flags_set_fields_to_none() {
        let update = build_update(&SetArgs {
            item: Some("ty-i1"),
            clear_score: true,
            clear_comments: true,
            ..args()
        })
        .unwrap();
        assert_eq!(
            update,
            ScoreUpdate::Item {
                item_id: "ty-i1".to_string(),
                update_score: true,
                score: None,
                update_comments: true,
                comments: None,
            }
        );
    }

    #[test]
    fn test_category_rejects_score() {
        let result = build_update(&SetArgs {
            category: Some("ty-c1"),
            score: Some(1.0),
            ..args()
        });
        assert!(matches!(result, Err(TallyError::UsageError(_))));
    }

    #[test]
    fn test_requires_target_and_payload() {
        assert!(build_update(&args()).is_err());
        assert!(build_update(&SetArgs {
            score: Some(1.0),
            ..args()
        })
        .is_err());
    }
}
