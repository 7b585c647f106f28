//! Score-card reconciliation against an edited rubric
//!
//! A card can go stale whenever its rubric is edited: items and categories
//! added, removed, regrouped, or reordered. Reconciliation rebuilds the
//! card to exactly the rubric's current shape. Grader-authored marks and
//! comments survive as long as their item or category still exists by id;
//! anything new gets an empty node, and nodes whose ids the rubric no
//! longer defines are dropped. Optionally one discrete field update rides
//! along in the same pass.
//!
//! The repaired card is rescored before it is returned, so its caches are
//! fresh and any structural disagreement fails the whole operation
//! immediately instead of surfacing at the next grading step.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rubric::factory::{make_category_score, make_item_score};
use crate::rubric::score::rescore;
use crate::rubric::types::{
    Rubric, RubricCategory, RubricCategoryScore, RubricItem, RubricItemScore, RubricScore,
};

/// One discrete grading edit, applied during reconciliation
///
/// The `update_score`/`update_comments` flags gate each field so "set the
/// score to none" (reset to ungraded) stays distinguishable from "leave
/// the score untouched". Flags absent from a serialized descriptor
/// deserialize as `false`: no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "update", rename_all = "lowercase")]
pub enum ScoreUpdate {
    /// Target one item's mark and/or comments
    #[serde(rename_all = "camelCase")]
    Item {
        item_id: String,
        #[serde(default)]
        update_score: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
        #[serde(default)]
        update_comments: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comments: Option<String>,
    },
    /// Target one category's comments
    #[serde(rename_all = "camelCase")]
    Category {
        category_id: String,
        #[serde(default)]
        update_comments: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comments: Option<String>,
    },
}

/// Reconcile a possibly-stale card against the live rubric
///
/// Returns a new card with exactly the rubric's shape. With no descriptor
/// this is pure structural repair (the call to make after editing a
/// rubric). A descriptor targeting an id the rubric no longer defines
/// matches nothing and changes nothing.
pub fn update_rubric_score(
    rubric: &Rubric,
    prior: &RubricScore,
    update: Option<&ScoreUpdate>,
) -> Result<RubricScore> {
    let mut next = RubricScore {
        id: prior.id.clone(),
        rubric_id: rubric.id.clone(),
        name: rubric.name.clone(),
        student_id: prior.student_id.clone(),
        student_name: prior.student_name.clone(),
        course_id: prior.course_id.clone(),
        course_name: prior.course_name.clone(),
        grader: prior.grader.clone(),
        categories: fix_category_score_list(&rubric.categories, &prior.categories),
        comments: prior.comments.clone(),
        computed_score: None,
        created_at: prior.created_at,
        updated_at: prior.updated_at,
    };

    if let Some(update) = update {
        apply_update(&mut next, update);
    }

    rescore(rubric, &mut next)?;
    Ok(next)
}

/// Repair a category score list to shadow the live category list
pub fn fix_category_score_list(
    categories: &[RubricCategory],
    prior: &[RubricCategoryScore],
) -> Vec<RubricCategoryScore> {
    let by_id: HashMap<&str, &RubricCategoryScore> = prior
        .iter()
        .map(|score| (score.category_id.as_str(), score))
        .collect();

    categories
        .iter()
        .map(|category| match by_id.get(category.id.as_str()) {
            Some(prev) => RubricCategoryScore {
                id: prev.id.clone(),
                category_id: category.id.clone(),
                items: fix_item_score_list(&category.items, &prev.items),
                comments: prev.comments.clone(),
                computed_score: None,
            },
            None => make_category_score(category),
        })
        .collect()
}

/// Repair an item score list to shadow the live item list
///
/// Recurses into sub-items: a live item that gained sub-items gets fresh
/// empty sub-scores, one that lost them drops the stale sub-scores.
pub fn fix_item_score_list(
    items: &[RubricItem],
    prior: &[RubricItemScore],
) -> Vec<RubricItemScore> {
    let by_id: HashMap<&str, &RubricItemScore> = prior
        .iter()
        .map(|score| (score.item_id.as_str(), score))
        .collect();

    items
        .iter()
        .map(|item| match by_id.get(item.id.as_str()) {
            Some(prev) => RubricItemScore {
                id: prev.id.clone(),
                item_id: item.id.clone(),
                score: prev.score,
                comments: prev.comments.clone(),
                sub_items: match (&item.sub_items, &prev.sub_items) {
                    (Some(sub_items), Some(prev_sub)) => {
                        Some(fix_item_score_list(sub_items, prev_sub))
                    }
                    (Some(sub_items), None) => {
                        Some(sub_items.iter().map(make_item_score).collect())
                    }
                    (None, _) => None,
                },
                computed_score: None,
            },
            None => make_item_score(item),
        })
        .collect()
}

fn apply_update(rubric_score: &mut RubricScore, update: &ScoreUpdate) {
    match update {
        ScoreUpdate::Item {
            item_id,
            update_score,
            score,
            update_comments,
            comments,
        } => {
            for category in &mut rubric_score.categories {
                apply_item_update(
                    &mut category.items,
                    item_id,
                    (*update_score, *score),
                    (*update_comments, comments),
                );
            }
        }
        ScoreUpdate::Category {
            category_id,
            update_comments,
            comments,
        } => {
            if !update_comments {
                return;
            }
            for category in &mut rubric_score.categories {
                if category.category_id == *category_id {
                    category.comments = comments.clone();
                }
            }
        }
    }
}

fn apply_item_update(
    items: &mut [RubricItemScore],
    item_id: &str,
    score_update: (bool, Option<f64>),
    comments_update: (bool, &Option<String>),
) {
    for item in items {
        if item.item_id == item_id {
            if score_update.0 {
                item.score = score_update.1;
            }
            if comments_update.0 {
                item.comments = comments_update.1.clone();
            }
        }
        if let Some(sub_items) = &mut item.sub_items {
            apply_item_update(sub_items, item_id, score_update, comments_update);
        }
    }
}
