//! Lock-step scoring of a rubric and its score card
//!
//! Scoring is a pure bottom-up fold over two structurally aligned trees.
//! Nodes pair up by foreign id (`item_id`/`category_id`), never by array
//! position, so the fold tolerates reordering as long as both trees were
//! reconciled to the same shape. Any disagreement that survives
//! reconciliation (unresolved id, length mismatch) is a fatal error here.
//!
//! Per-node aggregates are collected into a [`ComputedScores`] side output
//! rather than written onto the tree mid-walk; [`rescore`] runs the fold
//! and then stamps every `computed_score` cache in one annotation step.

use std::collections::HashMap;

use crate::error::{Result, TallyError};
use crate::rubric::lookup::find_category;
use crate::rubric::types::{
    Rubric, RubricCategory, RubricCategoryScore, RubricItem, RubricItemScore, RubricScore, Score,
    ScoreType, ScoreValue,
};

/// Side output of a scoring pass: per-node aggregates keyed by the score
/// node's own id
#[derive(Debug, Default)]
pub struct ComputedScores {
    by_node: HashMap<String, Score>,
}

impl ComputedScores {
    fn record(&mut self, node_id: &str, score: Score) {
        self.by_node.insert(node_id.to_string(), score);
    }

    /// Aggregate computed for the given score node, if it was visited
    pub fn get(&self, node_id: &str) -> Option<Score> {
        self.by_node.get(node_id).copied()
    }

    /// Stamp cached aggregates onto a score card
    ///
    /// Every visited node gets its fresh aggregate; nodes the pass never
    /// reached lose any stale cache they carried.
    pub fn annotate(&self, rubric_score: &mut RubricScore) {
        rubric_score.computed_score = self.get(&rubric_score.id);
        for category in &mut rubric_score.categories {
            category.computed_score = self.get(&category.id);
            self.annotate_items(&mut category.items);
        }
    }

    fn annotate_items(&self, items: &mut [RubricItemScore]) {
        for item in items {
            item.computed_score = self.get(&item.id);
            if let Some(sub_items) = &mut item.sub_items {
                self.annotate_items(sub_items);
            }
        }
    }
}

/// Score one item node against its score node
///
/// Group items aggregate their sub-items; leaves convert the grader's raw
/// mark through the item's `score_type`/`score_value` rules.
pub fn score_item(
    item: &RubricItem,
    item_score: &RubricItemScore,
    computed: &mut ComputedScores,
) -> Result<Score> {
    if item.id != item_score.item_id {
        return Err(TallyError::ItemMismatch {
            expected: item.id.clone(),
            found: item_score.item_id.clone(),
        });
    }

    let result = if let Some(sub_items) = &item.sub_items {
        let sub_scores =
            item_score
                .sub_items
                .as_deref()
                .ok_or_else(|| TallyError::MissingSubItemScores {
                    item_id: item.id.clone(),
                })?;
        score_item_list(sub_items, sub_scores, computed)?
    } else {
        score_leaf(item, item_score)
    };

    computed.record(&item_score.id, result);
    Ok(result)
}

fn score_leaf(item: &RubricItem, item_score: &RubricItemScore) -> Score {
    // Bonus and penalty items never count toward the possible total
    let point_value = match item.score_value {
        ScoreValue::Points => item.point_value,
        ScoreValue::Bonus | ScoreValue::Penalty => 0.0,
    };

    let earned = match (item.score_type, item_score.score) {
        (_, None) => 0.0,
        (ScoreType::Boolean, Some(raw)) => {
            if raw > 0.0 {
                item.point_value
            } else {
                0.0
            }
        }
        (ScoreType::FullHalf, Some(raw)) => raw * item.point_value,
        (ScoreType::Points, Some(raw)) => {
            // Negative point value marks a penalty-shaped item: the grader
            // records the deduction as a positive number
            if item.point_value < 0.0 {
                -raw
            } else {
                raw
            }
        }
    };

    Score {
        score: earned,
        point_value,
        unscored_items: u32::from(item_score.score.is_none()),
    }
}

/// Score a list of items against a list of score nodes, pairing by item id
pub fn score_item_list(
    items: &[RubricItem],
    item_scores: &[RubricItemScore],
    computed: &mut ComputedScores,
) -> Result<Score> {
    if items.len() != item_scores.len() {
        return Err(TallyError::ShapeMismatch {
            context: "item list".to_string(),
            expected: items.len(),
            found: item_scores.len(),
        });
    }

    let mut total = Score::ZERO;
    for item_score in item_scores {
        let item = items
            .iter()
            .find(|i| i.id == item_score.item_id)
            .ok_or_else(|| TallyError::ItemNotFound {
                item_id: item_score.item_id.clone(),
            })?;
        total += score_item(item, item_score, computed)?;
    }
    Ok(total)
}

/// Score one category against its score node
pub fn score_category(
    category: &RubricCategory,
    category_score: &RubricCategoryScore,
    computed: &mut ComputedScores,
) -> Result<Score> {
    if category.id != category_score.category_id {
        return Err(TallyError::CategoryMismatch {
            expected: category.id.clone(),
            found: category_score.category_id.clone(),
        });
    }

    let result = score_item_list(&category.items, &category_score.items, computed)?;
    computed.record(&category_score.id, result);
    Ok(result)
}

/// Score a whole card against its rubric
///
/// The externally called entry point for "what is this submission's
/// current score."
pub fn score_rubric(
    rubric: &Rubric,
    rubric_score: &RubricScore,
    computed: &mut ComputedScores,
) -> Result<Score> {
    if rubric.categories.len() != rubric_score.categories.len() {
        return Err(TallyError::ShapeMismatch {
            context: "category list".to_string(),
            expected: rubric.categories.len(),
            found: rubric_score.categories.len(),
        });
    }

    let mut total = Score::ZERO;
    for category_score in &rubric_score.categories {
        let category = find_category(rubric, &category_score.category_id).ok_or_else(|| {
            TallyError::CategoryNotFound {
                category_id: category_score.category_id.clone(),
            }
        })?;
        total += score_category(category, category_score, computed)?;
    }

    computed.record(&rubric_score.id, total);
    Ok(total)
}

/// Run the fold and refresh every `computed_score` cache on the card
pub fn rescore(rubric: &Rubric, rubric_score: &mut RubricScore) -> Result<Score> {
    let mut computed = ComputedScores::default();
    let total = score_rubric(rubric, rubric_score, &mut computed)?;
    computed.annotate(rubric_score);
    Ok(total)
}
