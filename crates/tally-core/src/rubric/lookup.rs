//! Lookup of categories, items, and their score nodes by identifier

use crate::rubric::types::{
    Rubric, RubricCategory, RubricCategoryScore, RubricItem, RubricItemScore, RubricScore,
};

/// Find a category by id
pub fn find_category<'a>(rubric: &'a Rubric, category_id: &str) -> Option<&'a RubricCategory> {
    rubric.categories.iter().find(|c| c.id == category_id)
}

/// Find an item by id, searching nested sub-items at any depth
pub fn find_item<'a>(items: &'a [RubricItem], item_id: &str) -> Option<&'a RubricItem> {
    for item in items {
        if item.id == item_id {
            return Some(item);
        }
        if let Some(found) = item
            .sub_items
            .as_ref()
            .and_then(|sub_items| find_item(sub_items, item_id))
        {
            return Some(found);
        }
    }
    None
}

/// Find an item anywhere in a rubric
pub fn find_item_in_rubric<'a>(rubric: &'a Rubric, item_id: &str) -> Option<&'a RubricItem> {
    rubric
        .categories
        .iter()
        .find_map(|category| find_item(&category.items, item_id))
}

/// Find the score node shadowing a category
pub fn find_category_score<'a>(
    rubric_score: &'a RubricScore,
    category_id: &str,
) -> Option<&'a RubricCategoryScore> {
    rubric_score
        .categories
        .iter()
        .find(|c| c.category_id == category_id)
}

/// Find the score node shadowing an item, at any depth
pub fn find_item_score<'a>(
    rubric_score: &'a RubricScore,
    item_id: &str,
) -> Option<&'a RubricItemScore> {
    rubric_score
        .categories
        .iter()
        .find_map(|category| find_item_score_in(&category.items, item_id))
}

fn find_item_score_in<'a>(
    items: &'a [RubricItemScore],
    item_id: &str,
) -> Option<&'a RubricItemScore> {
    for item in items {
        if item.item_id == item_id {
            return Some(item);
        }
        if let Some(found) = item
            .sub_items
            .as_ref()
            .and_then(|sub_items| find_item_score_in(sub_items, item_id))
        {
            return Some(found);
        }
    }
    None
}
