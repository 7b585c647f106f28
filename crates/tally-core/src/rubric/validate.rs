//! Duplicate-id detection across a rubric's item tree
//!
//! Item ids are the join keys between a rubric and its score cards, so a
//! duplicate anywhere in the tree (across categories, at any nesting depth)
//! can misattribute marks. Validation reports findings as structured
//! results and never fails: invalid rubrics can exist and downstream code
//! must tolerate them. Callers decide whether to block on the findings.

use std::collections::HashSet;

use serde::Serialize;

use crate::rubric::types::{Rubric, RubricCategory, RubricItem};

/// Accumulator for one validation traversal
///
/// A single tracker is threaded through every item list in the rubric so
/// collisions between distant branches are still caught.
#[derive(Debug, Default)]
pub struct IdTracker {
    seen: HashSet<String>,
    duplicates: Vec<String>,
}

impl IdTracker {
    /// Record one id sighting; each offending id is reported once
    fn record(&mut self, id: &str) {
        if !self.seen.insert(id.to_string()) && !self.duplicates.iter().any(|d| d == id) {
            self.duplicates.push(id.to_string());
        }
    }

    fn is_valid(&self) -> bool {
        self.duplicates.is_empty()
    }

    fn into_duplicates(self) -> Vec<String> {
        self.duplicates
    }
}

/// Findings of an item-id uniqueness check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemIdValidation {
    pub valid: bool,
    pub duplicate_item_ids: Vec<String>,
}

/// Findings of a whole-rubric check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricValidation {
    pub valid: bool,
    pub duplicate_item_ids: Vec<String>,
    pub duplicate_category_ids: Vec<String>,
}

/// Visit an item list and every nested sub-item list, recording ids into
/// the shared tracker
pub fn validate_unique_item_ids_with(items: &[RubricItem], tracker: &mut IdTracker) {
    for item in items {
        tracker.record(&item.id);
        if let Some(sub_items) = &item.sub_items {
            validate_unique_item_ids_with(sub_items, tracker);
        }
    }
}

/// Check one item list (including nested sub-items) in isolation
pub fn validate_unique_item_ids(items: &[RubricItem]) -> ItemIdValidation {
    let mut tracker = IdTracker::default();
    validate_unique_item_ids_with(items, &mut tracker);
    ItemIdValidation {
        valid: tracker.is_valid(),
        duplicate_item_ids: tracker.into_duplicates(),
    }
}

/// Check all categories' item trees against one shared accumulator
pub fn validate_categories(categories: &[RubricCategory]) -> ItemIdValidation {
    let mut tracker = IdTracker::default();
    for category in categories {
        validate_unique_item_ids_with(&category.items, &mut tracker);
    }
    ItemIdValidation {
        valid: tracker.is_valid(),
        duplicate_item_ids: tracker.into_duplicates(),
    }
}

/// Check a whole rubric: item-id uniqueness across the entire tree plus
/// category-id uniqueness
pub fn validate_rubric(rubric: &Rubric) -> RubricValidation {
    let items = validate_categories(&rubric.categories);

    let mut category_tracker = IdTracker::default();
    for category in &rubric.categories {
        category_tracker.record(&category.id);
    }

    RubricValidation {
        valid: items.valid && category_tracker.is_valid(),
        duplicate_item_ids: items.duplicate_item_ids,
        duplicate_category_ids: category_tracker.into_duplicates(),
    }
}
