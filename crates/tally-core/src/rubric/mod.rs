//! Rubric data structures and grading logic
//!
//! A rubric is a two-level tree (categories holding items, items
//! optionally holding one level of sub-items) describing what an
//! assignment is graded on. Each graded submission gets a score card, a
//! parallel tree shadowing the rubric node-for-node by id, holding the
//! grader's raw marks and comments.

pub mod factory;
pub mod lookup;
pub mod reconcile;
pub mod score;
pub mod types;
pub mod validate;

pub use factory::{make_category_score, make_item_score, make_rubric_score};
pub use lookup::{
    find_category, find_category_score, find_item, find_item_in_rubric, find_item_score,
};
pub use reconcile::{update_rubric_score, ScoreUpdate};
pub use score::{rescore, score_rubric, ComputedScores};
pub use types::{
    Rubric, RubricCategory, RubricCategoryScore, RubricItem, RubricItemScore, RubricScore, Score,
    ScoreType, ScoreValue,
};
pub use validate::{
    validate_categories, validate_rubric, validate_unique_item_ids, ItemIdValidation,
    RubricValidation,
};
