//! Rubric and score-card data model
//!
//! A `Rubric` is the authoritative grading structure: categories holding
//! items, items optionally holding nested sub-items to any depth. A
//! `RubricScore` shadows one rubric and carries the grader-authored state
//! (per-item marks and comments). The shadow matches by foreign id
//! (`item_id`/`category_id`), never by array position, so rubric edits and
//! reorderings cannot silently misattribute marks.
//!
//! Documents serialize as camelCase JSON; optional fields are omitted when
//! absent so "not yet graded" (`score` missing) stays distinguishable from
//! "graded zero" across save/load.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};
use crate::id;

/// How a grader's raw mark on an item converts into earned points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreType {
    /// Any positive mark earns the full point value, anything else earns zero
    #[default]
    Boolean,
    /// Mark is a multiplier in {0, 0.5, 1} applied to the point value
    FullHalf,
    /// Mark is the raw earned value, bounded conceptually by the point value
    Points,
}

impl ScoreType {
    /// All valid score types
    pub const VALID_TYPES: &'static [&'static str] = &["boolean", "full_half", "points"];
}

impl FromStr for ScoreType {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "boolean" => Ok(ScoreType::Boolean),
            "full_half" => Ok(ScoreType::FullHalf),
            "points" => Ok(ScoreType::Points),
            other => Err(TallyError::UnknownScoreType(other.to_string())),
        }
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreType::Boolean => write!(f, "boolean"),
            ScoreType::FullHalf => write!(f, "full_half"),
            ScoreType::Points => write!(f, "points"),
        }
    }
}

/// How an item's earned points count against the rubric's possible total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreValue {
    /// Counts toward both earned and possible points
    #[default]
    Points,
    /// Extra credit: earned points only, no contribution to the denominator
    Bonus,
    /// Deduction: negative earned points, no contribution to the denominator
    Penalty,
}

impl ScoreValue {
    /// All valid score values
    pub const VALID_VALUES: &'static [&'static str] = &["points", "bonus", "penalty"];
}

impl FromStr for ScoreValue {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "points" => Ok(ScoreValue::Points),
            "bonus" => Ok(ScoreValue::Bonus),
            "penalty" => Ok(ScoreValue::Penalty),
            other => Err(TallyError::UnknownScoreValue(other.to_string())),
        }
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Points => write!(f, "points"),
            ScoreValue::Bonus => write!(f, "bonus"),
            ScoreValue::Penalty => write!(f, "penalty"),
        }
    }
}

/// A scoring leaf or an internal grouping node
///
/// An item with `sub_items` is a group: it has no direct mark of its own
/// and its value is the aggregate of its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricItem {
    /// Unique within the owning rubric's entire item tree, at any depth
    pub id: String,
    /// Display label
    pub name: String,
    /// Mark-to-points conversion rule
    pub score_type: ScoreType,
    /// Contribution rule against the possible total
    pub score_value: ScoreValue,
    /// Numeric weight; negative for penalty-shaped items
    pub point_value: f64,
    /// Nested child items; present iff this is a grouping node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_items: Option<Vec<RubricItem>>,
}

impl RubricItem {
    /// Create an item with default scoring and a fresh id
    pub fn new() -> Self {
        RubricItem {
            id: id::fresh_id(),
            name: "Unnamed item".to_string(),
            score_type: ScoreType::default(),
            score_value: ScoreValue::default(),
            point_value: 1.0,
            sub_items: None,
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the display label
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the mark-to-points rule
    pub fn with_score_type(mut self, score_type: ScoreType) -> Self {
        self.score_type = score_type;
        self
    }

    /// Set the contribution rule
    pub fn with_score_value(mut self, score_value: ScoreValue) -> Self {
        self.score_value = score_value;
        self
    }

    /// Set the numeric weight
    pub fn with_point_value(mut self, point_value: f64) -> Self {
        self.point_value = point_value;
        self
    }

    /// Turn this item into a grouping node over the given children
    pub fn with_sub_items(mut self, sub_items: Vec<RubricItem>) -> Self {
        self.sub_items = Some(sub_items);
        self
    }

    /// Whether this item is a grouping node
    pub fn is_group(&self) -> bool {
        self.sub_items.is_some()
    }
}

impl Default for RubricItem {
    fn default() -> Self {
        Self::new()
    }
}

/// A named, ordered collection of top-level items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricCategory {
    /// Category identifier
    pub id: String,
    /// Display label
    pub name: String,
    /// Top-level items, each possibly holding sub-items
    pub items: Vec<RubricItem>,
}

impl RubricCategory {
    /// Create an empty category with a fresh id
    pub fn new() -> Self {
        RubricCategory {
            id: id::fresh_id(),
            name: "Unnamed category".to_string(),
            items: Vec::new(),
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the display label
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the item list, warning on duplicate item ids
    pub fn with_items(mut self, items: Vec<RubricItem>) -> Self {
        self.items = items;
        let check = crate::rubric::validate::validate_unique_item_ids(&self.items);
        if !check.valid {
            tracing::warn!(
                category_id = %self.id,
                duplicates = ?check.duplicate_item_ids,
                "category contains duplicate item ids"
            );
        }
        self
    }
}

impl Default for RubricCategory {
    fn default() -> Self {
        Self::new()
    }
}

/// The authoritative grading structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rubric {
    /// Rubric identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Ordered categories
    pub categories: Vec<RubricCategory>,
    /// Authoring timestamp (auto-populated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Rubric {
    /// Create an empty rubric with a fresh id
    pub fn new() -> Self {
        Rubric {
            id: id::fresh_id(),
            name: "Unnamed rubric".to_string(),
            categories: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the category list, warning on duplicate ids anywhere in the tree
    pub fn with_categories(mut self, categories: Vec<RubricCategory>) -> Self {
        self.categories = categories;
        let check = crate::rubric::validate::validate_rubric(&self);
        if !check.valid {
            tracing::warn!(
                rubric_id = %self.id,
                duplicate_items = ?check.duplicate_item_ids,
                duplicate_categories = ?check.duplicate_category_ids,
                "rubric contains duplicate ids"
            );
        }
        self
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self::new()
    }
}

/// Grader-authored state for one rubric item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricItemScore {
    /// Own identity, stable across reconciliations
    pub id: String,
    /// The `RubricItem.id` this node scores
    pub item_id: String,
    /// Raw mark; absent means not yet graded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Grader commentary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Sub-scores; present iff the referenced item has sub-items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_items: Option<Vec<RubricItemScore>>,
    /// Cache of the last computed aggregate; derived, never authoritative
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_score: Option<Score>,
}

/// Grader-authored state for one rubric category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricCategoryScore {
    /// Own identity
    pub id: String,
    /// The `RubricCategory.id` this node scores
    pub category_id: String,
    /// Scores shadowing the category's items
    pub items: Vec<RubricItemScore>,
    /// Grader commentary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Cache of the last computed aggregate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_score: Option<Score>,
}

/// A full score card shadowing one rubric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricScore {
    /// Own identity
    pub id: String,
    /// The `Rubric.id` this card scores
    pub rubric_id: String,
    /// Snapshot of the rubric name, refreshed on reconciliation
    pub name: String,
    /// Graded student, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    /// Owning course, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    /// Who graded this card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grader: Option<String>,
    /// Scores shadowing the rubric's categories
    pub categories: Vec<RubricCategoryScore>,
    /// Grader commentary on the whole submission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Cache of the last computed total
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_score: Option<Score>,
    /// Creation timestamp (auto-populated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last save timestamp (maintained by the store)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Aggregate scoring result for any node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Points earned
    pub score: f64,
    /// Points possible, excluding bonus/penalty items
    pub point_value: f64,
    /// Leaf items not yet graded
    pub unscored_items: u32,
}

impl Score {
    /// The zero aggregate
    pub const ZERO: Score = Score {
        score: 0.0,
        point_value: 0.0,
        unscored_items: 0,
    };
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score {
            score: self.score + rhs.score,
            point_value: self.point_value + rhs.point_value,
            unscored_items: self.unscored_items + rhs.unscored_items,
        }
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_type_tags() {
        assert_eq!(
            serde_json::to_string(&ScoreType::FullHalf).unwrap(),
            "\"full_half\""
        );
        assert_eq!(
            serde_json::from_str::<ScoreType>("\"boolean\"").unwrap(),
            ScoreType::Boolean
        );
        assert_eq!("full_half".parse::<ScoreType>().unwrap(), ScoreType::FullHalf);
        assert!("half".parse::<ScoreType>().is_err());
    }

    #[test]
    fn test_score_value_tags() {
        assert_eq!(
            serde_json::to_string(&ScoreValue::Penalty).unwrap(),
            "\"penalty\""
        );
        assert_eq!("BONUS".parse::<ScoreValue>().unwrap(), ScoreValue::Bonus);
        assert!("extra".parse::<ScoreValue>().is_err());
    }

    #[test]
    fn test_item_defaults() {
        let item = RubricItem::new();
        assert_eq!(item.name, "Unnamed item");
        assert_eq!(item.score_type, ScoreType::Boolean);
        assert_eq!(item.score_value, ScoreValue::Points);
        assert_eq!(item.point_value, 1.0);
        assert!(!item.is_group());
        assert!(item.id.starts_with("ty-"));
    }

    #[test]
    fn test_builder_overrides() {
        let item = RubricItem::new()
            .with_id("cat-0-item-0")
            .with_name("Compiles")
            .with_score_type(ScoreType::Points)
            .with_score_value(ScoreValue::Bonus)
            .with_point_value(2.0);
        assert_eq!(item.id, "cat-0-item-0");
        assert_eq!(item.name, "Compiles");
        assert_eq!(item.score_type, ScoreType::Points);
        assert_eq!(item.score_value, ScoreValue::Bonus);
        assert_eq!(item.point_value, 2.0);
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = RubricItem::new()
            .with_id("i-1")
            .with_score_type(ScoreType::FullHalf)
            .with_point_value(2.5);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["scoreType"], "full_half");
        assert_eq!(value["scoreValue"], "points");
        assert_eq!(value["pointValue"], 2.5);
        assert!(value.get("subItems").is_none());
    }

    #[test]
    fn test_absent_score_roundtrips_as_absent() {
        let score = RubricItemScore {
            id: "s-1".to_string(),
            item_id: "i-1".to_string(),
            score: None,
            comments: None,
            sub_items: None,
            computed_score: None,
        };
        let json = serde_json::to_string(&score).unwrap();
        assert!(!json.contains("\"score\""));

        let back: RubricItemScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.score, None);

        let zeroed = RubricItemScore {
            score: Some(0.0),
            ..score
        };
        let json = serde_json::to_string(&zeroed).unwrap();
        assert!(json.contains("\"score\":0.0") || json.contains("\"score\":0"));
    }

    #[test]
    fn test_score_addition() {
        let a = Score {
            score: 1.5,
            point_value: 2.0,
            unscored_items: 1,
        };
        let b = Score {
            score: 2.0,
            point_value: 4.0,
            unscored_items: 2,
        };
        let sum = a + b;
        assert_eq!(sum.score, 3.5);
        assert_eq!(sum.point_value, 6.0);
        assert_eq!(sum.unscored_items, 3);

        let mut acc = Score::ZERO;
        acc += a;
        acc += b;
        assert_eq!(acc, sum);
    }

    #[test]
    fn test_rubric_roundtrip() {
        let rubric = Rubric::new().with_id("r-1").with_name("Lab 1").with_categories(vec![
            RubricCategory::new().with_id("c-1").with_items(vec![
                RubricItem::new().with_id("i-1").with_sub_items(vec![
                    RubricItem::new().with_id("i-1-a"),
                    RubricItem::new().with_id("i-1-b"),
                ]),
            ]),
        ]);
        let json = serde_json::to_string_pretty(&rubric).unwrap();
        let back: Rubric = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rubric);
        assert_eq!(back.categories[0].items[0].sub_items.as_ref().unwrap().len(), 2);
    }
}
