//! Error types and exit codes for tally
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data/store error (missing store, diverged score card, etc.)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes reported by the tally binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - missing store, diverged score card (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during tally operations
#[derive(Error, Debug)]
pub enum TallyError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("unknown ID scheme: {0} (expected: hash or ulid)")]
    UnknownIdScheme(String),

    #[error("unknown score type: {0} (expected: boolean, full_half, or points)")]
    UnknownScoreType(String),

    #[error("unknown score value: {0} (expected: points, bonus, or penalty)")]
    UnknownScoreValue(String),

    #[error("{0}")]
    UsageError(String),

    // Data/store errors (exit code 3)
    #[error("store not found (searched from {search_root:?})")]
    StoreNotFound { search_root: PathBuf },

    #[error("store already exists at {path:?}")]
    StoreExists { path: PathBuf },

    #[error("rubric not found: {id}")]
    RubricNotFound { id: String },

    #[error("score card not found: {id}")]
    ScoreNotFound { id: String },

    #[error("course not found: {id}")]
    CourseNotFound { id: String },

    #[error("no rubric, score card, or course with id: {id}")]
    DocumentNotFound { id: String },

    #[error("student {student_id} is not enrolled in course {course_id}")]
    StudentNotFound {
        student_id: String,
        course_id: String,
    },

    #[error("invalid document {path:?}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("rubric {id} failed validation: duplicate ids {duplicates:?}")]
    RubricInvalid { id: String, duplicates: Vec<String> },

    // Structural integrity errors (exit code 3): the rubric and its score
    // card have diverged in a way reconciliation should have repaired.
    #[error("no rubric item matches score itemId {item_id}")]
    ItemNotFound { item_id: String },

    #[error("no rubric category matches score categoryId {category_id}")]
    CategoryNotFound { category_id: String },

    #[error("item {expected} scored against itemId {found}")]
    ItemMismatch { expected: String, found: String },

    #[error("category {expected} scored against categoryId {found}")]
    CategoryMismatch { expected: String, found: String },

    #[error("{context}: rubric defines {expected} entries but score card has {found}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("item {item_id} has sub-items but its score node does not")]
    MissingSubItemScores { item_id: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

impl TallyError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            // Usage errors
            TallyError::UnknownFormat(_)
            | TallyError::UnknownIdScheme(_)
            | TallyError::UnknownScoreType(_)
            | TallyError::UnknownScoreValue(_)
            | TallyError::UsageError(_) => ExitCode::Usage,

            // Data/store errors
            TallyError::StoreNotFound { .. }
            | TallyError::StoreExists { .. }
            | TallyError::RubricNotFound { .. }
            | TallyError::ScoreNotFound { .. }
            | TallyError::CourseNotFound { .. }
            | TallyError::DocumentNotFound { .. }
            | TallyError::StudentNotFound { .. }
            | TallyError::InvalidDocument { .. }
            | TallyError::RubricInvalid { .. }
            | TallyError::ItemNotFound { .. }
            | TallyError::CategoryNotFound { .. }
            | TallyError::ItemMismatch { .. }
            | TallyError::CategoryMismatch { .. }
            | TallyError::ShapeMismatch { .. }
            | TallyError::MissingSubItemScores { .. } => ExitCode::Data,

            // Generic failures
            TallyError::Io(_)
            | TallyError::Json(_)
            | TallyError::Toml(_)
            | TallyError::TomlWrite(_)
            | TallyError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            TallyError::UnknownFormat(_) => "unknown_format",
            TallyError::UnknownIdScheme(_) => "unknown_id_scheme",
            TallyError::UnknownScoreType(_) => "unknown_score_type",
            TallyError::UnknownScoreValue(_) => "unknown_score_value",
            TallyError::UsageError(_) => "usage_error",
            TallyError::StoreNotFound { .. } => "store_not_found",
            TallyError::StoreExists { .. } => "store_exists",
            TallyError::RubricNotFound { .. } => "rubric_not_found",
            TallyError::ScoreNotFound { .. } => "score_not_found",
            TallyError::CourseNotFound { .. } => "course_not_found",
            TallyError::DocumentNotFound { .. } => "document_not_found",
            TallyError::StudentNotFound { .. } => "student_not_found",
            TallyError::InvalidDocument { .. } => "invalid_document",
            TallyError::RubricInvalid { .. } => "rubric_invalid",
            TallyError::ItemNotFound { .. } => "item_not_found",
            TallyError::CategoryNotFound { .. } => "category_not_found",
            TallyError::ItemMismatch { .. } => "item_mismatch",
            TallyError::CategoryMismatch { .. } => "category_mismatch",
            TallyError::ShapeMismatch { .. } => "shape_mismatch",
            TallyError::MissingSubItemScores { .. } => "missing_sub_item_scores",
            TallyError::Io(_) => "io_error",
            TallyError::Json(_) => "json_error",
            TallyError::Toml(_) => "toml_error",
            TallyError::TomlWrite(_) => "toml_error",
            TallyError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for tally operations
pub type Result<T> = std::result::Result<T, TallyError>;
