//! CLI argument parsing for tally
//!
//! Uses clap for argument parsing.
//! Supports global flags: --root, --store, --format, --quiet, --verbose

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use crate::format::OutputFormat;

/// Tally - rubric-based grading CLI
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for resolving the store
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Explicit store root path
    #[arg(long, global = true, env = "TALLY_STORE")]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (overrides TALLY_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new tally store
    Init {
        /// Use visible store directory (tally/ instead of .tally/)
        #[arg(long)]
        visible: bool,
    },

    /// Author a new rubric
    New {
        /// Rubric name
        name: String,

        /// Add an empty category (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
    },

    /// List stored documents
    List {
        /// Only rubrics
        #[arg(long, conflicts_with_all = ["scores", "courses"])]
        rubrics: bool,

        /// Only score cards
        #[arg(long, conflicts_with = "courses")]
        scores: bool,

        /// Only courses
        #[arg(long)]
        courses: bool,

        /// Only documents created at or after this RFC3339 timestamp
        #[arg(long)]
        since: Option<String>,
    },

    /// Show a rubric, score card, or course
    Show {
        /// Document id
        id: String,
    },

    /// Check rubrics for duplicate ids
    Validate {
        /// Rubric id (checks every rubric when omitted)
        id: Option<String>,
    },

    /// Start an empty score card for a rubric
    Start {
        /// Rubric id
        rubric_id: String,

        /// Student id (resolved against the course roster)
        #[arg(long)]
        student: Option<String>,

        /// Course id (defaults to `default_course` from config)
        #[arg(long)]
        course: Option<String>,
    },

    /// Record a score or comment on a card
    Set {
        /// Score card id
        score_id: String,

        /// Target item id
        #[arg(long, conflicts_with = "category")]
        item: Option<String>,

        /// Target category id (comments only)
        #[arg(long)]
        category: Option<String>,

        /// Raw score to record
        #[arg(long, conflicts_with = "clear_score")]
        score: Option<f64>,

        /// Reset the item to ungraded
        #[arg(long)]
        clear_score: bool,

        /// Comment text to record
        #[arg(long, conflicts_with = "clear_comments")]
        comments: Option<String>,

        /// Remove the existing comment
        #[arg(long)]
        clear_comments: bool,
    },

    /// Reconcile a score card after rubric edits
    Sync {
        /// Score card id
        score_id: String,
    },

    /// Recompute and print a card's aggregate score
    Total {
        /// Score card id
        score_id: String,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        command: CourseCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    /// Create a course
    New {
        /// Course name
        name: String,
    },

    /// Add a student to a course roster
    Enroll {
        /// Course id
        course_id: String,

        /// Student name
        name: String,

        /// GitHub username for submission matching
        #[arg(long)]
        github: Option<String>,
    },

    /// Record a rubric as used by a course
    Assign {
        /// Course id
        course_id: String,

        /// Rubric id
        rubric_id: String,
    },

    /// Show a course roster
    Show {
        /// Course id
        id: String,
    },
}

// Implement ValueEnum for OutputFormat to work with clap
impl ValueEnum for OutputFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[OutputFormat::Human, OutputFormat::Json]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            OutputFormat::Human => Some(clap::builder::PossibleValue::new("human")),
            OutputFormat::Json => Some(clap::builder::PossibleValue::new("json")),
        }
    }
}
