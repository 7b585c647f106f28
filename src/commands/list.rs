//! `tally list` command - list stored documents
//!
//! - `--rubrics` / `--scores` / `--courses` filters
//! - `--since` filter
//! - Deterministic ordering (by created, then id)

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::cli::{Cli, OutputFormat};
use tally_core::error::Result;
use tally_core::store::Store;

/// Which document kinds to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    Rubrics,
    Scores,
    Courses,
}

impl Selection {
    pub fn from_flags(rubrics: bool, scores: bool, courses: bool) -> Self {
        match (rubrics, scores, courses) {
            (true, _, _) => Selection::Rubrics,
            (_, true, _) => Selection::Scores,
            (_, _, true) => Selection::Courses,
            _ => Selection::All,
        }
    }

    fn includes_rubrics(self) -> bool {
        matches!(self, Selection::All | Selection::Rubrics)
    }

    fn includes_scores(self) -> bool {
        matches!(self, Selection::All | Selection::Scores)
    }

    fn includes_courses(self) -> bool {
        matches!(self, Selection::All | Selection::Courses)
    }
}

struct Row {
    kind: &'static str,
    id: String,
    label: String,
    stamp: Option<DateTime<Utc>>,
    detail: serde_json::Value,
}

/// Execute the list command
pub fn execute(
    cli: &Cli,
    store: &Store,
    selection: Selection,
    since: Option<DateTime<Utc>>,
) -> Result<()> {
    let mut rows: Vec<Row> = Vec::new();

    if selection.includes_rubrics() {
        for rubric in store.list_rubrics()? {
            rows.push(Row {
                kind: "rubric",
                id: rubric.id.clone(),
                label: rubric.name.clone(),
                stamp: rubric.created_at,
                detail: json!({
                    "kind": "rubric",
                    "id": rubric.id,
                    "name": rubric.name,
                    "categories": rubric.categories.len(),
                    "created": rubric.created_at,
                }),
            });
        }
    }

    if selection.includes_scores() {
        for score in store.list_scores()? {
            let label = match &score.student_name {
                Some(student) => format!("{} ({})", score.name, student),
                None => score.name.clone(),
            };
            rows.push(Row {
                kind: "score",
                id: score.id.clone(),
                label,
                stamp: score.updated_at.or(score.created_at),
                detail: json!({
                    "kind": "score",
                    "id": score.id,
                    "name": score.name,
                    "rubricId": score.rubric_id,
                    "studentName": score.student_name,
                    "courseName": score.course_name,
                    "total": score.computed_score,
                    "created": score.created_at,
                    "updated": score.updated_at,
                }),
            });
        }
    }

    if selection.includes_courses() {
        for course in store.list_courses()? {
            rows.push(Row {
                kind: "course",
                id: course.id.clone(),
                label: course.name.clone(),
                stamp: course.created_at,
                detail: json!({
                    "kind": "course",
                    "id": course.id,
                    "name": course.name,
                    "students": course.students.len(),
                    "rubrics": course.rubrics.len(),
                    "created": course.created_at,
                }),
            });
        }
    }

    if let Some(since) = since {
        rows.retain(|row| row.stamp.is_some_and(|stamp| stamp >= since));
    }

    match cli.format {
        OutputFormat::Json => {
            let output: Vec<_> = rows.into_iter().map(|row| row.detail).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if rows.is_empty() {
                if !cli.quiet {
                    println!("No documents found");
                }
            } else {
                for row in &rows {
                    let indicator = match row.kind {
                        "rubric" => "R",
                        "score" => "S",
                        _ => "C",
                    };
                    println!("{} {} {}", indicator, row.id, row.label);
                }
            }
        }
    }

    Ok(())
}
