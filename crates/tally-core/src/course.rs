//! Course rosters
//!
//! A course ties a student roster to the rubrics its assignments are
//! graded with. Score cards reference both sides by id, so the course
//! document itself stays small: names here are display snapshots, the
//! rubric documents remain the source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::fresh_id;

/// An id with a display name, for cross-document references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdName {
    pub id: String,
    pub name: String,
}

impl IdName {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        IdName {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One enrolled student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    /// Submission repos are matched on this when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
}

impl Student {
    pub fn new(name: impl Into<String>) -> Self {
        Student {
            id: fresh_id(),
            name: name.into(),
            github_username: None,
        }
    }

    #[must_use]
    pub fn with_github_username(mut self, username: impl Into<String>) -> Self {
        self.github_username = Some(username.into());
        self
    }
}

/// A course: roster plus assigned rubrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub rubrics: Vec<IdName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Course {
    pub fn new(name: impl Into<String>) -> Self {
        Course {
            id: fresh_id(),
            name: name.into(),
            students: Vec::new(),
            rubrics: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }

    /// Add a student to the roster
    pub fn enroll(&mut self, student: Student) {
        self.students.push(student);
    }

    /// Record a rubric as used by this course's assignments
    ///
    /// Re-assigning an already-assigned rubric refreshes the name
    /// snapshot instead of duplicating the entry.
    pub fn assign_rubric(&mut self, id: impl Into<String>, name: impl Into<String>) {
        let id = id.into();
        let name = name.into();
        match self.rubrics.iter_mut().find(|r| r.id == id) {
            Some(existing) => existing.name = name,
            None => self.rubrics.push(IdName::new(id, name)),
        }
    }

    pub fn find_student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    pub fn find_rubric(&self, rubric_id: &str) -> Option<&IdName> {
        self.rubrics.iter().find(|r| r.id == rubric_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enroll_and_find() {
        let mut course = Course::new("Systems Programming");
        let student = Student::new("Ada Lovelace").with_github_username("ada");
        let student_id = student.id.clone();
        course.enroll(student);

        let found = course.find_student(&student_id).unwrap();
        assert_eq!(found.name, "Ada Lovelace");
        assert_eq!(found.github_username.as_deref(), Some("ada"));
        assert!(course.find_student("missing").is_none());
    }

    #[test]
    fn test_assign_rubric_deduplicates() {
        let mut course = Course::new("Systems Programming");
        course.assign_rubric("ty-r1", "Homework 1");
        course.assign_rubric("ty-r2", "Homework 2");
        course.assign_rubric("ty-r1", "Homework 1 (revised)");

        assert_eq!(course.rubrics.len(), 2);
        assert_eq!(
            course.find_rubric("ty-r1").unwrap().name,
            "Homework 1 (revised)"
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let student = Student::new("Grace").with_github_username("ghopper");
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["githubUsername"], "ghopper");

        let bare = serde_json::to_value(Student::new("Linus")).unwrap();
        assert!(bare.get("githubUsername").is_none());
    }
}
