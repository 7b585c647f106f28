//! `tally course` commands - roster management

use crate::cli::{Cli, OutputFormat};
use tally_core::course::{Course, Student};
use tally_core::error::Result;
use tally_core::id;
use tally_core::store::Store;

/// Execute `course new`
pub fn execute_new(cli: &Cli, store: &Store, name: &str) -> Result<()> {
    let existing = store.existing_ids()?;
    let mut course = Course::new(name);
    course.id = id::generate(store.config().id_scheme, name, &existing);

    store.save_course(&course)?;
    tracing::debug!(id = %course.id, "created course");

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&course)?);
        }
        OutputFormat::Human => {
            println!("{}", course.id);
        }
    }
    Ok(())
}

/// Execute `course enroll`
pub fn execute_enroll(
    cli: &Cli,
    store: &Store,
    course_id: &str,
    name: &str,
    github: Option<&str>,
) -> Result<()> {
    let mut course = store.load_course(course_id)?;

    let mut student = Student::new(name);
    if let Some(github) = github {
        student = student.with_github_username(github);
    }
    let student_id = student.id.clone();

    course.enroll(student);
    store.save_course(&course)?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "courseId": course.id,
                "studentId": student_id,
                "students": course.students.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("{}", student_id);
        }
    }
    Ok(())
}

/// Execute `course assign`
pub fn execute_assign(cli: &Cli, store: &Store, course_id: &str, rubric_id: &str) -> Result<()> {
    let mut course = store.load_course(course_id)?;
    let rubric = store.load_rubric(rubric_id)?;

    course.assign_rubric(rubric.id.as_str(), rubric.name.as_str());
    store.save_course(&course)?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "courseId": course.id,
                "rubricId": rubric.id,
                "rubrics": course.rubrics.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("{}", course.id);
        }
    }
    Ok(())
}

/// Execute `course show`
pub fn execute_show(cli: &Cli, store: &Store, id: &str) -> Result<()> {
    let course = store.load_course(id)?;
    print_course(cli, &course)
}

/// Render a course, shared with the generic `show` command
pub fn print_course(cli: &Cli, course: &Course) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(course)?);
        }
        OutputFormat::Human => {
            println!("course {} {}", course.id, course.name);
            if !course.students.is_empty() {
                println!("students:");
                for student in &course.students {
                    match &student.github_username {
                        Some(github) => {
                            println!("  {} {} ({})", student.id, student.name, github)
                        }
                        None => println!("  {} {}", student.id, student.name),
                    }
                }
            }
            if !course.rubrics.is_empty() {
                println!("rubrics:");
                for rubric in &course.rubrics {
                    println!("  {} {}", rubric.id, rubric.name);
                }
            }
        }
    }
    Ok(())
}
