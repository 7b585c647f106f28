//! `tally start` command - create an empty score card for a rubric

use crate::cli::Cli;
use crate::commands::helpers::print_card_mutation;
use tally_core::course::Course;
use tally_core::error::{Result, TallyError};
use tally_core::id;
use tally_core::rubric::{make_rubric_score, rescore};
use tally_core::store::Store;

/// Execute the start command
pub fn execute(
    cli: &Cli,
    store: &Store,
    rubric_id: &str,
    student: Option<&str>,
    course: Option<&str>,
) -> Result<()> {
    let rubric = store.load_rubric(rubric_id)?;

    let mut card = make_rubric_score(&rubric);
    let existing = store.existing_ids()?;
    card.id = id::generate(store.config().id_scheme, &rubric.name, &existing);
    card.grader = store.config().grader.clone();

    let course_doc = resolve_course(store, course)?;
    if let Some(course_doc) = &course_doc {
        card.course_id = Some(course_doc.id.clone());
        card.course_name = Some(course_doc.name.clone());
    }

    if let Some(student_id) = student {
        card.student_id = Some(student_id.to_string());
        if let Some(course_doc) = &course_doc {
            match course_doc.find_student(student_id) {
                Some(enrolled) => card.student_name = Some(enrolled.name.clone()),
                None => {
                    return Err(TallyError::StudentNotFound {
                        student_id: student_id.to_string(),
                        course_id: course_doc.id.clone(),
                    })
                }
            }
        }
    }

    rescore(&rubric, &mut card)?;
    let path = store.save_score(&mut card)?;
    tracing::debug!(id = %card.id, path = %path.display(), "started score card");

    print_card_mutation(cli, &card)
}

/// Resolve course context: the explicit flag must load, the configured
/// default is best-effort.
fn resolve_course(store: &Store, course: Option<&str>) -> Result<Option<Course>> {
    if let Some(id) = course {
        return store.load_course(id).map(Some);
    }

    match store.config().default_course.as_deref() {
        Some(id) => match store.load_course(id) {
            Ok(course_doc) => Ok(Some(course_doc)),
            Err(TallyError::CourseNotFound { .. }) => {
                tracing::warn!(course = %id, "configured default_course not found");
                Ok(None)
            }
            Err(e) => Err(e),
        },
        None => Ok(None),
    }
}
