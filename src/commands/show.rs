//! `tally show` command - display a rubric, score card, or course
//!
//! Score cards render joined with their rubric so item names appear next
//! to the grader's marks, using whatever computed-score caches the card
//! already carries (no rescoring).

use crate::cli::{Cli, OutputFormat};
use crate::commands::course::print_course;
use crate::commands::helpers::format_score;
use tally_core::error::{Result, TallyError};
use tally_core::rubric::{find_category_score, find_item_score, Rubric, RubricItem, RubricScore};
use tally_core::store::Store;

/// Execute the show command
pub fn execute(cli: &Cli, store: &Store, id: &str) -> Result<()> {
    match store.load_rubric(id) {
        Ok(rubric) => return show_rubric(cli, &rubric),
        Err(TallyError::RubricNotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    match store.load_score(id) {
        Ok(score) => {
            let rubric = store.load_rubric(&score.rubric_id)?;
            return show_score(cli, &rubric, &score);
        }
        Err(TallyError::ScoreNotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    match store.load_course(id) {
        Ok(course) => return print_course(cli, &course),
        Err(TallyError::CourseNotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    Err(TallyError::DocumentNotFound { id: id.to_string() })
}

fn show_rubric(cli: &Cli, rubric: &Rubric) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rubric)?);
        }
        OutputFormat::Human => {
            println!("rubric {} {}", rubric.id, rubric.name);
            for category in &rubric.categories {
                println!();
                println!("{} ({})", category.name, category.id);
                for item in &category.items {
                    print_rubric_item(item, 1);
                }
            }
        }
    }
    Ok(())
}

fn print_rubric_item(item: &RubricItem, depth: usize) {
    let indent = "  ".repeat(depth);
    if item.is_group() {
        println!("{}{} {}", indent, item.id, item.name);
        for sub_item in item.sub_items.iter().flatten() {
            print_rubric_item(sub_item, depth + 1);
        }
    } else {
        println!(
            "{}{} {} ({}, {} pts{})",
            indent,
            item.id,
            item.name,
            item.score_type,
            item.point_value,
            match item.score_value {
                tally_core::rubric::ScoreValue::Points => String::new(),
                other => format!(", {}", other),
            }
        );
    }
}

fn show_score(cli: &Cli, rubric: &Rubric, card: &RubricScore) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(card)?);
        }
        OutputFormat::Human => {
            println!("score card {} {}", card.id, card.name);
            if let Some(student) = &card.student_name {
                println!("student: {}", student);
            }
            if let Some(course) = &card.course_name {
                println!("course: {}", course);
            }
            if let Some(grader) = &card.grader {
                println!("grader: {}", grader);
            }
            if let Some(total) = card.computed_score {
                println!("total: {}", format_score(total));
            }
            if let Some(comments) = &card.comments {
                println!("comments: {}", comments);
            }

            for category in &rubric.categories {
                println!();
                let category_score = find_category_score(card, &category.id);
                match category_score.and_then(|c| c.computed_score) {
                    Some(subtotal) => {
                        println!("{} {}", category.name, format_score(subtotal));
                    }
                    None => println!("{}", category.name),
                }
                if let Some(comments) = category_score.and_then(|c| c.comments.as_deref()) {
                    println!("  comments: {}", comments);
                }
                for item in &category.items {
                    print_item_score(item, card, 1);
                }
            }
        }
    }
    Ok(())
}

fn print_item_score(item: &RubricItem, card: &RubricScore, depth: usize) {
    let indent = "  ".repeat(depth);
    let node = find_item_score(card, &item.id);

    if item.is_group() {
        match node.and_then(|n| n.computed_score) {
            Some(subtotal) => println!("{}{} {}", indent, item.name, format_score(subtotal)),
            None => println!("{}{}", indent, item.name),
        }
        for sub_item in item.sub_items.iter().flatten() {
            print_item_score(sub_item, card, depth + 1);
        }
        return;
    }

    let mark = match node.and_then(|n| n.computed_score) {
        Some(computed) => format!("[{}/{}]", computed.score, computed.point_value),
        None => match node.and_then(|n| n.score) {
            Some(raw) => format!("[raw {}]", raw),
            None => "[ - ]".to_string(),
        },
    };
    match node.and_then(|n| n.comments.as_deref()) {
        Some(comments) => println!("{}{} {} \"{}\"", indent, mark, item.name, comments),
        None => println!("{}{} {}", indent, mark, item.name),
    }
}
