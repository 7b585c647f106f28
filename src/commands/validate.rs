//! `tally validate` command - check rubrics for duplicate ids
//!
//! Prints a report for one or all rubrics, then exits nonzero when any
//! rubric is invalid.

use serde::Serialize;

use crate::cli::{Cli, OutputFormat};
use tally_core::error::{Result, TallyError};
use tally_core::rubric::{validate_rubric, Rubric};
use tally_core::store::Store;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RubricReport {
    id: String,
    name: String,
    valid: bool,
    duplicate_item_ids: Vec<String>,
    duplicate_category_ids: Vec<String>,
}

/// Execute the validate command
pub fn execute(cli: &Cli, store: &Store, id: Option<&str>) -> Result<()> {
    let rubrics = match id {
        Some(id) => vec![store.load_rubric(id)?],
        None => store.list_rubrics()?,
    };

    let reports: Vec<RubricReport> = rubrics.iter().map(report_for).collect();

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Human => {
            for report in &reports {
                if report.valid {
                    if !cli.quiet {
                        println!("ok {} {}", report.id, report.name);
                    }
                } else {
                    println!("invalid {} {}", report.id, report.name);
                    for duplicate in &report.duplicate_item_ids {
                        println!("  duplicate item id: {}", duplicate);
                    }
                    for duplicate in &report.duplicate_category_ids {
                        println!("  duplicate category id: {}", duplicate);
                    }
                }
            }
        }
    }

    if let Some(bad) = reports.into_iter().find(|r| !r.valid) {
        let mut duplicates = bad.duplicate_item_ids;
        duplicates.extend(bad.duplicate_category_ids);
        return Err(TallyError::RubricInvalid {
            id: bad.id,
            duplicates,
        });
    }

    Ok(())
}

fn report_for(rubric: &Rubric) -> RubricReport {
    let validation = validate_rubric(rubric);
    RubricReport {
        id: rubric.id.clone(),
        name: rubric.name.clone(),
        valid: validation.valid,
        duplicate_item_ids: validation.duplicate_item_ids,
        duplicate_category_ids: validation.duplicate_category_ids,
    }
}
