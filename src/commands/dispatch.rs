//! Command dispatch logic for tally
use std::env;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::cli::{Cli, Commands, CourseCommands};
use crate::commands;
use tally_core::error::{Result, TallyError};
use tally_core::store::Store;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    // Determine the root directory
    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if cli.verbose {
        eprintln!("resolve_root: {:?}", start.elapsed());
    }

    match &cli.command {
        None => handle_no_command(),

        Some(Commands::Init { visible }) => commands::init::execute(cli, &root, *visible),

        Some(Commands::New { name, categories }) => {
            let store = discover_or_open_store(cli, &root)?;
            commands::new::execute(cli, &store, name, categories)
        }

        Some(Commands::List {
            rubrics,
            scores,
            courses,
            since,
        }) => {
            let store = discover_or_open_store(cli, &root)?;
            if cli.verbose {
                eprintln!("discover_store: {:?}", start.elapsed());
            }

            let since_dt = parse_since(since.as_deref())?;
            let kind = commands::list::Selection::from_flags(*rubrics, *scores, *courses);
            commands::list::execute(cli, &store, kind, since_dt)
        }

        Some(Commands::Show { id }) => {
            let store = discover_or_open_store(cli, &root)?;
            commands::show::execute(cli, &store, id)
        }

        Some(Commands::Validate { id }) => {
            let store = discover_or_open_store(cli, &root)?;
            commands::validate::execute(cli, &store, id.as_deref())
        }

        Some(Commands::Start {
            rubric_id,
            student,
            course,
        }) => {
            let store = discover_or_open_store(cli, &root)?;
            commands::start::execute(cli, &store, rubric_id, student.as_deref(), course.as_deref())
        }

        Some(Commands::Set {
            score_id,
            item,
            category,
            score,
            clear_score,
            comments,
            clear_comments,
        }) => {
            let store = discover_or_open_store(cli, &root)?;
            let args = commands::set::SetArgs {
                item: item.as_deref(),
                category: category.as_deref(),
                score: *score,
                clear_score: *clear_score,
                comments: comments.as_deref(),
                clear_comments: *clear_comments,
            };
            commands::set::execute(cli, &store, score_id, &args)
        }

        Some(Commands::Sync { score_id }) => {
            let store = discover_or_open_store(cli, &root)?;
            commands::sync::execute(cli, &store, score_id)
        }

        Some(Commands::Total { score_id }) => {
            let store = discover_or_open_store(cli, &root)?;
            commands::total::execute(cli, &store, score_id)
        }

        Some(Commands::Course { command }) => {
            let store = discover_or_open_store(cli, &root)?;
            handle_course(cli, &store, command)
        }
    }
}

fn handle_course(cli: &Cli, store: &Store, command: &CourseCommands) -> Result<()> {
    match command {
        CourseCommands::New { name } => commands::course::execute_new(cli, store, name),
        CourseCommands::Enroll {
            course_id,
            name,
            github,
        } => commands::course::execute_enroll(cli, store, course_id, name, github.as_deref()),
        CourseCommands::Assign {
            course_id,
            rubric_id,
        } => commands::course::execute_assign(cli, store, course_id, rubric_id),
        CourseCommands::Show { id } => commands::course::execute_show(cli, store, id),
    }
}

fn parse_since(since: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    since
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    TallyError::UsageError(format!("invalid --since date '{}': {}", s, e))
                })
        })
        .transpose()
}

fn discover_or_open_store(cli: &Cli, root: &PathBuf) -> Result<Store> {
    if let Some(path) = &cli.store {
        let resolved = if path.is_absolute() {
            path.clone()
        } else {
            root.join(path)
        };
        Store::open(&resolved)
    } else {
        Store::discover(root)
    }
}

fn handle_no_command() -> Result<()> {
    println!("tally {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("A rubric-based grading CLI.");
    println!();
    println!("Run `tally --help` for usage information.");
    Ok(())
}
