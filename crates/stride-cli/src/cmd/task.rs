use crate::output::print_json;
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use std::path::Path;
use stride_core::strategy::Strategy;
use stride_core::task::{self, ActivityMatch, NewTask};
use stride_core::types::{TaskCategory, TaskPriority};

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Add a task to a strategy
    Add {
        tenant: String,
        strategy: String,
        /// Task title
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "content")]
        category: TaskCategory,
        #[arg(long, default_value = "medium")]
        priority: TaskPriority,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Start a task
    Start {
        tenant: String,
        strategy: String,
        id: String,
    },
    /// Complete a task
    Complete {
        tenant: String,
        strategy: String,
        id: String,
    },
    /// Reopen a done task
    Reopen {
        tenant: String,
        strategy: String,
        id: String,
    },
    /// Move a task to a position (0-based)
    Move {
        tenant: String,
        strategy: String,
        id: String,
        #[arg(long)]
        position: usize,
    },
    /// Set the externally-computed progress value
    Progress {
        tenant: String,
        strategy: String,
        id: String,
        #[arg(long)]
        value: u32,
    },
    /// Record an activity match from the external matcher
    Match {
        tenant: String,
        strategy: String,
        id: String,
        #[arg(long)]
        activity_type: String,
        #[arg(long)]
        activity_id: String,
        #[arg(long, default_value = "1.0")]
        confidence: f64,
        #[arg(long)]
        reason: String,
    },
}

pub fn run(root: &Path, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TaskSubcommand::Add {
            tenant,
            strategy,
            title,
            description,
            category,
            priority,
            start,
            due,
        } => {
            let mut s = Strategy::load(root, &tenant, &strategy)?;
            let id = task::add_task(
                &mut s.tasks,
                NewTask {
                    title,
                    description,
                    category,
                    priority,
                    start_date: start,
                    due_date: due,
                },
            );
            s.touch();
            s.save(root, &tenant)?;
            if json {
                print_json(&serde_json::json!({ "task_id": id }))?;
            } else {
                println!("Added task {id}");
            }
            Ok(())
        }
        TaskSubcommand::Start { tenant, strategy, id } => {
            mutate(root, &tenant, &strategy, &id, json, "started", |tasks, id| {
                task::start_task(tasks, id)
            })
        }
        TaskSubcommand::Complete { tenant, strategy, id } => {
            mutate(root, &tenant, &strategy, &id, json, "completed", |tasks, id| {
                task::complete_task(tasks, id)
            })
        }
        TaskSubcommand::Reopen { tenant, strategy, id } => {
            mutate(root, &tenant, &strategy, &id, json, "reopened", |tasks, id| {
                task::reopen_task(tasks, id)
            })
        }
        TaskSubcommand::Move {
            tenant,
            strategy,
            id,
            position,
        } => mutate(root, &tenant, &strategy, &id, json, "moved", move |tasks, id| {
            task::move_task(tasks, id, position)
        }),
        TaskSubcommand::Progress {
            tenant,
            strategy,
            id,
            value,
        } => mutate(
            root,
            &tenant,
            &strategy,
            &id,
            json,
            "progress updated",
            move |tasks, id| task::set_progress(tasks, id, value),
        ),
        TaskSubcommand::Match {
            tenant,
            strategy,
            id,
            activity_type,
            activity_id,
            confidence,
            reason,
        } => mutate(
            root,
            &tenant,
            &strategy,
            &id,
            json,
            "match recorded",
            move |tasks, id| {
                task::record_match(
                    tasks,
                    id,
                    ActivityMatch {
                        activity_type,
                        activity_id,
                        matched_at: Utc::now(),
                        confidence,
                        match_reason: reason,
                    },
                )
            },
        ),
    }
}

fn mutate<F>(
    root: &Path,
    tenant: &str,
    strategy: &str,
    id: &str,
    json: bool,
    verb: &str,
    op: F,
) -> anyhow::Result<()>
where
    F: FnOnce(&mut Vec<stride_core::task::Task>, &str) -> stride_core::Result<()>,
{
    let mut s = Strategy::load(root, tenant, strategy)?;
    op(&mut s.tasks, id)?;
    s.touch();
    s.save(root, tenant)?;

    if json {
        let updated = task::find(&s.tasks, id)?;
        print_json(updated)?;
    } else {
        println!("Task {id} {verb}");
    }
    Ok(())
}
