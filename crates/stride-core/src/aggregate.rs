use crate::activity::ProductionCounts;
use crate::period::MonthWindow;
use crate::task::Task;
use crate::types::TaskCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// RawData
// ---------------------------------------------------------------------------

/// Counters feeding the score calculator, snapshotted onto each stored
/// monthly score. A strategy with no tasks in the window produces all
/// zeroes; that is a valid month, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawData {
    pub total_tasks: u32,
    pub completed_tasks: u32,

    pub tasks_with_due_date: u32,
    pub on_time_tasks: u32,
    pub late_tasks: u32,

    pub active_days: u32,
    pub total_days_in_period: u32,
    pub max_gap_days: u32,

    pub tasks_completed_in_order: u32,
    pub total_ordered_tasks: u32,

    pub posts_created: u32,
    pub posts_aligned: u32,

    #[serde(default)]
    pub task_categories: Vec<TaskCategory>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Count a strategy's task and production activity for one month window.
///
/// A task is in scope when its completion instant or its due day falls
/// inside the window. Timeliness is judged against the end of the due day
/// in tenant-local time and only for completed tasks carrying a due date;
/// an open overdue task lowers `completion`, not `on_time`.
pub fn aggregate(tasks: &[Task], production: ProductionCounts, window: &MonthWindow) -> RawData {
    let mut raw = RawData {
        total_days_in_period: window.days,
        posts_created: production.created,
        posts_aligned: production.aligned,
        ..RawData::default()
    };

    let in_window: Vec<&Task> = tasks
        .iter()
        .filter(|t| {
            let completed_in = t.completed_at.map(|at| window.contains(at)).unwrap_or(false);
            let due_in = t.due_date.map(|d| window.contains_day(d)).unwrap_or(false);
            completed_in || due_in
        })
        .collect();

    raw.total_tasks = in_window.len() as u32;

    let mut categories: BTreeSet<TaskCategory> = BTreeSet::new();
    let mut day_active = vec![false; window.days as usize];

    for task in &in_window {
        categories.insert(task.category);

        let Some(completed_at) = task.completed_at else {
            continue;
        };

        if window.contains(completed_at) {
            raw.completed_tasks += 1;
            let day = window.local_date(completed_at);
            if window.contains_day(day) {
                day_active[window.day_index(day)] = true;
            }
        }

        if let Some(due) = task.due_date {
            raw.tasks_with_due_date += 1;
            let on_time = window
                .due_deadline(due)
                .map(|deadline| completed_at < deadline)
                .unwrap_or(false);
            if on_time {
                raw.on_time_tasks += 1;
            } else {
                raw.late_tasks += 1;
            }
        }
    }

    raw.active_days = day_active.iter().filter(|d| **d).count() as u32;
    raw.max_gap_days = longest_gap(&day_active);

    let (in_order, ordered) = ordering_adherence(&in_window, window);
    raw.tasks_completed_in_order = in_order;
    raw.total_ordered_tasks = ordered;

    raw.task_categories = categories.into_iter().collect();
    raw
}

/// Longest run of consecutive inactive days.
fn longest_gap(day_active: &[bool]) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    for &active in day_active {
        if active {
            run = 0;
        } else {
            run += 1;
            longest = longest.max(run);
        }
    }
    longest
}

/// Among completed in-window tasks, judge whether each was finished no
/// earlier than every completed lower-positioned sibling. With fewer than
/// two such tasks there is nothing to compare and the factor abstains.
fn ordering_adherence(tasks: &[&Task], window: &MonthWindow) -> (u32, u32) {
    let mut completed: Vec<(u32, chrono::DateTime<chrono::Utc>)> = tasks
        .iter()
        .filter_map(|t| {
            t.completed_at
                .filter(|at| window.contains(*at))
                .map(|at| (t.sort_order, at))
        })
        .collect();

    if completed.len() < 2 {
        return (0, 0);
    }

    completed.sort_by_key(|(order, _)| *order);

    let mut in_order = 1u32; // the lowest-positioned completion is trivially in order
    let mut max_seen = completed[0].1;
    for &(_, at) in &completed[1..] {
        if at >= max_seen {
            in_order += 1;
        }
        max_seen = max_seen.max(at);
    }
    (in_order, completed.len() as u32)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
