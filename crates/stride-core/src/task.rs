use crate::error::{Result, StrideError};
use crate::types::{TaskCategory, TaskPriority, TaskStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ActivityMatch
// ---------------------------------------------------------------------------

/// A content activity the external matcher linked to a task. Stored as a
/// structured list on the task, one record per match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityMatch {
    pub activity_type: String,
    pub activity_id: String,
    pub matched_at: DateTime<Utc>,
    pub confidence: f64,
    pub match_reason: String,
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: TaskCategory,
    #[serde(default)]
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Set iff status is `done`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub sort_order: u32,
    /// 0-100, written by the external activity matcher. Independent of
    /// status: neither field is derived from the other.
    #[serde(default)]
    pub progress: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_activities: Vec<ActivityMatch>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a task; doubles as the API request body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: TaskCategory,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(new: NewTask, sort_order: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            category: new.category,
            priority: new.priority,
            status: TaskStatus::Todo,
            start_date: new.start_date,
            due_date: new.due_date,
            completed_at: None,
            sort_order,
            progress: 0,
            matched_activities: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Task list operations (operate on a mutable Vec<Task>)
// ---------------------------------------------------------------------------

pub fn add_task(tasks: &mut Vec<Task>, new: NewTask) -> String {
    let order = tasks.iter().map(|t| t.sort_order + 1).max().unwrap_or(0);
    let task = Task::new(new, order);
    let id = task.id.clone();
    tasks.push(task);
    id
}

pub fn start_task(tasks: &mut [Task], id: &str) -> Result<()> {
    let task = find_mut(tasks, id)?;
    if task.status == TaskStatus::Done {
        return Err(StrideError::InvalidTransition {
            from: task.status.to_string(),
            to: TaskStatus::InProgress.to_string(),
            reason: "reopen the task first".into(),
        });
    }
    task.status = TaskStatus::InProgress;
    Ok(())
}

pub fn complete_task(tasks: &mut [Task], id: &str) -> Result<()> {
    complete_task_at(tasks, id, Utc::now())
}

/// Completion with an explicit timestamp; the aggregator tests and backfill
/// imports go through this.
pub fn complete_task_at(tasks: &mut [Task], id: &str, at: DateTime<Utc>) -> Result<()> {
    let task = find_mut(tasks, id)?;
    task.status = TaskStatus::Done;
    task.completed_at = Some(at);
    Ok(())
}

/// Put a finished task back in play. Clears `completed_at` so the
/// completed-iff-done invariant holds.
pub fn reopen_task(tasks: &mut [Task], id: &str) -> Result<()> {
    let task = find_mut(tasks, id)?;
    if task.status != TaskStatus::Done {
        return Err(StrideError::InvalidTransition {
            from: task.status.to_string(),
            to: TaskStatus::Todo.to_string(),
            reason: "only done tasks can be reopened".into(),
        });
    }
    task.status = TaskStatus::Todo;
    task.completed_at = None;
    Ok(())
}

pub fn set_progress(tasks: &mut [Task], id: &str, progress: u32) -> Result<()> {
    if progress > 100 {
        return Err(StrideError::InvalidProgress(progress));
    }
    let task = find_mut(tasks, id)?;
    task.progress = progress;
    Ok(())
}

pub fn record_match(tasks: &mut [Task], id: &str, m: ActivityMatch) -> Result<()> {
    let task = find_mut(tasks, id)?;
    task.matched_activities.push(m);
    Ok(())
}

/// Move `id` to `to_index` (0-based) in sort order, clamped to the valid
/// range, then renumber. Last write wins between concurrent drags.
pub fn move_task(tasks: &mut Vec<Task>, id: &str, to_index: usize) -> Result<()> {
    tasks.sort_by_key(|t| t.sort_order);
    let from = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| StrideError::TaskNotFound(id.to_string()))?;

    let last = tasks.len() - 1;
    let to = to_index.min(last);
    let task = tasks.remove(from);
    tasks.insert(to, task);
    renumber(tasks);
    Ok(())
}

/// Replace the full sort order with `ordered`. Every task id must appear
/// exactly once.
pub fn reorder_tasks(tasks: &mut [Task], ordered: &[&str]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for &id in ordered {
        if !seen.insert(id) {
            return Err(StrideError::InvalidTaskOrder(format!(
                "duplicate id in order list: '{id}'"
            )));
        }
    }

    let existing: std::collections::HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    for &id in ordered {
        if !existing.contains(id) {
            return Err(StrideError::InvalidTaskOrder(format!(
                "'{id}' is not in this strategy"
            )));
        }
    }
    for t in tasks.iter() {
        if !seen.contains(t.id.as_str()) {
            return Err(StrideError::InvalidTaskOrder(format!(
                "missing id in order list: '{}'",
                t.id
            )));
        }
    }

    for t in tasks.iter_mut() {
        // Position lookup is safe: both sets were just checked equal.
        if let Some(pos) = ordered.iter().position(|&id| id == t.id) {
            t.sort_order = pos as u32;
        }
    }
    Ok(())
}

fn renumber(tasks: &mut [Task]) {
    for (i, t) in tasks.iter_mut().enumerate() {
        t.sort_order = i as u32;
    }
}

/// Human-readable summary: "3/5 done, 1 in progress"
pub fn summarize(tasks: &[Task]) -> String {
    let total = tasks.len();
    let done = tasks
        .iter()
        .filter(|t| matches!(t.status, TaskStatus::Done))
        .count();
    let in_progress = tasks
        .iter()
        .filter(|t| matches!(t.status, TaskStatus::InProgress))
        .count();
    format!("{done}/{total} done, {in_progress} in progress")
}

fn find_mut<'a>(tasks: &'a mut [Task], id: &str) -> Result<&'a mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| StrideError::TaskNotFound(id.to_string()))
}

pub fn find<'a>(tasks: &'a [Task], id: &str) -> Result<&'a Task> {
    tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| StrideError::TaskNotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
