use crate::error::{Result, StrideError};
use crate::feed::FeedPublisher;
use crate::paths;
use crate::score::MonthlyScore;
use crate::strategy::Strategy;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// Milestone
// ---------------------------------------------------------------------------

/// An achievement badge. One manifest per (tenant, id); the id is the rule
/// key, suffixed with the period for rules that re-arm monthly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub key: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub achieved_at: DateTime<Utc>,
    #[serde(default)]
    pub shared_to_feed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_post_id: Option<String>,
}

impl Milestone {
    pub fn load(root: &Path, tenant: &str, id: &str) -> Result<Self> {
        let path = paths::milestone_path(root, tenant, id);
        if !path.exists() {
            return Err(StrideError::MilestoneNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let milestone: Milestone = serde_yaml::from_str(&data)?;
        Ok(milestone)
    }

    pub fn save(&self, root: &Path, tenant: &str) -> Result<()> {
        let path = paths::milestone_path(root, tenant, &self.id);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn list(root: &Path, tenant: &str) -> Result<Vec<Self>> {
        let dir = paths::milestones_dir(root, tenant);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut milestones = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let data = std::fs::read_to_string(entry.path())?;
                let milestone: Milestone = serde_yaml::from_str(&data)?;
                milestones.push(milestone);
            }
        }
        milestones.sort_by(|a, b| a.achieved_at.cmp(&b.achieved_at).then(a.id.cmp(&b.id)));
        Ok(milestones)
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Accumulated tenant activity the milestone rules are judged against.
#[derive(Debug, Clone, Default)]
pub struct History {
    pub year: i32,
    pub month: u32,
    pub completed_tasks: u32,
    pub active_days: u32,
    /// Longest all-time run of consecutive active days.
    pub longest_streak: u32,
    /// Longest run of consecutive active days inside the reporting month.
    pub month_streak: u32,
    pub best_overall: u32,
    pub activated: bool,
}

impl History {
    /// Assemble history from everything stored for the tenant, with streaks
    /// evaluated for the given reporting period.
    pub fn collect(root: &Path, tenant_slug: &str, year: i32, month: u32) -> Result<Self> {
        let tenant = crate::tenant::Tenant::load(root, tenant_slug)?;
        let strategies = Strategy::list(root, tenant_slug)?;

        let mut completed_tasks = 0u32;
        let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
        let offset = chrono::FixedOffset::east_opt(tenant.utc_offset_minutes * 60)
            .ok_or(StrideError::InvalidUtcOffset(tenant.utc_offset_minutes))?;

        let mut activated = false;
        for strategy in &strategies {
            activated = activated || strategy.activated_at.is_some();
            for task in &strategy.tasks {
                if let Some(at) = task.completed_at {
                    completed_tasks += 1;
                    days.insert(at.with_timezone(&offset).date_naive());
                }
            }
        }

        let month_days: Vec<NaiveDate> = days
            .iter()
            .copied()
            .filter(|d| d.year() == year && d.month() == month)
            .collect();

        let mut best_overall = 0u32;
        for strategy in &strategies {
            for score in MonthlyScore::list(root, tenant_slug, &strategy.slug)? {
                best_overall = best_overall.max(score.overall);
            }
        }

        Ok(Self {
            year,
            month,
            completed_tasks,
            active_days: days.len() as u32,
            longest_streak: longest_streak(days.iter().copied()),
            month_streak: longest_streak(month_days.into_iter()),
            best_overall,
            activated,
        })
    }
}

/// Longest run of consecutive dates in an ascending sequence.
fn longest_streak(days: impl IntoIterator<Item = NaiveDate>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for day in days {
        run = match prev {
            Some(p) if p.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }
    longest
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Monthly,
}

pub struct MilestoneRule {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub repeat: Repeat,
    pub predicate: fn(&History) -> bool,
}

impl MilestoneRule {
    /// Manifest id for the given period: the bare key for one-shot rules,
    /// key-year-month for monthly ones.
    fn id_for(&self, history: &History) -> String {
        match self.repeat {
            Repeat::Once => self.key.to_string(),
            Repeat::Monthly => {
                format!("{}-{:04}-{:02}", self.key, history.year, history.month)
            }
        }
    }
}

pub fn rules() -> &'static [MilestoneRule] {
    &[
        MilestoneRule {
            key: "first-activation",
            title: "Strategy live",
            description: "Activated a strategy for the first time",
            icon: "rocket",
            repeat: Repeat::Once,
            predicate: |h| h.activated,
        },
        MilestoneRule {
            key: "first-task-done",
            title: "First task done",
            description: "Completed the first task",
            icon: "check",
            repeat: Repeat::Once,
            predicate: |h| h.completed_tasks >= 1,
        },
        MilestoneRule {
            key: "ten-tasks-done",
            title: "Ten tasks done",
            description: "Completed 10 tasks",
            icon: "medal",
            repeat: Repeat::Once,
            predicate: |h| h.completed_tasks >= 10,
        },
        MilestoneRule {
            key: "fifty-tasks-done",
            title: "Fifty tasks done",
            description: "Completed 50 tasks",
            icon: "trophy",
            repeat: Repeat::Once,
            predicate: |h| h.completed_tasks >= 50,
        },
        MilestoneRule {
            key: "week-streak",
            title: "Week streak",
            description: "Active 7 days in a row this month",
            icon: "fire",
            repeat: Repeat::Monthly,
            predicate: |h| h.month_streak >= 7,
        },
        MilestoneRule {
            key: "thirty-active-days",
            title: "Thirty active days",
            description: "Worked on 30 distinct days",
            icon: "calendar",
            repeat: Repeat::Once,
            predicate: |h| h.active_days >= 30,
        },
        MilestoneRule {
            key: "score-eighty",
            title: "Top form",
            description: "Monthly score reached 80",
            icon: "star",
            repeat: Repeat::Once,
            predicate: |h| h.best_overall >= 80,
        },
    ]
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Evaluate every rule and persist newly-earned badges. Insertion is
/// create-if-missing on the milestone id, so re-running detection on the
/// same history is a no-op and concurrent duplicate runs cannot double-fire.
pub fn detect(root: &Path, tenant: &str, history: &History) -> Result<Vec<Milestone>> {
    let mut earned = Vec::new();
    for rule in rules() {
        if !(rule.predicate)(history) {
            continue;
        }
        let milestone = Milestone {
            id: rule.id_for(history),
            key: rule.key.to_string(),
            title: rule.title.to_string(),
            description: rule.description.to_string(),
            icon: rule.icon.to_string(),
            achieved_at: Utc::now(),
            shared_to_feed: false,
            feed_post_id: None,
        };
        let path = paths::milestone_path(root, tenant, &milestone.id);
        let data = serde_yaml::to_string(&milestone)?;
        if crate::io::write_if_missing(&path, data.as_bytes())? {
            tracing::info!(tenant, milestone = %milestone.id, "milestone earned");
            earned.push(milestone);
        }
    }
    Ok(earned)
}

// ---------------------------------------------------------------------------
// Sharing
// ---------------------------------------------------------------------------

/// One-way share to the feed. The flag is persisted before publishing so a
/// feed outage never rolls it back; sharing an already-shared milestone is
/// a no-op success.
pub fn share(
    root: &Path,
    tenant: &str,
    id: &str,
    feed: &dyn FeedPublisher,
) -> Result<Milestone> {
    let mut milestone = Milestone::load(root, tenant, id)?;
    if milestone.shared_to_feed {
        return Ok(milestone);
    }

    milestone.shared_to_feed = true;
    milestone.save(root, tenant)?;

    let post_id = feed.publish(tenant, &milestone.title, &milestone.description)?;
    milestone.feed_post_id = Some(post_id);
    milestone.save(root, tenant)?;
    Ok(milestone)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
