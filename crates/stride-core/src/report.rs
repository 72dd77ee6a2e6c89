use crate::activity;
use crate::config::Config;
use crate::error::{Result, StrideError};
use crate::feed::FeedPublisher;
use crate::milestone::{self, History, Milestone};
use crate::period::MonthWindow;
use crate::score::{self, MonthlyScore};
use crate::strategy::Strategy;
use crate::tenant::Tenant;
use crate::types::{TaskCategory, TaskStatus};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One chart point per day of the reporting month. Derived, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub completed: u32,
}

/// What is still open on the strategy: the "what's left" summary.
#[derive(Debug, Clone, Serialize)]
pub struct RemainingWork {
    pub todo: u32,
    pub in_progress: u32,
    /// Declared strategy categories with no task activity this month.
    pub untouched_categories: Vec<TaskCategory>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub tenant: String,
    pub strategy: String,
    pub strategy_title: String,
    pub year: i32,
    pub month: u32,
    pub score: MonthlyScore,
    pub previous: Option<MonthlyScore>,
    /// Month-over-month delta; absent on a first report.
    pub trend: Option<i32>,
    pub first_report: bool,
    pub milestones: Vec<Milestone>,
    pub new_milestones: Vec<Milestone>,
    pub timeline: Vec<TimelinePoint>,
    pub remaining: RemainingWork,
}

// ---------------------------------------------------------------------------
// Report generation
// ---------------------------------------------------------------------------

/// Build the monthly report for a tenant's strategy (the active one when no
/// slug is given): aggregate, score, upsert, detect milestones, assemble.
///
/// A closed month with a stored score is served from disk; the current month
/// recomputes on every call and atomically replaces its manifest, keeping
/// any share flag it already carried.
pub fn generate(
    root: &Path,
    tenant_slug: &str,
    strategy_slug: Option<&str>,
    year: i32,
    month: u32,
) -> Result<Report> {
    let tenant = Tenant::load(root, tenant_slug)?;
    let strategy = match strategy_slug {
        Some(slug) => Strategy::load(root, tenant_slug, slug)?,
        None => Strategy::active(root, tenant_slug)?,
    };
    let window = MonthWindow::new(year, month, tenant.utc_offset_minutes)?;
    let config = load_config_or_default(root)?;
    let now = Utc::now();

    let existing = MonthlyScore::load(root, tenant_slug, &strategy.slug, year, month)?;
    let score = match existing {
        Some(stored) if window.is_closed(now) => stored,
        existing => {
            let posts = activity::list_posts(root, tenant_slug)?;
            let production = activity::production_counts(&posts, &strategy.slug, &window);
            let raw = crate::aggregate::aggregate(&strategy.tasks, production, &window);
            let mut fresh = MonthlyScore::compute(
                &strategy.slug,
                year,
                month,
                raw,
                &config.weights,
                &config.consistency,
            );
            // A recompute must not undo an earlier share of this month.
            if let Some(prev) = existing {
                fresh.shared_to_feed = prev.shared_to_feed;
                fresh.feed_post_id = prev.feed_post_id;
            }
            fresh.save(root, tenant_slug)?;
            tracing::debug!(
                tenant = tenant_slug,
                strategy = %fresh.strategy,
                year,
                month,
                overall = fresh.overall,
                "monthly score computed"
            );
            fresh
        }
    };

    let (prev_year, prev_month) = window.previous();
    let previous = MonthlyScore::load(root, tenant_slug, &strategy.slug, prev_year, prev_month)?;
    let trend = score::trend(score.overall, previous.as_ref().map(|p| p.overall));

    let history = History::collect(root, tenant_slug, year, month)?;
    let new_milestones = milestone::detect(root, tenant_slug, &history)?;
    let milestones = Milestone::list(root, tenant_slug)?;

    let timeline = timeline(&strategy, &window);
    let remaining = remaining(&strategy, &score);

    Ok(Report {
        tenant: tenant.slug,
        strategy: strategy.slug.clone(),
        strategy_title: strategy.title.clone(),
        year,
        month,
        first_report: previous.is_none(),
        score,
        previous,
        trend,
        milestones,
        new_milestones,
        timeline,
        remaining,
    })
}

fn load_config_or_default(root: &Path) -> Result<Config> {
    match Config::load(root) {
        Ok(cfg) => Ok(cfg),
        Err(StrideError::NotInitialized) => Ok(Config::new("stride")),
        Err(e) => Err(e),
    }
}

fn timeline(strategy: &Strategy, window: &MonthWindow) -> Vec<TimelinePoint> {
    let mut counts = vec![0u32; window.days as usize];
    for task in &strategy.tasks {
        if let Some(at) = task.completed_at {
            if window.contains(at) {
                let day = window.local_date(at);
                if window.contains_day(day) {
                    counts[window.day_index(day)] += 1;
                }
            }
        }
    }
    window
        .dates()
        .zip(counts)
        .map(|(date, completed)| TimelinePoint { date, completed })
        .collect()
}

fn remaining(strategy: &Strategy, score: &MonthlyScore) -> RemainingWork {
    let todo = strategy
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Todo)
        .count() as u32;
    let in_progress = strategy
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::InProgress)
        .count() as u32;
    let untouched_categories = strategy
        .categories
        .iter()
        .copied()
        .filter(|c| !score.raw.task_categories.contains(c))
        .collect();
    RemainingWork {
        todo,
        in_progress,
        untouched_categories,
    }
}

// ---------------------------------------------------------------------------
// Score sharing
// ---------------------------------------------------------------------------

/// Share a stored monthly score to the feed. Same discipline as milestone
/// sharing: flag first, publish best-effort, share-twice is a no-op.
pub fn share_score(
    root: &Path,
    tenant_slug: &str,
    strategy_slug: Option<&str>,
    year: i32,
    month: u32,
    feed: &dyn FeedPublisher,
) -> Result<MonthlyScore> {
    crate::paths::validate_month(month)?;
    let strategy = match strategy_slug {
        Some(slug) => Strategy::load(root, tenant_slug, slug)?,
        None => Strategy::active(root, tenant_slug)?,
    };

    let mut stored = MonthlyScore::load(root, tenant_slug, &strategy.slug, year, month)?.ok_or(
        StrideError::ScoreNotFound {
            strategy: strategy.slug.clone(),
            year,
            month,
        },
    )?;
    if stored.shared_to_feed {
        return Ok(stored);
    }

    stored.shared_to_feed = true;
    stored.save(root, tenant_slug)?;

    let title = format!("{} scored {} in {year:04}-{month:02}", strategy.title, stored.overall);
    let body = format!(
        "completion {} / on-time {} / consistency {} / adherence {} / production {}",
        stored.factors.completion,
        stored.factors.on_time,
        stored.factors.consistency,
        stored.factors.adherence,
        stored.factors.production
    );
    let post_id = feed.publish(tenant_slug, &title, &body)?;
    stored.feed_post_id = Some(post_id);
    stored.save(root, tenant_slug)?;
    Ok(stored)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
