use crate::aggregate::RawData;
use crate::config::{ConsistencyConfig, ScoreWeights};
use crate::error::Result;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// FactorScores
// ---------------------------------------------------------------------------

/// The five 0-100 sub-scores feeding the overall monthly score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorScores {
    pub completion: u32,
    pub on_time: u32,
    pub consistency: u32,
    pub adherence: u32,
    pub production: u32,
}

/// Percentage of `num` over `den`, rounded; 0 when the denominator is 0.
fn ratio(num: u32, den: u32) -> u32 {
    if den == 0 {
        return 0;
    }
    (100.0 * f64::from(num) / f64::from(den)).round() as u32
}

pub fn compute_factors(raw: &RawData, consistency: &ConsistencyConfig) -> FactorScores {
    let base_consistency = ratio(raw.active_days, raw.total_days_in_period);
    let excess_gap = raw.max_gap_days.saturating_sub(consistency.max_gap_days);
    let penalty = excess_gap.saturating_mul(consistency.gap_penalty_per_day);

    FactorScores {
        completion: ratio(raw.completed_tasks, raw.total_tasks),
        on_time: ratio(raw.on_time_tasks, raw.tasks_with_due_date),
        consistency: base_consistency.saturating_sub(penalty).min(100),
        adherence: ratio(raw.tasks_completed_in_order, raw.total_ordered_tasks),
        production: ratio(raw.posts_aligned, raw.posts_created.max(1)),
    }
}

pub fn overall(factors: &FactorScores, weights: &ScoreWeights) -> u32 {
    let weighted = f64::from(factors.completion) * weights.completion
        + f64::from(factors.on_time) * weights.on_time
        + f64::from(factors.consistency) * weights.consistency
        + f64::from(factors.adherence) * weights.adherence
        + f64::from(factors.production) * weights.production;
    (weighted.round() as u32).min(100)
}

/// Month-over-month delta; `None` for a first report, never 0.
pub fn trend(current: u32, previous: Option<u32>) -> Option<i32> {
    previous.map(|p| current as i32 - p as i32)
}

// ---------------------------------------------------------------------------
// MonthlyScore
// ---------------------------------------------------------------------------

/// One stored score per (tenant, strategy, year, month). The manifest path
/// is the uniqueness constraint; rewriting it atomically is the upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyScore {
    pub strategy: String,
    pub year: i32,
    pub month: u32,
    pub overall: u32,
    pub factors: FactorScores,
    pub raw: RawData,
    pub computed_at: DateTime<Utc>,
    #[serde(default)]
    pub shared_to_feed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_post_id: Option<String>,
}

impl MonthlyScore {
    pub fn compute(
        strategy: impl Into<String>,
        year: i32,
        month: u32,
        raw: RawData,
        weights: &ScoreWeights,
        consistency: &ConsistencyConfig,
    ) -> Self {
        let factors = compute_factors(&raw, consistency);
        Self {
            strategy: strategy.into(),
            year,
            month,
            overall: overall(&factors, weights),
            factors,
            raw,
            computed_at: Utc::now(),
            shared_to_feed: false,
            feed_post_id: None,
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn load(
        root: &Path,
        tenant: &str,
        strategy: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<Self>> {
        let path = paths::score_path(root, tenant, strategy, year, month);
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path)?;
        let score: MonthlyScore = serde_yaml::from_str(&data)?;
        Ok(Some(score))
    }

    pub fn save(&self, root: &Path, tenant: &str) -> Result<()> {
        let path = paths::score_path(root, tenant, &self.strategy, self.year, self.month);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// All stored scores for a strategy, oldest first.
    pub fn list(root: &Path, tenant: &str, strategy: &str) -> Result<Vec<Self>> {
        let dir = paths::scores_dir(root, tenant, strategy);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut scores = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let data = std::fs::read_to_string(entry.path())?;
                let score: MonthlyScore = serde_yaml::from_str(&data)?;
                scores.push(score);
            }
        }
        scores.sort_by_key(|s| (s.year, s.month));
        Ok(scores)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
