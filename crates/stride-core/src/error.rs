use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrideError {
    #[error("not initialized: run 'stride init'")]
    NotInitialized,

    #[error("tenant not found: {0}")]
    TenantNotFound(String),

    #[error("tenant already exists: {0}")]
    TenantExists(String),

    #[error("strategy not found: {0}")]
    StrategyNotFound(String),

    #[error("strategy already exists: {0}")]
    StrategyExists(String),

    #[error("no active strategy for tenant '{0}'")]
    NoActiveStrategy(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("milestone not found: {0}")]
    MilestoneNotFound(String),

    #[error("no score stored for {strategy} {year:04}-{month:02}")]
    ScoreNotFound {
        strategy: String,
        year: i32,
        month: u32,
    },

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid month {0}: must be 1-12")]
    InvalidMonth(u32),

    #[error("invalid UTC offset: {0} minutes")]
    InvalidUtcOffset(i32),

    #[error("invalid progress {0}: must be 0-100")]
    InvalidProgress(u32),

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("invalid task order: {0}")]
    InvalidTaskOrder(String),

    #[error("feed publish failed: {0}")]
    FeedUnavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StrideError>;
