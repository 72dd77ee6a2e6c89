use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// StrategyStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyStatus {
    Active,
    Paused,
    Archived,
}

impl StrategyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyStatus::Active => "active",
            StrategyStatus::Paused => "paused",
            StrategyStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for StrategyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyStatus {
    type Err = crate::error::StrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(StrategyStatus::Active),
            "paused" => Ok(StrategyStatus::Paused),
            "archived" => Ok(StrategyStatus::Archived),
            _ => Err(crate::error::StrideError::InvalidTransition {
                from: "?".into(),
                to: s.to_string(),
                reason: "unknown strategy status".into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// TaskCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Content,
    Social,
    Ads,
    Email,
    Analytics,
}

impl TaskCategory {
    pub fn all() -> &'static [TaskCategory] {
        &[
            TaskCategory::Content,
            TaskCategory::Social,
            TaskCategory::Ads,
            TaskCategory::Email,
            TaskCategory::Analytics,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Content => "content",
            TaskCategory::Social => "social",
            TaskCategory::Ads => "ads",
            TaskCategory::Email => "email",
            TaskCategory::Analytics => "analytics",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = crate::error::StrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content" => Ok(TaskCategory::Content),
            "social" => Ok(TaskCategory::Social),
            "ads" => Ok(TaskCategory::Ads),
            "email" => Ok(TaskCategory::Email),
            "analytics" => Ok(TaskCategory::Analytics),
            _ => Err(crate::error::StrideError::InvalidSlug(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskPriority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = crate::error::StrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(crate::error::StrideError::InvalidSlug(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_roundtrip() {
        for cat in TaskCategory::all() {
            let parsed = TaskCategory::from_str(cat.as_str()).unwrap();
            assert_eq!(*cat, parsed);
        }
    }

    #[test]
    fn category_rejects_unknown() {
        assert!(TaskCategory::from_str("video").is_err());
        assert!(TaskCategory::from_str("").is_err());
    }

    #[test]
    fn strategy_status_roundtrip() {
        for s in ["active", "paused", "archived"] {
            assert_eq!(StrategyStatus::from_str(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn priority_ordering() {
        assert!(TaskPriority::Low < TaskPriority::Medium);
        assert!(TaskPriority::Medium < TaskPriority::High);
    }

    #[test]
    fn status_serde_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
