use crate::error::{Result, StrideError};
use crate::paths;
use crate::task::Task;
use crate::types::{StrategyStatus, TaskCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// A named marketing plan owned by a tenant, carrying its ordered tasks.
/// At most one strategy per tenant is `active`; `activate` archives the
/// others before flipping the target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: StrategyStatus,
    /// Categories this plan covers; posts in these categories count toward
    /// the production factor when the classifier has not stamped a strategy.
    #[serde(default)]
    pub categories: Vec<TaskCategory>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Strategy {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            title: title.into(),
            description: None,
            status: StrategyStatus::Paused,
            categories: Vec::new(),
            keywords: Vec::new(),
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
            activated_at: None,
            archived_at: None,
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn create(
        root: &Path,
        tenant: &str,
        slug: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;
        crate::tenant::Tenant::load(root, tenant)?;

        let dir = paths::strategy_dir(root, tenant, &slug);
        if dir.exists() {
            return Err(StrideError::StrategyExists(slug));
        }

        let strategy = Self::new(slug, title);
        strategy.save(root, tenant)?;
        Ok(strategy)
    }

    pub fn load(root: &Path, tenant: &str, slug: &str) -> Result<Self> {
        let manifest = paths::strategy_manifest(root, tenant, slug);
        if !manifest.exists() {
            return Err(StrideError::StrategyNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let strategy: Strategy = serde_yaml::from_str(&data)?;
        Ok(strategy)
    }

    pub fn save(&self, root: &Path, tenant: &str) -> Result<()> {
        let manifest = paths::strategy_manifest(root, tenant, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path, tenant: &str) -> Result<Vec<Self>> {
        let dir = paths::strategies_dir(root, tenant);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut strategies = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, tenant, &slug) {
                    Ok(s) => strategies.push(s),
                    Err(StrideError::StrategyNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        strategies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(strategies)
    }

    /// The tenant's single active strategy.
    pub fn active(root: &Path, tenant: &str) -> Result<Self> {
        Self::list(root, tenant)?
            .into_iter()
            .find(|s| s.status == StrategyStatus::Active)
            .ok_or_else(|| StrideError::NoActiveStrategy(tenant.to_string()))
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Activate `slug`, archiving every other active strategy of the tenant
    /// in the same pass. Siblings are written before the target so a crash
    /// can leave zero active strategies but never two.
    pub fn activate(root: &Path, tenant: &str, slug: &str) -> Result<Self> {
        let mut target = Self::load(root, tenant, slug)?;

        for mut sibling in Self::list(root, tenant)? {
            if sibling.slug != slug && sibling.status == StrategyStatus::Active {
                sibling.status = StrategyStatus::Archived;
                sibling.archived_at = Some(Utc::now());
                sibling.updated_at = Utc::now();
                sibling.save(root, tenant)?;
            }
        }

        target.status = StrategyStatus::Active;
        target.activated_at = Some(Utc::now());
        target.archived_at = None;
        target.updated_at = Utc::now();
        target.save(root, tenant)?;
        Ok(target)
    }

    pub fn pause(root: &Path, tenant: &str, slug: &str) -> Result<Self> {
        let mut target = Self::load(root, tenant, slug)?;
        if target.status == StrategyStatus::Archived {
            return Err(StrideError::InvalidTransition {
                from: target.status.to_string(),
                to: StrategyStatus::Paused.to_string(),
                reason: "archived strategies can only be re-activated".into(),
            });
        }
        target.status = StrategyStatus::Paused;
        target.updated_at = Utc::now();
        target.save(root, tenant)?;
        Ok(target)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
