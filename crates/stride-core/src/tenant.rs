use crate::error::{Result, StrideError};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Tenant
// ---------------------------------------------------------------------------

/// An isolated customer account. Every strategy, score, milestone and post
/// lives under exactly one tenant directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub slug: String,
    pub name: String,
    /// Offset from UTC in minutes; month windows are computed in this
    /// tenant-local time.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    pub created_at: DateTime<Utc>,
}

impl Tenant {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            utc_offset_minutes: 0,
            created_at: Utc::now(),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn create(root: &Path, slug: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        let dir = paths::tenant_dir(root, &slug);
        if dir.exists() {
            return Err(StrideError::TenantExists(slug));
        }

        let tenant = Self::new(slug, name);
        tenant.save(root)?;
        Ok(tenant)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let manifest = paths::tenant_manifest(root, slug);
        if !manifest.exists() {
            return Err(StrideError::TenantNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let tenant: Tenant = serde_yaml::from_str(&data)?;
        Ok(tenant)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::tenant_manifest(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = paths::tenants_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut tenants = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(t) => tenants.push(t),
                    Err(StrideError::TenantNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        tenants.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(tenants)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
