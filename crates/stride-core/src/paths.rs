use crate::error::{Result, StrideError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const STRIDE_DIR: &str = ".stride";
pub const TENANTS_DIR: &str = ".stride/tenants";

pub const CONFIG_FILE: &str = ".stride/config.yaml";

pub const TENANT_FILE: &str = "tenant.yaml";
pub const POSTS_FILE: &str = "posts.yaml";
pub const MANIFEST_FILE: &str = "manifest.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn stride_dir(root: &Path) -> PathBuf {
    root.join(STRIDE_DIR)
}

pub fn tenants_dir(root: &Path) -> PathBuf {
    root.join(TENANTS_DIR)
}

pub fn tenant_dir(root: &Path, tenant: &str) -> PathBuf {
    tenants_dir(root).join(tenant)
}

pub fn tenant_manifest(root: &Path, tenant: &str) -> PathBuf {
    tenant_dir(root, tenant).join(TENANT_FILE)
}

pub fn posts_path(root: &Path, tenant: &str) -> PathBuf {
    tenant_dir(root, tenant).join(POSTS_FILE)
}

pub fn strategies_dir(root: &Path, tenant: &str) -> PathBuf {
    tenant_dir(root, tenant).join("strategies")
}

pub fn strategy_dir(root: &Path, tenant: &str, slug: &str) -> PathBuf {
    strategies_dir(root, tenant).join(slug)
}

pub fn strategy_manifest(root: &Path, tenant: &str, slug: &str) -> PathBuf {
    strategy_dir(root, tenant, slug).join(MANIFEST_FILE)
}

pub fn scores_dir(root: &Path, tenant: &str, strategy: &str) -> PathBuf {
    tenant_dir(root, tenant).join("scores").join(strategy)
}

/// One manifest per (tenant, strategy, year, month) — the file path is the
/// uniqueness constraint for score upserts.
pub fn score_path(root: &Path, tenant: &str, strategy: &str, year: i32, month: u32) -> PathBuf {
    scores_dir(root, tenant, strategy).join(format!("{year:04}-{month:02}.yaml"))
}

pub fn milestones_dir(root: &Path, tenant: &str) -> PathBuf {
    tenant_dir(root, tenant).join("milestones")
}

/// One manifest per (tenant, milestone id) — create-if-missing on this path
/// is the idempotency guard for detection.
pub fn milestone_path(root: &Path, tenant: &str, id: &str) -> PathBuf {
    milestones_dir(root, tenant).join(format!("{id}.yaml"))
}

pub fn feed_dir(root: &Path, tenant: &str) -> PathBuf {
    tenant_dir(root, tenant).join("feed")
}

pub fn feed_post_path(root: &Path, tenant: &str, post_id: &str) -> PathBuf {
    feed_dir(root, tenant).join(format!("{post_id}.yaml"))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(StrideError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

pub fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(StrideError::InvalidMonth(month));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        for slug in ["summer-launch", "a", "q3-content-push", "x1"] {
            validate_slug(slug).unwrap_or_else(|_| panic!("expected valid: {slug}"));
        }
    }

    #[test]
    fn invalid_slugs() {
        for slug in [
            "",
            "-starts-with-dash",
            "ends-with-dash-",
            "has spaces",
            "UPPER",
            "a_b",
        ] {
            assert!(validate_slug(slug).is_err(), "expected invalid: {slug}");
        }
    }

    #[test]
    fn month_bounds() {
        validate_month(1).unwrap();
        validate_month(12).unwrap();
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.stride/config.yaml")
        );
        assert_eq!(
            strategy_manifest(root, "acme", "summer-launch"),
            PathBuf::from("/tmp/proj/.stride/tenants/acme/strategies/summer-launch/manifest.yaml")
        );
        assert_eq!(
            score_path(root, "acme", "summer-launch", 2025, 6),
            PathBuf::from("/tmp/proj/.stride/tenants/acme/scores/summer-launch/2025-06.yaml")
        );
        assert_eq!(
            milestone_path(root, "acme", "ten-tasks-done"),
            PathBuf::from("/tmp/proj/.stride/tenants/acme/milestones/ten-tasks-done.yaml")
        );
    }
}
