use crate::error::Result;
use crate::paths;
use crate::period::MonthWindow;
use crate::types::TaskCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// PostActivity
// ---------------------------------------------------------------------------

/// A piece of published content recorded for a tenant. The `strategy` slug
/// is stamped by the external classifier when the post aligns with that
/// strategy; the aggregator only counts, it never classifies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostActivity {
    pub id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: Vec<TaskCategory>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

/// Fields accepted when recording a post; doubles as the API request body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: Vec<TaskCategory>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub strategy: Option<String>,
}

// ---------------------------------------------------------------------------
// Production counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCounts {
    pub created: u32,
    pub aligned: u32,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Append a recorded post to the tenant's activity log. Returns the post id.
pub fn record_post(root: &Path, tenant: &str, new: NewPost) -> Result<String> {
    crate::tenant::Tenant::load(root, tenant)?;

    let mut posts = list_posts(root, tenant)?;
    let post = PostActivity {
        id: Uuid::new_v4().to_string(),
        title: new.title,
        published_at: new.published_at,
        categories: new.categories,
        keywords: new.keywords,
        strategy: new.strategy,
    };
    let id = post.id.clone();
    posts.push(post);
    save_posts(root, tenant, &posts)?;
    Ok(id)
}

pub fn list_posts(root: &Path, tenant: &str) -> Result<Vec<PostActivity>> {
    let path = paths::posts_path(root, tenant);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = std::fs::read_to_string(&path)?;
    let posts: Vec<PostActivity> = serde_yaml::from_str(&data)?;
    Ok(posts)
}

fn save_posts(root: &Path, tenant: &str, posts: &[PostActivity]) -> Result<()> {
    let path = paths::posts_path(root, tenant);
    let data = serde_yaml::to_string(posts)?;
    crate::io::atomic_write(&path, data.as_bytes())
}

/// Posts published inside the window, and the subset aligned with the given
/// strategy (classifier stamp).
pub fn production_counts(
    posts: &[PostActivity],
    strategy: &str,
    window: &MonthWindow,
) -> ProductionCounts {
    let mut counts = ProductionCounts::default();
    for post in posts {
        if !window.contains(post.published_at) {
            continue;
        }
        counts.created += 1;
        if post.strategy.as_deref() == Some(strategy) {
            counts.aligned += 1;
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
