use crate::error::{Result, StrideError};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// FeedPublisher
// ---------------------------------------------------------------------------

/// Outbound side of "share to feed". Publishing returns the feed post id;
/// callers persist the shared flag before invoking this, so a failure here
/// never unwinds a share.
pub trait FeedPublisher {
    fn publish(&self, tenant: &str, title: &str, body: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// LocalFeed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: String,
    pub title: String,
    pub body: String,
    pub published_at: DateTime<Utc>,
}

/// File-backed publisher: one post manifest per publish under the tenant's
/// feed directory.
pub struct LocalFeed {
    root: PathBuf,
}

impl LocalFeed {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn list(&self, tenant: &str) -> Result<Vec<FeedPost>> {
        let dir = paths::feed_dir(&self.root, tenant);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut posts = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let data = std::fs::read_to_string(entry.path())?;
                let post: FeedPost = serde_yaml::from_str(&data)?;
                posts.push(post);
            }
        }
        posts.sort_by(|a, b| a.published_at.cmp(&b.published_at));
        Ok(posts)
    }
}

impl FeedPublisher for LocalFeed {
    fn publish(&self, tenant: &str, title: &str, body: &str) -> Result<String> {
        let post = FeedPost {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            body: body.to_string(),
            published_at: Utc::now(),
        };
        let path = paths::feed_post_path(&self.root, tenant, &post.id);
        let data = serde_yaml::to_string(&post)?;
        crate::io::atomic_write(&path, data.as_bytes())?;
        Ok(post.id)
    }
}

// ---------------------------------------------------------------------------
// Test publisher
// ---------------------------------------------------------------------------

/// Always-failing publisher for exercising the best-effort share path.
pub struct UnavailableFeed;

impl FeedPublisher for UnavailableFeed {
    fn publish(&self, _tenant: &str, _title: &str, _body: &str) -> Result<String> {
        Err(StrideError::FeedUnavailable("feed service unreachable".into()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
