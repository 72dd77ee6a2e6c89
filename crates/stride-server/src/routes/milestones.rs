use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use stride_core::feed::LocalFeed;
use stride_core::milestone::{self, Milestone};

/// GET /api/tenants/:tenant/milestones — all earned badges, oldest first.
pub async fn list_milestones(
    State(app): State<AppState>,
    Path(tenant): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        stride_core::tenant::Tenant::load(&root, &tenant)?;
        let milestones = Milestone::list(&root, &tenant)?;
        Ok::<_, stride_core::StrideError>(serde_json::json!(milestones))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/tenants/:tenant/milestones/:id/share — share a badge to the
/// feed. Sharing twice is a no-op success.
pub async fn share_milestone(
    State(app): State<AppState>,
    Path((tenant, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let feed = LocalFeed::new(&root);
        let milestone = milestone::share(&root, &tenant, &id, &feed)?;
        Ok::<_, stride_core::StrideError>(serde_json::json!(milestone))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
