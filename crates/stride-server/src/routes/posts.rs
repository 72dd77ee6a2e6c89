use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use stride_core::activity::{self, NewPost};

/// GET /api/tenants/:tenant/posts — recorded content activity.
pub async fn list_posts(
    State(app): State<AppState>,
    Path(tenant): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        stride_core::tenant::Tenant::load(&root, &tenant)?;
        let posts = activity::list_posts(&root, &tenant)?;
        Ok::<_, stride_core::StrideError>(serde_json::json!(posts))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/tenants/:tenant/posts — record a published post. The optional
/// `strategy` field carries the external classifier's alignment verdict.
pub async fn record_post(
    State(app): State<AppState>,
    Path(tenant): Path<String>,
    Json(body): Json<NewPost>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let id = activity::record_post(&root, &tenant, body)?;
        Ok::<_, stride_core::StrideError>(serde_json::json!({ "post_id": id }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
