use axum::extract::{Path, Query, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use stride_core::feed::LocalFeed;
use stride_core::report;

#[derive(serde::Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub strategy: Option<String>,
}

/// GET /api/tenants/:tenant/reports/:year/:month — the monthly report for
/// the tenant's active strategy (or `?strategy=slug`).
pub async fn get_report(
    State(app): State<AppState>,
    Path((tenant, year, month)): Path<(String, i32, u32)>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<report::Report>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        report::generate(&root, &tenant, query.strategy.as_deref(), year, month)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/tenants/:tenant/reports/:year/:month/share — share the stored
/// monthly score to the feed. Sharing twice is a no-op success.
pub async fn share_score(
    State(app): State<AppState>,
    Path((tenant, year, month)): Path<(String, i32, u32)>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let feed = LocalFeed::new(&root);
        let score = report::share_score(
            &root,
            &tenant,
            query.strategy.as_deref(),
            year,
            month,
            &feed,
        )?;
        Ok::<_, stride_core::StrideError>(serde_json::json!({
            "strategy": score.strategy,
            "year": score.year,
            "month": score.month,
            "shared_to_feed": score.shared_to_feed,
            "feed_post_id": score.feed_post_id,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
