use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use stride_core::strategy::Strategy;
use stride_core::types::TaskCategory;

fn strategy_json(s: &Strategy) -> serde_json::Value {
    serde_json::json!({
        "slug": s.slug,
        "title": s.title,
        "description": s.description,
        "status": s.status,
        "categories": s.categories,
        "keywords": s.keywords,
        "tasks": s.tasks,
        "summary": stride_core::task::summarize(&s.tasks),
        "created_at": s.created_at,
        "updated_at": s.updated_at,
        "activated_at": s.activated_at,
        "archived_at": s.archived_at,
    })
}

/// GET /api/tenants/:tenant/strategies — list a tenant's strategies.
pub async fn list_strategies(
    State(app): State<AppState>,
    Path(tenant): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        stride_core::tenant::Tenant::load(&root, &tenant)?;
        let strategies = Strategy::list(&root, &tenant)?;
        let list: Vec<serde_json::Value> = strategies
            .iter()
            .map(|s| {
                serde_json::json!({
                    "slug": s.slug,
                    "title": s.title,
                    "status": s.status,
                    "summary": stride_core::task::summarize(&s.tasks),
                    "created_at": s.created_at,
                })
            })
            .collect();
        Ok::<_, stride_core::StrideError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateStrategyBody {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Vec<TaskCategory>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// POST /api/tenants/:tenant/strategies — create a strategy.
pub async fn create_strategy(
    State(app): State<AppState>,
    Path(tenant): Path<String>,
    Json(body): Json<CreateStrategyBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut strategy = Strategy::create(&root, &tenant, body.slug, body.title)?;
        strategy.description = body.description;
        strategy.categories = body.categories;
        strategy.keywords = body.keywords;
        strategy.touch();
        strategy.save(&root, &tenant)?;

        Ok::<_, stride_core::StrideError>(strategy_json(&strategy))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/tenants/:tenant/strategies/:slug — strategy detail with tasks.
pub async fn get_strategy(
    State(app): State<AppState>,
    Path((tenant, slug)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let strategy = Strategy::load(&root, &tenant, &slug)?;
        Ok::<_, stride_core::StrideError>(strategy_json(&strategy))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/tenants/:tenant/strategies/:slug/activate — activate, archiving
/// any other active strategy of the tenant.
pub async fn activate_strategy(
    State(app): State<AppState>,
    Path((tenant, slug)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let strategy = Strategy::activate(&root, &tenant, &slug)?;
        Ok::<_, stride_core::StrideError>(serde_json::json!({
            "slug": strategy.slug,
            "status": strategy.status,
            "activated_at": strategy.activated_at,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/tenants/:tenant/strategies/:slug/pause — pause a strategy.
pub async fn pause_strategy(
    State(app): State<AppState>,
    Path((tenant, slug)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let strategy = Strategy::pause(&root, &tenant, &slug)?;
        Ok::<_, stride_core::StrideError>(serde_json::json!({
            "slug": strategy.slug,
            "status": strategy.status,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
