use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/tenants — list all tenants.
pub async fn list_tenants(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let tenants = stride_core::tenant::Tenant::list(&root)?;
        let list: Vec<serde_json::Value> = tenants
            .iter()
            .map(|t| {
                serde_json::json!({
                    "slug": t.slug,
                    "name": t.name,
                    "utc_offset_minutes": t.utc_offset_minutes,
                    "created_at": t.created_at,
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
pub struct CreateTenantBody {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// POST /api/tenants — create a new tenant.
pub async fn create_tenant(
    State(app): State<AppState>,
    Json(body): Json<CreateTenantBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut tenant = stride_core::tenant::Tenant::create(&root, body.slug, body.name)?;
        if let Some(offset) = body.utc_offset_minutes {
            tenant.utc_offset_minutes = offset;
            tenant.save(&root)?;
        }

        Ok::<_, stride_core::StrideError>(serde_json::json!({
            "slug": tenant.slug,
            "name": tenant.name,
            "utc_offset_minutes": tenant.utc_offset_minutes,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
