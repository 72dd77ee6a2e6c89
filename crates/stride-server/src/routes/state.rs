use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use stride_core::types::StrategyStatus;

/// GET /api/state — project and tenant overview.
pub async fn get_state(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let project = match stride_core::config::Config::load(&root) {
            Ok(cfg) => cfg.project.name,
            Err(stride_core::StrideError::NotInitialized) => "stride".to_string(),
            Err(e) => return Err(e),
        };

        let tenants = stride_core::tenant::Tenant::list(&root)?;
        let mut entries = Vec::new();
        for tenant in &tenants {
            let strategies = stride_core::strategy::Strategy::list(&root, &tenant.slug)?;
            let active = strategies
                .iter()
                .find(|s| s.status == StrategyStatus::Active)
                .map(|s| s.slug.clone());
            entries.push(serde_json::json!({
                "slug": tenant.slug,
                "name": tenant.name,
                "strategies": strategies.len(),
                "active_strategy": active,
            }));
        }

        Ok::<_, stride_core::StrideError>(serde_json::json!({
            "project": project,
            "tenants": entries,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
