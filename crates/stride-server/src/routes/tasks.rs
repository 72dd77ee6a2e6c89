use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;

use crate::error::AppError;
use crate::state::AppState;
use stride_core::strategy::Strategy;
use stride_core::task::{self, ActivityMatch, NewTask};

/// POST /api/tenants/:tenant/strategies/:slug/tasks — add a task.
pub async fn add_task(
    State(app): State<AppState>,
    Path((tenant, slug)): Path<(String, String)>,
    Json(body): Json<NewTask>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut strategy = Strategy::load(&root, &tenant, &slug)?;
        let id = task::add_task(&mut strategy.tasks, body);
        strategy.touch();
        strategy.save(&root, &tenant)?;

        Ok::<_, stride_core::StrideError>(serde_json::json!({
            "strategy": slug,
            "task_id": id,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/tenants/:tenant/strategies/:slug/tasks/:id/start — start a task.
pub async fn start_task(
    State(app): State<AppState>,
    Path((tenant, slug, task_id)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    mutate_task(app, tenant, slug, task_id, |tasks, id| {
        task::start_task(tasks, id)
    })
    .await
}

/// POST /api/tenants/:tenant/strategies/:slug/tasks/:id/complete — complete a task.
pub async fn complete_task(
    State(app): State<AppState>,
    Path((tenant, slug, task_id)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    mutate_task(app, tenant, slug, task_id, |tasks, id| {
        task::complete_task(tasks, id)
    })
    .await
}

/// POST /api/tenants/:tenant/strategies/:slug/tasks/:id/reopen — reopen a done task.
pub async fn reopen_task(
    State(app): State<AppState>,
    Path((tenant, slug, task_id)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    mutate_task(app, tenant, slug, task_id, |tasks, id| {
        task::reopen_task(tasks, id)
    })
    .await
}

#[derive(serde::Deserialize)]
pub struct MoveTaskBody {
    pub position: usize,
}

/// POST /api/tenants/:tenant/strategies/:slug/tasks/:id/move — drag-and-drop
/// repositioning; last write wins between concurrent drags.
pub async fn move_task(
    State(app): State<AppState>,
    Path((tenant, slug, task_id)): Path<(String, String, String)>,
    Json(body): Json<MoveTaskBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    mutate_task(app, tenant, slug, task_id, move |tasks, id| {
        task::move_task(tasks, id, body.position)
    })
    .await
}

#[derive(serde::Deserialize)]
pub struct ReorderTasksBody {
    pub ids: Vec<String>,
}

/// PUT /api/tenants/:tenant/strategies/:slug/tasks/order — replace the full
/// task order.
pub async fn reorder_tasks(
    State(app): State<AppState>,
    Path((tenant, slug)): Path<(String, String)>,
    Json(body): Json<ReorderTasksBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut strategy = Strategy::load(&root, &tenant, &slug)?;
        let refs: Vec<&str> = body.ids.iter().map(|s| s.as_str()).collect();
        task::reorder_tasks(&mut strategy.tasks, &refs)?;
        strategy.touch();
        strategy.save(&root, &tenant)?;

        Ok::<_, stride_core::StrideError>(serde_json::json!({
            "strategy": slug,
            "ids": body.ids,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct SetProgressBody {
    pub progress: u32,
}

/// POST /api/tenants/:tenant/strategies/:slug/tasks/:id/progress — set the
/// externally-computed progress value.
pub async fn set_progress(
    State(app): State<AppState>,
    Path((tenant, slug, task_id)): Path<(String, String, String)>,
    Json(body): Json<SetProgressBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    mutate_task(app, tenant, slug, task_id, move |tasks, id| {
        task::set_progress(tasks, id, body.progress)
    })
    .await
}

#[derive(serde::Deserialize)]
pub struct RecordMatchBody {
    pub activity_type: String,
    pub activity_id: String,
    pub confidence: f64,
    pub match_reason: String,
}

/// POST /api/tenants/:tenant/strategies/:slug/tasks/:id/matches — append an
/// activity match from the external matcher.
pub async fn record_match(
    State(app): State<AppState>,
    Path((tenant, slug, task_id)): Path<(String, String, String)>,
    Json(body): Json<RecordMatchBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    mutate_task(app, tenant, slug, task_id, move |tasks, id| {
        task::record_match(
            tasks,
            id,
            ActivityMatch {
                activity_type: body.activity_type,
                activity_id: body.activity_id,
                matched_at: Utc::now(),
                confidence: body.confidence,
                match_reason: body.match_reason,
            },
        )
    })
    .await
}

/// Load-mutate-save helper shared by the single-task routes. Returns the
/// task's updated state.
async fn mutate_task<F>(
    app: AppState,
    tenant: String,
    slug: String,
    task_id: String,
    op: F,
) -> Result<Json<serde_json::Value>, AppError>
where
    F: FnOnce(&mut Vec<stride_core::task::Task>, &str) -> stride_core::Result<()>
        + Send
        + 'static,
{
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut strategy = Strategy::load(&root, &tenant, &slug)?;
        op(&mut strategy.tasks, &task_id)?;
        strategy.touch();
        strategy.save(&root, &tenant)?;

        let task = task::find(&strategy.tasks, &task_id)?;
        Ok::<_, stride_core::StrideError>(serde_json::json!({
            "strategy": slug,
            "task": task,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
