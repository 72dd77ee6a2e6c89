use axum::http::StatusCode;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bootstrap a project with one tenant inside the given temp directory.
fn init_project(dir: &TempDir) {
    let config = stride_core::config::Config::new("test-project");
    config.save(dir.path()).unwrap();
    stride_core::tenant::Tenant::create(dir.path(), "acme", "Acme Inc").unwrap();
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn send_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, body).await
}

fn router(dir: &TempDir) -> axum::Router {
    stride_server::build_router(dir.path().to_path_buf())
}

/// Create a strategy with a couple of completed June 2025 tasks directly
/// through the core, for report-level tests.
fn seed_summer_strategy(dir: &TempDir) {
    use chrono::TimeZone;
    let mut s =
        stride_core::strategy::Strategy::create(dir.path(), "acme", "summer", "Summer Launch")
            .unwrap();
    for day in [2u32, 3, 4] {
        let id = stride_core::task::add_task(
            &mut s.tasks,
            stride_core::task::NewTask {
                title: format!("t{day}"),
                description: None,
                category: stride_core::types::TaskCategory::Content,
                priority: stride_core::types::TaskPriority::Medium,
                start_date: None,
                due_date: None,
            },
        );
        stride_core::task::complete_task_at(
            &mut s.tasks,
            &id,
            chrono::Utc.with_ymd_and_hms(2025, 6, day, 10, 0, 0).unwrap(),
        )
        .unwrap();
    }
    s.save(dir.path(), "acme").unwrap();
    stride_core::strategy::Strategy::activate(dir.path(), "acme", "summer").unwrap();
}

// ---------------------------------------------------------------------------
// State & tenants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_state_returns_project_summary() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, json) = get(router(&dir), "/api/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["project"], "test-project");
    assert_eq!(json["tenants"][0]["slug"], "acme");
}

#[tokio::test]
async fn create_tenant_and_list() {
    let dir = TempDir::new().unwrap();

    let (status, json) = post_json(
        router(&dir),
        "/api/tenants",
        serde_json::json!({ "slug": "globex", "name": "Globex", "utc_offset_minutes": 120 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["utc_offset_minutes"], 120);

    let (status, json) = get(router(&dir), "/api/tenants").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_tenant_conflicts() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = post_json(
        router(&dir),
        "/api/tenants",
        serde_json::json!({ "slug": "acme", "name": "Again" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_tenant_slug_rejected() {
    let dir = TempDir::new().unwrap();

    let (status, _) = post_json(
        router(&dir),
        "/api/tenants",
        serde_json::json!({ "slug": "Bad Slug", "name": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_activate_strategy() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, json) = post_json(
        router(&dir),
        "/api/tenants/acme/strategies",
        serde_json::json!({
            "slug": "summer",
            "title": "Summer Launch",
            "categories": ["content", "email"],
            "keywords": ["sale"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "paused");

    let (status, json) =
        post_json(router(&dir), "/api/tenants/acme/strategies/summer/activate", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "active");
}

#[tokio::test]
async fn activation_archives_previous_active() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    for slug in ["one", "two"] {
        post_json(
            router(&dir),
            "/api/tenants/acme/strategies",
            serde_json::json!({ "slug": slug, "title": slug }),
        )
        .await;
    }
    post_json(router(&dir), "/api/tenants/acme/strategies/one/activate", serde_json::json!({})).await;
    post_json(router(&dir), "/api/tenants/acme/strategies/two/activate", serde_json::json!({})).await;

    let (_, json) = get(router(&dir), "/api/tenants/acme/strategies/one").await;
    assert_eq!(json["status"], "archived");
    let (_, json) = get(router(&dir), "/api/tenants/acme/strategies/two").await;
    assert_eq!(json["status"], "active");
}

#[tokio::test]
async fn missing_strategy_is_404() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = get(router(&dir), "/api/tenants/acme/strategies/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

async fn add_summer_task(dir: &TempDir, title: &str) -> String {
    let (status, json) = post_json(
        router(dir),
        "/api/tenants/acme/strategies/summer/tasks",
        serde_json::json!({ "title": title, "category": "content" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["task_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn task_lifecycle_over_http() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    post_json(
        router(&dir),
        "/api/tenants/acme/strategies",
        serde_json::json!({ "slug": "summer", "title": "Summer" }),
    )
    .await;

    let id = add_summer_task(&dir, "Write launch post").await;

    let (status, json) = post_json(
        router(&dir),
        &format!("/api/tenants/acme/strategies/summer/tasks/{id}/start"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["task"]["status"], "in_progress");

    let (status, json) = post_json(
        router(&dir),
        &format!("/api/tenants/acme/strategies/summer/tasks/{id}/complete"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["task"]["status"], "done");
    assert!(json["task"]["completed_at"].is_string());

    let (status, json) = post_json(
        router(&dir),
        &format!("/api/tenants/acme/strategies/summer/tasks/{id}/reopen"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["task"]["status"], "todo");
    assert!(json["task"]["completed_at"].is_null());
}

#[tokio::test]
async fn move_and_reorder_tasks() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    post_json(
        router(&dir),
        "/api/tenants/acme/strategies",
        serde_json::json!({ "slug": "summer", "title": "Summer" }),
    )
    .await;

    let a = add_summer_task(&dir, "a").await;
    let b = add_summer_task(&dir, "b").await;
    let c = add_summer_task(&dir, "c").await;

    let (status, json) = post_json(
        router(&dir),
        &format!("/api/tenants/acme/strategies/summer/tasks/{a}/move"),
        serde_json::json!({ "position": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["task"]["sort_order"], 2);

    let (status, _) = send_json(
        router(&dir),
        "PUT",
        "/api/tenants/acme/strategies/summer/tasks/order",
        serde_json::json!({ "ids": [c, b, a] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        router(&dir),
        "PUT",
        "/api/tenants/acme/strategies/summer/tasks/order",
        serde_json::json!({ "ids": [c, b] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn progress_and_matches() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    post_json(
        router(&dir),
        "/api/tenants/acme/strategies",
        serde_json::json!({ "slug": "summer", "title": "Summer" }),
    )
    .await;
    let id = add_summer_task(&dir, "a").await;

    let (status, json) = post_json(
        router(&dir),
        &format!("/api/tenants/acme/strategies/summer/tasks/{id}/progress"),
        serde_json::json!({ "progress": 40 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["task"]["progress"], 40);
    // Progress does not flip status.
    assert_eq!(json["task"]["status"], "todo");

    let (status, _) = post_json(
        router(&dir),
        &format!("/api/tenants/acme/strategies/summer/tasks/{id}/progress"),
        serde_json::json!({ "progress": 101 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = post_json(
        router(&dir),
        &format!("/api/tenants/acme/strategies/summer/tasks/{id}/matches"),
        serde_json::json!({
            "activity_type": "post",
            "activity_id": "p-1",
            "confidence": 0.9,
            "match_reason": "keyword overlap",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["task"]["matched_activities"][0]["activity_id"], "p-1");
}

// ---------------------------------------------------------------------------
// Reports & milestones
// ---------------------------------------------------------------------------

#[tokio::test]
async fn report_for_seeded_month() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    seed_summer_strategy(&dir);

    let (status, json) = get(router(&dir), "/api/tenants/acme/reports/2025/6").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["strategy_title"], "Summer Launch");
    assert_eq!(json["first_report"], true);
    assert!(json["trend"].is_null());
    assert_eq!(json["score"]["raw"]["completed_tasks"], 3);
    assert_eq!(json["timeline"].as_array().unwrap().len(), 30);

    let keys: Vec<&str> = json["new_milestones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["key"].as_str().unwrap())
        .collect();
    assert!(keys.contains(&"first-task-done"));
    assert!(keys.contains(&"first-activation"));
}

#[tokio::test]
async fn report_invalid_month_is_400() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    seed_summer_strategy(&dir);

    let (status, _) = get(router(&dir), "/api/tenants/acme/reports/2025/13").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn report_without_active_strategy_is_404() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = get(router(&dir), "/api/tenants/acme/reports/2025/6").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn milestones_list_and_share() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    seed_summer_strategy(&dir);

    get(router(&dir), "/api/tenants/acme/reports/2025/6").await;

    let (status, json) = get(router(&dir), "/api/tenants/acme/milestones").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!json.as_array().unwrap().is_empty());

    let (status, json) = post_json(
        router(&dir),
        "/api/tenants/acme/milestones/first-task-done/share",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["shared_to_feed"], true);
    let first_post = json["feed_post_id"].clone();

    // Share-twice: success, same feed post.
    let (status, json) = post_json(
        router(&dir),
        "/api/tenants/acme/milestones/first-task-done/share",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["feed_post_id"], first_post);
}

#[tokio::test]
async fn share_unknown_milestone_is_404() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = post_json(
        router(&dir),
        "/api/tenants/acme/milestones/ghost/share",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn share_score_roundtrip() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    seed_summer_strategy(&dir);

    get(router(&dir), "/api/tenants/acme/reports/2025/6").await;

    let (status, json) = post_json(
        router(&dir),
        "/api/tenants/acme/reports/2025/6/share",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["shared_to_feed"], true);

    // Regenerating the report keeps the share flag.
    let (_, json) = get(router(&dir), "/api/tenants/acme/reports/2025/6").await;
    assert_eq!(json["score"]["shared_to_feed"], true);
}

#[tokio::test]
async fn share_score_without_report_is_404() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    seed_summer_strategy(&dir);

    let (status, _) = post_json(
        router(&dir),
        "/api/tenants/acme/reports/2024/3/share",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn record_posts_and_production_factor() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    seed_summer_strategy(&dir);

    for strategy in [Some("summer"), None] {
        let (status, _) = post_json(
            router(&dir),
            "/api/tenants/acme/posts",
            serde_json::json!({
                "title": "June post",
                "published_at": "2025-06-10T09:00:00Z",
                "categories": ["content"],
                "strategy": strategy,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = get(router(&dir), "/api/tenants/acme/posts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);

    let (_, json) = get(router(&dir), "/api/tenants/acme/reports/2025/6").await;
    assert_eq!(json["score"]["raw"]["posts_created"], 2);
    assert_eq!(json["score"]["raw"]["posts_aligned"], 1);
}
