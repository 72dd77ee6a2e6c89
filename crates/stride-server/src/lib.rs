pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // State
        .route("/api/state", get(routes::state::get_state))
        // Tenants
        .route("/api/tenants", get(routes::tenants::list_tenants))
        .route("/api/tenants", post(routes::tenants::create_tenant))
        // Strategies
        .route(
            "/api/tenants/{tenant}/strategies",
            get(routes::strategies::list_strategies),
        )
        .route(
            "/api/tenants/{tenant}/strategies",
            post(routes::strategies::create_strategy),
        )
        .route(
            "/api/tenants/{tenant}/strategies/{slug}",
            get(routes::strategies::get_strategy),
        )
        .route(
            "/api/tenants/{tenant}/strategies/{slug}/activate",
            post(routes::strategies::activate_strategy),
        )
        .route(
            "/api/tenants/{tenant}/strategies/{slug}/pause",
            post(routes::strategies::pause_strategy),
        )
        // Tasks
        .route(
            "/api/tenants/{tenant}/strategies/{slug}/tasks",
            post(routes::tasks::add_task),
        )
        .route(
            "/api/tenants/{tenant}/strategies/{slug}/tasks/{id}/start",
            post(routes::tasks::start_task),
        )
        .route(
            "/api/tenants/{tenant}/strategies/{slug}/tasks/{id}/complete",
            post(routes::tasks::complete_task),
        )
        .route(
            "/api/tenants/{tenant}/strategies/{slug}/tasks/{id}/reopen",
            post(routes::tasks::reopen_task),
        )
        .route(
            "/api/tenants/{tenant}/strategies/{slug}/tasks/{id}/move",
            post(routes::tasks::move_task),
        )
        .route(
            "/api/tenants/{tenant}/strategies/{slug}/tasks/order",
            put(routes::tasks::reorder_tasks),
        )
        .route(
            "/api/tenants/{tenant}/strategies/{slug}/tasks/{id}/progress",
            post(routes::tasks::set_progress),
        )
        .route(
            "/api/tenants/{tenant}/strategies/{slug}/tasks/{id}/matches",
            post(routes::tasks::record_match),
        )
        // Posts (content activity)
        .route("/api/tenants/{tenant}/posts", get(routes::posts::list_posts))
        .route(
            "/api/tenants/{tenant}/posts",
            post(routes::posts::record_post),
        )
        // Reports
        .route(
            "/api/tenants/{tenant}/reports/{year}/{month}",
            get(routes::reports::get_report),
        )
        .route(
            "/api/tenants/{tenant}/reports/{year}/{month}/share",
            post(routes::reports::share_score),
        )
        // Milestones
        .route(
            "/api/tenants/{tenant}/milestones",
            get(routes::milestones::list_milestones),
        )
        .route(
            "/api/tenants/{tenant}/milestones/{id}/share",
            post(routes::milestones::share_milestone),
        )
        .layer(cors)
        .with_state(app_state)
}

/// Start the stride API server.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let app = build_router(root);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("stride API server listening on http://localhost:{port}");

    if open_browser {
        let url = format!("http://localhost:{port}/api/state");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("stride API server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/state");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
