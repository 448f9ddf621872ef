//! # Server Configuration
//!
//! Router wiring and server startup for the back-office API.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::handlers::{self, categories};
use crate::telemetry::{self, TraceContext};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/api/tenant/{tenant_id}/category",
            post(categories::category_create)
                .get(categories::category_list)
                .delete(categories::category_destroy),
        )
        .route(
            "/api/tenant/{tenant_id}/category/import",
            post(categories::category_import),
        )
        .route(
            "/api/tenant/{tenant_id}/category/autocomplete",
            get(categories::category_autocomplete),
        )
        .route(
            "/api/tenant/{tenant_id}/category/{id}",
            get(categories::category_find).put(categories::category_update),
        )
        // Contact endpoints for the public storefront; both run without a
        // tenant in scope, unlike everything else under /api.
        .route("/api/tenant/category/all", get(categories::category_contact))
        .route("/api/cs/findcs", get(categories::category_find_cs))
        .layer(middleware::from_fn(request_trace))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Stamps every request with a fresh trace ID; error envelopes read it back
/// through the task-local trace context.
async fn request_trace(request: Request, next: Next) -> Response {
    let trace_id = Uuid::new_v4().to_string();
    telemetry::with_trace_context(TraceContext { trace_id }, next.run(request)).await
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config.bind_addr().context("invalid server bind address")?;

    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
