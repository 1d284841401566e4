use std::sync::Arc;

use axum::{
    Json, Router,
    http::Method,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::NormalizePath;
use tracing::info;

use crate::bookmarks;
use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db: Arc::new(db) }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(HealthResponse { status: "ok" })
}

/// Builds the full application with the bookmarks routes mounted at `base_path`.
///
/// Trailing slashes are trimmed before routing, so `{base_path}/` reaches the
/// collection routes.
pub fn router(state: AppState, base_path: &str) -> NormalizePath<Router> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(healthcheck))
        .nest(base_path, bookmarks::routes())
        .layer(cors)
        .with_state(state);

    NormalizePath::trim_trailing_slash(app)
}
