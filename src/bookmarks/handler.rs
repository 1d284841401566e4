//! HTTP Handlers for the Bookmarks API

use axum::{
    Json,
    extract::{OriginalUri, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::{BookmarkStore, CreateBookmarkRequest, UpdateBookmarkRequest};
use crate::error::ValidationError;
use crate::handler::AppState;

const NOT_FOUND: &str = "Bookmark not found";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: MessageResponse,
}

fn message(status: StatusCode, msg: &str) -> Response {
    (
        status,
        Json(MessageResponse {
            message: msg.to_string(),
        }),
    )
        .into_response()
}

fn not_found(id: i64) -> Response {
    tracing::error!("Bookmark with id {} not found.", id);
    message(StatusCode::NOT_FOUND, NOT_FOUND)
}

fn internal_error(action: &str, err: anyhow::Error) -> Response {
    tracing::error!(error = %crate::unpack_error(&*err), "failed to {}", action);
    message(StatusCode::INTERNAL_SERVER_ERROR, &format!("Failed to {}", action))
}

fn invalid(err: ValidationError) -> Response {
    match err.received() {
        Some(received) => tracing::error!("{}. Received {}", err, received),
        None => tracing::error!("{}.", err),
    }

    match err {
        ValidationError::NoFieldsToUpdate => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: MessageResponse {
                    message: err.to_string(),
                },
            }),
        )
            .into_response(),
        _ => message(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

fn malformed_body(rejection: JsonRejection) -> Response {
    tracing::error!(error = %rejection, "malformed request body");
    message(StatusCode::BAD_REQUEST, &rejection.body_text())
}

// ============================================================================
// Collection Handlers
// ============================================================================

pub async fn list_bookmarks(State(state): State<AppState>) -> Response {
    let store = BookmarkStore::new(state.db.connection());

    match store.list_all().await {
        Ok(bookmarks) => (StatusCode::OK, Json(bookmarks)).into_response(),
        Err(e) => internal_error("list bookmarks", e),
    }
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<CreateBookmarkRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return malformed_body(rejection),
    };

    let bookmark = match payload.validate() {
        Ok(b) => b.sanitized(),
        Err(e) => return invalid(e),
    };

    let store = BookmarkStore::new(state.db.connection());
    match store.insert(bookmark).await {
        Ok(created) => {
            let location = format!("{}/{}", uri.path().trim_end_matches('/'), created.id);
            tracing::info!(id = created.id, "bookmark created");
            (StatusCode::CREATED, [(header::LOCATION, location)], Json(created)).into_response()
        }
        Err(e) => internal_error("create bookmark", e),
    }
}

// ============================================================================
// Item Handlers
// ============================================================================

pub async fn get_bookmark(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let store = BookmarkStore::new(state.db.connection());

    match store.get_by_id(id).await {
        Ok(Some(bookmark)) => (StatusCode::OK, Json(bookmark)).into_response(),
        Ok(None) => not_found(id),
        Err(e) => internal_error("get bookmark", e),
    }
}

pub async fn delete_bookmark(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let store = BookmarkStore::new(state.db.connection());

    match store.get_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(id),
        Err(e) => return internal_error("get bookmark", e),
    }

    // A concurrent delete between the lookup and here still ends in 204.
    match store.delete_by_id(id).await {
        Ok(_) => {
            tracing::info!(id, "bookmark deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => internal_error("delete bookmark", e),
    }
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateBookmarkRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return malformed_body(rejection),
    };

    let changes = match payload.validate() {
        Ok(c) => c.sanitized(),
        Err(e) => return invalid(e),
    };

    let store = BookmarkStore::new(state.db.connection());
    match store.update_by_id(id, changes).await {
        Ok(0) => not_found(id),
        Ok(_) => {
            tracing::info!(id, "bookmark updated");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => internal_error("update bookmark", e),
    }
}
