use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::models::{CreateLinkRequest, Link};
use crate::service::{LinkService, ServiceError};

pub struct AppState {
    pub service: Arc<LinkService>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Map a service failure onto a status and body. Validation and conflict
/// errors carry their reason so the caller can correct input; everything
/// else is an opaque 500.
fn error_response(err: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        ServiceError::InvalidUrl | ServiceError::InvalidCode => StatusCode::BAD_REQUEST,
        ServiceError::CodeAlreadyExists => StatusCode::CONFLICT,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::CodeSpaceExhausted | ServiceError::StoreUnavailable(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = ?err, "request failed");
        return (
            status,
            Json(ErrorResponse {
                error: "Internal server error".to_string(),
            }),
        );
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Create a new link
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<Link>), (StatusCode, Json<ErrorResponse>)> {
    match state
        .service
        .create_link(&payload.target_url, payload.code.as_deref())
        .await
    {
        Ok(link) => {
            tracing::info!(code = %link.code, "link created");
            Ok((StatusCode::CREATED, Json(link)))
        }
        Err(err) => Err(error_response(err)),
    }
}

/// Get a link by code
pub async fn get_link(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<Link>, (StatusCode, Json<ErrorResponse>)> {
    match state.service.get_link(&code).await {
        Ok(link) => Ok(Json(link)),
        Err(err) => Err(error_response(err)),
    }
}

/// Delete a link
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<DeleteResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.service.delete_link(&code).await {
        Ok(link) => {
            tracing::info!(code = %link.code, "link deleted");
            Ok(Json(DeleteResponse { success: true }))
        }
        Err(err) => Err(error_response(err)),
    }
}

/// List all links, newest first
pub async fn list_links(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Link>>, (StatusCode, Json<ErrorResponse>)> {
    match state.service.list_links().await {
        Ok(links) => Ok(Json(links)),
        Err(err) => Err(error_response(err)),
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
