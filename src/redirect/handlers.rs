use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::service::{LinkService, ServiceError};

pub struct RedirectState {
    pub service: Arc<LinkService>,
}

/// Redirect to the destination URL, counting the click.
///
/// 302 Found, matching what browsers are historically served by shorteners;
/// the increment has already committed by the time the response goes out.
pub async fn redirect_link(
    State(state): State<Arc<RedirectState>>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    match state.service.resolve_and_count(&code).await {
        Ok(target_url) => {
            (StatusCode::FOUND, [(header::LOCATION, target_url)]).into_response()
        }
        Err(ServiceError::NotFound) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        Err(err) => {
            tracing::error!(code = %code, error = ?err, "redirect failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    #[derive(Serialize)]
    struct HealthResponse {
        status: String,
    }

    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
