use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::service::LinkService;

use super::handlers::{create_link, delete_link, get_link, health_check, list_links, AppState};

pub fn create_api_router(service: Arc<LinkService>) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/links", post(create_link))
        .route("/links", get(list_links))
        .route("/links/{code}", get(get_link))
        .route("/links/{code}", delete(delete_link))
        .route("/healthz", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
