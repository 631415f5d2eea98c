use axum::{routing::get, Router};
use std::sync::Arc;

use crate::service::LinkService;

use super::handlers::{health_check, redirect_link, RedirectState};

pub fn create_redirect_router(service: Arc<LinkService>) -> Router {
    let state = Arc::new(RedirectState { service });

    Router::new()
        .route("/", get(health_check))
        .route("/{code}", get(redirect_link))
        .with_state(state)
}
