use crate::features::profiles::handlers;
use crate::features::profiles::services::ProfileService;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Profile routes (protected)
pub fn routes(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route(
            "/api/profiles/me",
            get(handlers::get_my_profile).patch(handlers::update_my_profile),
        )
        .with_state(service)
}
