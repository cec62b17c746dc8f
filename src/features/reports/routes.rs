use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Public report routes
pub fn public_routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports/track/{tracking_code}",
            get(handlers::track_report),
        )
        .with_state(service)
}

/// Protected report routes
pub fn protected_routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .route("/api/reports/{id}/history", get(handlers::get_report_history))
        .route(
            "/api/reports/{id}/status",
            patch(handlers::update_report_status),
        )
        .with_state(service)
}
