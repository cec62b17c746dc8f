use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Staff dashboard routes
pub fn routes(dashboard_service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard/summary", get(handlers::get_summary))
        // Grouped views
        .route("/api/dashboard/by-category", get(handlers::get_by_category))
        .route("/api/dashboard/by-status", get(handlers::get_by_status))
        // Listing and charts
        .route("/api/dashboard/recent", get(handlers::get_recent))
        .route("/api/dashboard/trend", get(handlers::get_trend))
        .with_state(dashboard_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use sqlx::postgres::PgPoolOptions;

    use crate::shared::test_helpers::{create_citizen_user, with_user};

    fn router() -> Router {
        // Never connects: the guard rejects before any query runs
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/civic_report_test")
            .unwrap();
        routes(Arc::new(DashboardService::new(pool)))
    }

    #[tokio::test]
    async fn test_citizens_are_sent_home() {
        let server = TestServer::new(with_user(router(), create_citizen_user())).unwrap();

        let response = server.get("/api/dashboard/summary").await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json();
        assert_eq!(body["errors"][0], "redirect_to:/");
    }

    #[tokio::test]
    async fn test_anonymous_callers_are_sent_to_login() {
        let server = TestServer::new(router()).unwrap();

        let response = server.get("/api/dashboard/trend").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["errors"][0], "redirect_to:/login");
    }
}
