use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::map::handlers;
use crate::features::map::services::MapService;

/// Public map routes
pub fn public_routes(service: Arc<MapService>) -> Router {
    Router::new()
        .route("/api/map/points", get(handlers::get_map_points))
        .route("/api/map/icons/{slug}", get(handlers::get_marker_icon))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::features::reports::repository::memory::InMemoryReportRepository;

    fn server() -> TestServer {
        let repo = Arc::new(InMemoryReportRepository::default());
        TestServer::new(public_routes(Arc::new(MapService::new(repo)))).unwrap()
    }

    #[tokio::test]
    async fn test_icon_served_as_svg() {
        let response = server()
            .get("/api/map/icons/pothole")
            .add_query_param("status", "in_progress")
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "image/svg+xml");
        assert!(response.text().contains("#06b6d4"));
    }

    #[tokio::test]
    async fn test_heatmap_mode_selected_by_query() {
        let response = server()
            .get("/api/map/points")
            .add_query_param("mode", "heatmap")
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["mode"], "heatmap");
        assert_eq!(body["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_unknown_mode_rejected() {
        server()
            .get("/api/map/points")
            .add_query_param("mode", "clusters")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
