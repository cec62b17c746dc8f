use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::features::submissions::handlers;
use crate::features::submissions::services::SubmissionService;

/// Submission routes; all of them need an authenticated user
pub fn protected_routes(service: Arc<SubmissionService>) -> Router {
    Router::new()
        .route("/api/reports", post(handlers::create_report))
        .route("/api/drafts", post(handlers::start_draft))
        .route(
            "/api/drafts/{id}",
            get(handlers::get_draft).delete(handlers::discard_draft),
        )
        .route("/api/drafts/{id}/category", put(handlers::select_category))
        .route("/api/drafts/{id}/photos", post(handlers::attach_photo))
        .route(
            "/api/drafts/{id}/photos/{index}",
            delete(handlers::remove_photo),
        )
        .route("/api/drafts/{id}/location", put(handlers::set_location))
        .route(
            "/api/drafts/{id}/description",
            put(handlers::set_description),
        )
        .route("/api/drafts/{id}/next", post(handlers::next_step))
        .route("/api/drafts/{id}/back", post(handlers::previous_step))
        .route("/api/drafts/{id}/submit", post(handlers::submit_draft))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::reports::repository::memory::InMemoryReportRepository;
    use crate::features::reports::ReportService;
    use crate::features::submissions::store::DraftStore;
    use crate::modules::storage::memory::InMemoryStorage;
    use crate::shared::test_helpers::{create_citizen_user, with_user};
    use crate::shared::validation::TRACKING_CODE_REGEX;

    fn server() -> (Arc<InMemoryReportRepository>, TestServer) {
        let repo = Arc::new(InMemoryReportRepository::default());
        let service = Arc::new(SubmissionService::new(
            Arc::new(DraftStore::new(Duration::from_secs(600))),
            Arc::new(ReportService::new(repo.clone())),
            repo.clone(),
            Arc::new(InMemoryStorage::default()),
        ));
        let router = with_user(protected_routes(service), create_citizen_user());
        (repo, TestServer::new(router).unwrap())
    }

    fn jpeg() -> Part {
        Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
            .file_name("pothole.jpg")
            .mime_type("image/jpeg")
    }

    #[tokio::test]
    async fn test_wizard_flow_over_http() {
        let (repo, server) = server();

        let response = server.post("/api/drafts").await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["can_advance"], false);

        server
            .post(&format!("/api/drafts/{}/next", id))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .put(&format!("/api/drafts/{}/category", id))
            .json(&json!({ "category_id": repo.category_id("pothole") }))
            .await
            .assert_status_ok();
        server.post(&format!("/api/drafts/{}/next", id)).await.assert_status_ok();

        server
            .post(&format!("/api/drafts/{}/photos", id))
            .multipart(MultipartForm::new().add_part("photo", jpeg()))
            .await
            .assert_status_ok();
        server.post(&format!("/api/drafts/{}/next", id)).await.assert_status_ok();

        server
            .put(&format!("/api/drafts/{}/location", id))
            .json(&json!({ "latitude": -15.5006, "longitude": -70.1349 }))
            .await
            .assert_status_ok();
        server.post(&format!("/api/drafts/{}/next", id)).await.assert_status_ok();

        server
            .put(&format!("/api/drafts/{}/description", id))
            .json(&json!({ "description": "Hole in road" }))
            .await
            .assert_status_ok();
        let review: Value = server
            .post(&format!("/api/drafts/{}/next", id))
            .await
            .json();
        assert_eq!(review["data"]["step"], "review");
        assert_eq!(review["data"]["can_submit"], true);

        let response = server.post(&format!("/api/drafts/{}/submit", id)).await;
        response.assert_status(StatusCode::CREATED);
        let receipt: Value = response.json();
        let code = receipt["data"]["tracking_code"].as_str().unwrap();
        assert!(TRACKING_CODE_REGEX.is_match(code));
        assert_eq!(receipt["data"]["status"], "new");

        server
            .post(&format!("/api/drafts/{}/submit", id))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_one_shot_report_form() {
        let (repo, server) = server();

        let form = MultipartForm::new()
            .add_text("category_id", repo.category_id("lighting").to_string())
            .add_part("photo", jpeg())
            .add_text("latitude", "-15.8402")
            .add_text("longitude", "-70.0219")
            .add_text("description", "Street light out for a week");

        let response = server.post("/api/reports").multipart(form).await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(repo.report_count(), 1);
    }

    #[tokio::test]
    async fn test_one_shot_report_requires_coordinates() {
        let (repo, server) = server();

        let form = MultipartForm::new()
            .add_text("category_id", repo.category_id("lighting").to_string())
            .add_part("photo", jpeg())
            .add_text("description", "Street light out for a week");

        server
            .post("/api/reports")
            .multipart(form)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(repo.report_count(), 0);
    }
}
