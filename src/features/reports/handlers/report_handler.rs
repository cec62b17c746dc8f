use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    ReportResponseDto, StatusHistoryResponseDto, TrackingResponseDto, UpdateReportStatusDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta};

/// List reports for the authenticated user
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "List of user's reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_mine(&user).await?;
    let total = reports.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Get the status history of a report, oldest first
#[utoipa::path(
    get,
    path = "/api/reports/{id}/history",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Status history", body = ApiResponse<Vec<StatusHistoryResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report_history(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<StatusHistoryResponseDto>>>> {
    let history = service.history(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(history), None, None)))
}

/// Update report status (staff only)
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Transition not allowed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report changed concurrently")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireStaff(staff): RequireStaff,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.update_status(&staff, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(report),
        Some("Report status updated".to_string()),
        None,
    )))
}

/// Track a report by its tracking code (public)
#[utoipa::path(
    get,
    path = "/api/reports/track/{tracking_code}",
    params(
        ("tracking_code" = String, Path, description = "Tracking code, e.g. RPT-20240315-0042")
    ),
    responses(
        (status = 200, description = "Report status", body = ApiResponse<TrackingResponseDto>),
        (status = 400, description = "Malformed tracking code"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn track_report(
    State(service): State<Arc<ReportService>>,
    Path(tracking_code): Path<String>,
) -> Result<Json<ApiResponse<TrackingResponseDto>>> {
    let tracked = service.track(&tracking_code).await?;
    Ok(Json(ApiResponse::success(Some(tracked), None, None)))
}
