use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::guards::RequireStaff;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

// ============================================================================
// Summary
// ============================================================================

/// Get dashboard header numbers
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<DashboardSummaryDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_summary(
    _staff: RequireStaff,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardSummaryDto>>, AppError> {
    let summary = service.get_summary().await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}

// ============================================================================
// Grouped views
// ============================================================================

/// Report counts per active category
#[utoipa::path(
    get,
    path = "/api/dashboard/by-category",
    tag = "dashboard",
    responses(
        (status = 200, description = "Counts per category", body = ApiResponse<Vec<CategoryCountDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_by_category(
    _staff: RequireStaff,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<Vec<CategoryCountDto>>>, AppError> {
    let data = service.get_by_category().await?;
    let total = data.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(data),
        None,
        Some(Meta { total }),
    )))
}

/// Report counts per status
#[utoipa::path(
    get,
    path = "/api/dashboard/by-status",
    tag = "dashboard",
    responses(
        (status = 200, description = "Counts per status", body = ApiResponse<Vec<StatusCountDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_by_status(
    _staff: RequireStaff,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<Vec<StatusCountDto>>>, AppError> {
    let data = service.get_by_status().await?;
    Ok(Json(ApiResponse::success(Some(data), None, None)))
}

// ============================================================================
// Recent Reports
// ============================================================================

/// Latest reports, newest first
#[utoipa::path(
    get,
    path = "/api/dashboard/recent",
    tag = "dashboard",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Recent reports", body = ApiResponse<DashboardRecentDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_recent(
    _staff: RequireStaff,
    State(service): State<Arc<DashboardService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<DashboardRecentDto>>, AppError> {
    let data = service.get_recent(&params).await?;
    Ok(Json(ApiResponse::success(Some(data), None, None)))
}

// ============================================================================
// Trend
// ============================================================================

/// Reports per day over the last `days` days
#[utoipa::path(
    get,
    path = "/api/dashboard/trend",
    tag = "dashboard",
    params(TrendQueryParams),
    responses(
        (status = 200, description = "Daily report counts", body = ApiResponse<DashboardTrendDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_trend(
    _staff: RequireStaff,
    State(service): State<Arc<DashboardService>>,
    Query(params): Query<TrendQueryParams>,
) -> Result<Json<ApiResponse<DashboardTrendDto>>, AppError> {
    let data = service.get_trend(&params).await?;
    Ok(Json(ApiResponse::success(Some(data), None, None)))
}
