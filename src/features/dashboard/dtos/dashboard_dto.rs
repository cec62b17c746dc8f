use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::reports::models::{ReportPriority, ReportStatus};
use crate::shared::constants::MAX_PAGE_SIZE;

/// Default window of the trend chart in days
pub const DEFAULT_TREND_DAYS: i64 = 30;

/// Longest trend window in days
pub const MAX_TREND_DAYS: i64 = 365;

// ============================================================================
// Pagination
// ============================================================================

/// Pagination metadata for response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(page: i64, page_size: i64, total_items: i64) -> Self {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let total_pages = (total_items + page_size - 1) / page_size;
        Self {
            page: page.max(1),
            page_size,
            total_items,
            total_pages,
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusCountDto {
    pub status: ReportStatus,
    pub count: i64,
}

/// Header numbers of the staff dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummaryDto {
    pub total_reports: i64,
    pub by_status: Vec<StatusCountDto>,
    pub reports_this_week: i64,
    pub reports_this_month: i64,
}

// ============================================================================
// By Category
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct CategoryCountRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub total: i64,
    pub open: i64,
    pub resolved: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryCountDto {
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub emoji: String,
    pub color: Option<String>,
    pub total: i64,
    /// Neither resolved nor rejected
    pub open: i64,
    pub resolved: i64,
}

// ============================================================================
// Recent
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DashboardReportDto {
    pub id: Uuid,
    pub tracking_code: String,
    pub category_slug: String,
    pub category_name: String,
    pub description: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardRecentDto {
    pub reports: Vec<DashboardReportDto>,
    pub pagination: PaginationMeta,
}

// ============================================================================
// Trend
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TrendQueryParams {
    /// Days to include, ending today (default: 30, max: 365)
    #[param(minimum = 1, maximum = 365)]
    pub days: Option<i64>,
}

impl TrendQueryParams {
    pub fn days(&self) -> i64 {
        self.days
            .unwrap_or(DEFAULT_TREND_DAYS)
            .clamp(1, MAX_TREND_DAYS)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DailyCountDto {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardTrendDto {
    pub days: i64,
    pub total: i64,
    /// One entry per day, oldest first, zero-filled
    pub daily: Vec<DailyCountDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(2, 10, 25);
        assert_eq!(meta.total_pages, 3);

        let meta = PaginationMeta::new(1, 500, 0);
        assert_eq!(meta.page_size, MAX_PAGE_SIZE);
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn test_trend_days_defaults_and_clamps() {
        assert_eq!(TrendQueryParams::default().days(), 30);
        assert_eq!(TrendQueryParams { days: Some(7) }.days(), 7);
        assert_eq!(TrendQueryParams { days: Some(1000) }.days(), 365);
        assert_eq!(TrendQueryParams { days: Some(0) }.days(), 1);
    }
}
