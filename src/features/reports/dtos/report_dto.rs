use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::features::reports::models::{Report, ReportPriority, ReportStatus, StatusHistoryEntry};

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub tracking_code: String,
    pub category_id: Uuid,
    pub description: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub photo_url: String,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            tracking_code: r.tracking_code,
            category_id: r.category_id,
            description: r.description,
            address: r.address,
            latitude: r.latitude,
            longitude: r.longitude,
            photo_url: r.photo_url,
            status: r.status,
            priority: r.priority,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Response DTO for a status history entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusHistoryResponseDto {
    pub status: ReportStatus,
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<StatusHistoryEntry> for StatusHistoryResponseDto {
    fn from(h: StatusHistoryEntry) -> Self {
        Self {
            status: h.status,
            comment: h.comment,
            changed_by: h.changed_by,
            created_at: h.created_at,
        }
    }
}

/// Category summary shown on the public tracking page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrackedCategoryDto {
    pub name: String,
    pub slug: String,
    pub emoji: String,
}

impl From<Category> for TrackedCategoryDto {
    fn from(c: Category) -> Self {
        let emoji = c.emoji().to_string();
        Self {
            name: c.name,
            slug: c.slug,
            emoji,
        }
    }
}

/// Public view of a report looked up by tracking code; carries no owner data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrackingResponseDto {
    pub tracking_code: String,
    pub status: ReportStatus,
    pub category: Option<TrackedCategoryDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<StatusHistoryResponseDto>,
}

/// Request DTO for a staff status change
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,

    #[validate(length(max = 500, message = "Comment must not exceed 500 characters"))]
    pub comment: Option<String>,
}
