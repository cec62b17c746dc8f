use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::ReportStatus;

/// Append-only status log row
#[derive(Debug, Clone, FromRow)]
pub struct StatusHistoryEntry {
    pub id: Uuid,
    pub report_id: Uuid,
    pub status: ReportStatus,
    pub comment: Option<String>,
    /// Subject of the staff member who made the change; `None` for system entries
    pub changed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A status change to apply together with its history row
#[derive(Debug, Clone)]
pub struct StatusTransition {
    pub from: ReportStatus,
    pub to: ReportStatus,
    pub comment: Option<String>,
    pub changed_by: String,
}
