mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgReportRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::Category;
use crate::features::reports::models::{
    CreateReport, PointFilter, Report, ReportPoint, StatusHistoryEntry, StatusTransition,
};

/// Persistence seam for reports and their status history.
///
/// Report rows and history rows are always written together: `create`
/// inserts the initial `new` entry and `apply_transition` appends the entry
/// for the new status, each inside one transaction.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn find_category(&self, id: Uuid) -> Result<Option<Category>>;

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// Allocate a tracking code and insert the report with its first history row
    async fn create(&self, data: &CreateReport) -> Result<Report>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>>;

    async fn find_by_tracking_code(&self, tracking_code: &str) -> Result<Option<Report>>;

    /// Newest first
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Report>>;

    /// Oldest first
    async fn list_history(&self, report_id: Uuid) -> Result<Vec<StatusHistoryEntry>>;

    /// Move the report from `transition.from` to `transition.to`.
    ///
    /// Returns `None` when the report does not exist or is no longer in
    /// `transition.from`.
    async fn apply_transition(
        &self,
        report_id: Uuid,
        transition: &StatusTransition,
    ) -> Result<Option<Report>>;

    async fn list_points(&self, filter: &PointFilter) -> Result<Vec<ReportPoint>>;
}
