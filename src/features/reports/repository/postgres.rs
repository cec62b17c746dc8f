use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::ReportRepository;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::categories::services::CATEGORY_COLUMNS;
use crate::features::reports::models::{
    format_tracking_code, CreateReport, PointFilter, Report, ReportPoint, ReportStatus,
    StatusHistoryEntry, StatusTransition,
};

const REPORT_COLUMNS: &str = "id, tracking_code, category_id, user_id, description, address, \
     latitude, longitude, photo_url, status, priority, created_at, updated_at";

const HISTORY_COLUMNS: &str = "id, report_id, status, comment, changed_by, created_at";

/// PostgreSQL-backed report repository
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(action: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| {
        tracing::error!("Failed to {}: {:?}", action, e);
        AppError::Database(e)
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn find_category(&self, id: Uuid) -> Result<Option<Category>> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);

        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get category"))
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let query = format!("SELECT {} FROM categories WHERE slug = $1", CATEGORY_COLUMNS);

        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get category by slug"))
    }

    async fn create(&self, data: &CreateReport) -> Result<Report> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let sequence: i64 = sqlx::query_scalar("SELECT nextval('report_tracking_seq')")
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("get next tracking sequence"))?;
        let tracking_code = format_tracking_code(Utc::now().date_naive(), sequence);

        let insert_report = format!(
            r#"
            INSERT INTO reports (
                tracking_code, category_id, user_id, description, address,
                latitude, longitude, photo_url, status, priority
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'new', $9)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&insert_report)
            .bind(&tracking_code)
            .bind(data.category_id)
            .bind(&data.user_id)
            .bind(&data.description)
            .bind(&data.address)
            .bind(data.latitude)
            .bind(data.longitude)
            .bind(&data.photo_url)
            .bind(data.priority)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("create report"))?;

        sqlx::query(
            r#"
            INSERT INTO report_status_history (report_id, status, comment)
            VALUES ($1, 'new', 'Report submitted')
            "#,
        )
        .bind(report.id)
        .execute(&mut *tx)
        .await
        .map_err(db_error("create initial status history"))?;

        tx.commit().await.map_err(db_error("commit report"))?;

        tracing::info!(
            "Created report: {} ({}) for user: {}",
            report.id,
            report.tracking_code,
            report.user_id
        );

        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        let query = format!("SELECT {} FROM reports WHERE id = $1", REPORT_COLUMNS);

        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get report"))
    }

    async fn find_by_tracking_code(&self, tracking_code: &str) -> Result<Option<Report>> {
        let query = format!(
            "SELECT {} FROM reports WHERE tracking_code = $1",
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, Report>(&query)
            .bind(tracking_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get report by tracking code"))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Report>> {
        let query = format!(
            "SELECT {} FROM reports WHERE user_id = $1 ORDER BY created_at DESC",
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, Report>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list reports by user"))
    }

    async fn list_history(&self, report_id: Uuid) -> Result<Vec<StatusHistoryEntry>> {
        let query = format!(
            "SELECT {} FROM report_status_history WHERE report_id = $1 ORDER BY created_at, id",
            HISTORY_COLUMNS
        );

        sqlx::query_as::<_, StatusHistoryEntry>(&query)
            .bind(report_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list status history"))
    }

    async fn apply_transition(
        &self,
        report_id: Uuid,
        transition: &StatusTransition,
    ) -> Result<Option<Report>> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let update = format!(
            r#"
            UPDATE reports
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&update)
            .bind(report_id)
            .bind(transition.from)
            .bind(transition.to)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("update report status"))?;

        let Some(report) = report else {
            tx.rollback().await.map_err(db_error("rollback status update"))?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO report_status_history (report_id, status, comment, changed_by)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(report_id)
        .bind(transition.to)
        .bind(&transition.comment)
        .bind(&transition.changed_by)
        .execute(&mut *tx)
        .await
        .map_err(db_error("append status history"))?;

        tx.commit().await.map_err(db_error("commit status update"))?;

        tracing::info!(
            "Report {} moved from {} to {} by {}",
            report_id,
            transition.from,
            transition.to,
            transition.changed_by
        );

        Ok(Some(report))
    }

    async fn list_points(&self, filter: &PointFilter) -> Result<Vec<ReportPoint>> {
        sqlx::query_as::<_, ReportPoint>(
            r#"
            SELECT
                r.id, r.tracking_code, r.latitude, r.longitude, r.status, r.priority,
                c.slug AS category_slug, c.icon AS category_icon, c.color AS category_color
            FROM reports r
            JOIN categories c ON c.id = r.category_id
            WHERE ($1::text IS NULL OR c.slug = $1)
              AND ($2::report_status IS NULL OR r.status = $2)
              AND (NOT $3 OR r.status <> $4)
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(&filter.category_slug)
        .bind(filter.status)
        .bind(filter.exclude_rejected)
        .bind(ReportStatus::Rejected)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list map points"))
    }
}
