use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::icon_emoji;
use crate::features::dashboard::dtos::*;
use crate::features::reports::models::ReportStatus;
use crate::shared::types::PaginationQuery;

/// Aggregate queries behind the staff dashboard
pub struct DashboardService {
    pool: PgPool,
}

fn db_error(action: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("Failed to {}: {:?}", action, e);
        AppError::Database(e)
    }
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Summary
    // ========================================================================

    pub async fn get_summary(&self) -> Result<DashboardSummaryDto> {
        let (total_reports, reports_this_week, reports_this_month): (i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE created_at >= date_trunc('week', CURRENT_DATE)),
                    COUNT(*) FILTER (WHERE created_at >= date_trunc('month', CURRENT_DATE))
                FROM reports
                "#,
            )
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("get summary counts"))?;

        Ok(DashboardSummaryDto {
            total_reports,
            by_status: self.get_by_status().await?,
            reports_this_week,
            reports_this_month,
        })
    }

    // ========================================================================
    // By Status
    // ========================================================================

    /// Count per status, including statuses with no reports
    pub async fn get_by_status(&self) -> Result<Vec<StatusCountDto>> {
        let rows: Vec<(ReportStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM reports GROUP BY status")
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("count reports by status"))?;

        Ok(fill_status_counts(rows))
    }

    // ========================================================================
    // By Category
    // ========================================================================

    /// Counts for every active category, in display order
    pub async fn get_by_category(&self) -> Result<Vec<CategoryCountDto>> {
        let rows = sqlx::query_as::<_, CategoryCountRow>(
            r#"
            SELECT
                c.id, c.name, c.slug, c.icon, c.color,
                COUNT(r.id) AS total,
                COUNT(r.id) FILTER (WHERE r.status NOT IN ('resolved', 'rejected')) AS open,
                COUNT(r.id) FILTER (WHERE r.status = 'resolved') AS resolved
            FROM categories c
            LEFT JOIN reports r ON r.category_id = c.id
            WHERE c.is_active = true
            GROUP BY c.id
            ORDER BY c.display_order, c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("count reports by category"))?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryCountDto {
                emoji: icon_emoji(row.icon.as_deref()).to_string(),
                category_id: row.id,
                name: row.name,
                slug: row.slug,
                color: row.color,
                total: row.total,
                open: row.open,
                resolved: row.resolved,
            })
            .collect())
    }

    // ========================================================================
    // Recent Reports
    // ========================================================================

    pub async fn get_recent(&self, params: &PaginationQuery) -> Result<DashboardRecentDto> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count reports"))?;

        let reports = sqlx::query_as::<_, DashboardReportDto>(
            r#"
            SELECT
                r.id, r.tracking_code,
                c.slug AS category_slug, c.name AS category_name,
                r.description, r.address, r.latitude, r.longitude,
                r.status, r.priority, r.created_at
            FROM reports r
            JOIN categories c ON c.id = r.category_id
            ORDER BY r.created_at DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(params.offset())
        .bind(params.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch recent reports"))?;

        Ok(DashboardRecentDto {
            reports,
            pagination: PaginationMeta::new(params.page, params.page_size, total),
        })
    }

    // ========================================================================
    // Trend
    // ========================================================================

    pub async fn get_trend(&self, params: &TrendQueryParams) -> Result<DashboardTrendDto> {
        let days = params.days();
        let today = Utc::now().date_naive();
        let since = today - Duration::days(days - 1);

        let rows = sqlx::query_as::<_, DailyCountDto>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS date, COUNT(*) AS count
            FROM reports
            WHERE created_at >= $1::date
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch report trend"))?;

        let daily = fill_daily_counts(rows, since, today);
        Ok(DashboardTrendDto {
            days,
            total: daily.iter().map(|d| d.count).sum(),
            daily,
        })
    }
}

fn fill_status_counts(rows: Vec<(ReportStatus, i64)>) -> Vec<StatusCountDto> {
    let counts: HashMap<ReportStatus, i64> = rows.into_iter().collect();
    ReportStatus::ALL
        .iter()
        .map(|status| StatusCountDto {
            status: *status,
            count: counts.get(status).copied().unwrap_or(0),
        })
        .collect()
}

/// One entry per day in `[since, until]`, zero where nothing was reported
fn fill_daily_counts(
    rows: Vec<DailyCountDto>,
    since: NaiveDate,
    until: NaiveDate,
) -> Vec<DailyCountDto> {
    let counts: HashMap<NaiveDate, i64> = rows.into_iter().map(|r| (r.date, r.count)).collect();
    since
        .iter_days()
        .take_while(|date| *date <= until)
        .map(|date| DailyCountDto {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_counts_include_empty_statuses() {
        let counts = fill_status_counts(vec![
            (ReportStatus::Resolved, 4),
            (ReportStatus::New, 2),
        ]);

        assert_eq!(counts.len(), ReportStatus::ALL.len());
        assert_eq!(
            counts[0],
            StatusCountDto {
                status: ReportStatus::New,
                count: 2
            }
        );
        assert_eq!(counts[1].count, 0);
        assert_eq!(counts[4].count, 4);
    }

    #[test]
    fn test_daily_counts_are_zero_filled() {
        let daily = fill_daily_counts(
            vec![
                DailyCountDto {
                    date: date(2026, 2, 27),
                    count: 3,
                },
                DailyCountDto {
                    date: date(2026, 3, 2),
                    count: 1,
                },
            ],
            date(2026, 2, 27),
            date(2026, 3, 2),
        );

        let counts: Vec<i64> = daily.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![3, 0, 0, 1]);
        assert_eq!(daily.last().unwrap().date, date(2026, 3, 2));
    }

    #[test]
    fn test_daily_counts_cover_leap_day() {
        let daily = fill_daily_counts(
            vec![DailyCountDto {
                date: date(2028, 2, 29),
                count: 2,
            }],
            date(2028, 2, 27),
            date(2028, 3, 1),
        );

        let counts: Vec<i64> = daily.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![0, 0, 2, 0]);
        assert_eq!(daily[2].date, date(2028, 2, 29));
    }

    #[test]
    fn test_single_day_window() {
        let daily = fill_daily_counts(vec![], date(2026, 10, 18), date(2026, 10, 18));
        assert_eq!(
            daily,
            vec![DailyCountDto {
                date: date(2026, 10, 18),
                count: 0
            }]
        );
    }
}
