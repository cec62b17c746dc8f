//! In-memory repository for tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::ReportRepository;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::reports::models::{
    format_tracking_code, CreateReport, PointFilter, Report, ReportPoint, ReportStatus,
    StatusHistoryEntry, StatusTransition,
};

pub struct InMemoryReportRepository {
    pub categories: Mutex<Vec<Category>>,
    pub reports: Mutex<Vec<Report>>,
    pub history: Mutex<Vec<StatusHistoryEntry>>,
    pub fail_writes: AtomicBool,
    sequence: AtomicI64,
}

impl Default for InMemoryReportRepository {
    fn default() -> Self {
        let now = Utc::now();
        let category = |slug: &str, name: &str, icon: &str, color: &str, order: i32| Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            icon: Some(icon.to_string()),
            color: Some(color.to_string()),
            display_order: order,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let mut retired = category("graffiti", "Graffiti", "warning", "#7f8c8d", 9);
        retired.is_active = false;

        Self {
            categories: Mutex::new(vec![
                category("pothole", "Pothole", "pothole", "#e67e22", 1),
                category("lighting", "Street lighting", "lightbulb", "#f1c40f", 2),
                category("trash", "Trash", "trash", "#27ae60", 3),
                category("water", "Water leak", "droplet", "#3498db", 4),
                retired,
            ]),
            reports: Mutex::new(vec![]),
            history: Mutex::new(vec![]),
            fail_writes: AtomicBool::new(false),
            sequence: AtomicI64::new(0),
        }
    }
}

impl InMemoryReportRepository {
    pub fn category_id(&self, slug: &str) -> Uuid {
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .map(|c| c.id)
            .expect("seeded category")
    }

    pub fn report_count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn push_history(
        &self,
        report_id: Uuid,
        status: ReportStatus,
        comment: Option<String>,
        changed_by: Option<String>,
    ) {
        self.history.lock().unwrap().push(StatusHistoryEntry {
            id: Uuid::new_v4(),
            report_id,
            status,
            comment,
            changed_by,
            created_at: Utc::now(),
        });
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn find_category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn create(&self, data: &CreateReport) -> Result<Report> {
        self.check_writable()?;

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let report = Report {
            id: Uuid::new_v4(),
            tracking_code: format_tracking_code(now.date_naive(), sequence),
            category_id: data.category_id,
            user_id: data.user_id.clone(),
            description: data.description.clone(),
            address: data.address.clone(),
            latitude: data.latitude,
            longitude: data.longitude,
            photo_url: data.photo_url.clone(),
            status: ReportStatus::New,
            priority: data.priority,
            created_at: now,
            updated_at: now,
        };

        self.reports.lock().unwrap().push(report.clone());
        self.push_history(report.id, ReportStatus::New, Some("Report submitted".into()), None);
        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        Ok(self.reports.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_tracking_code(&self, tracking_code: &str) -> Result<Option<Report>> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.tracking_code == tracking_code)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Report>> {
        let mut reports: Vec<Report> = self
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        reports.reverse();
        Ok(reports)
    }

    async fn list_history(&self, report_id: Uuid) -> Result<Vec<StatusHistoryEntry>> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.report_id == report_id)
            .cloned()
            .collect())
    }

    async fn apply_transition(
        &self,
        report_id: Uuid,
        transition: &StatusTransition,
    ) -> Result<Option<Report>> {
        self.check_writable()?;

        let updated = {
            let mut reports = self.reports.lock().unwrap();
            match reports
                .iter_mut()
                .find(|r| r.id == report_id && r.status == transition.from)
            {
                Some(report) => {
                    report.status = transition.to;
                    report.updated_at = Utc::now();
                    report.clone()
                }
                None => return Ok(None),
            }
        };

        self.push_history(
            report_id,
            transition.to,
            transition.comment.clone(),
            Some(transition.changed_by.clone()),
        );
        Ok(Some(updated))
    }

    async fn list_points(&self, filter: &PointFilter) -> Result<Vec<ReportPoint>> {
        let categories = self.categories.lock().unwrap();
        let reports = self.reports.lock().unwrap();

        Ok(reports
            .iter()
            .rev()
            .filter_map(|r| {
                let category = categories.iter().find(|c| c.id == r.category_id)?;
                Some((r, category))
            })
            .filter(|(r, c)| {
                filter
                    .category_slug
                    .as_deref()
                    .map_or(true, |slug| c.slug == slug)
                    && filter.status.map_or(true, |s| r.status == s)
                    && !(filter.exclude_rejected && r.status == ReportStatus::Rejected)
            })
            .map(|(r, c)| ReportPoint {
                id: r.id,
                tracking_code: r.tracking_code.clone(),
                latitude: r.latitude,
                longitude: r.longitude,
                status: r.status,
                priority: r.priority,
                category_slug: c.slug.clone(),
                category_icon: c.icon.clone(),
                category_color: c.color.clone(),
            })
            .collect())
    }
}
