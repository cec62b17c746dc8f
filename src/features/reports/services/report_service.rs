use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    ReportResponseDto, StatusHistoryResponseDto, TrackingResponseDto, UpdateReportStatusDto,
};
use crate::features::reports::models::{
    is_valid_tracking_code, CreateReport, Report, StatusTransition,
};
use crate::features::reports::repository::ReportRepository;

/// Service for report operations
pub struct ReportService {
    repo: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(repo: Arc<dyn ReportRepository>) -> Self {
        Self { repo }
    }

    /// Insert a report with its initial `new` history entry
    pub async fn create(&self, data: &CreateReport) -> Result<Report> {
        self.repo.create(data).await
    }

    /// The caller's reports, newest first
    pub async fn list_mine(&self, user: &AuthenticatedUser) -> Result<Vec<ReportResponseDto>> {
        let reports = self.repo.list_by_user(&user.sub).await?;
        Ok(reports.into_iter().map(Into::into).collect())
    }

    /// Get a report visible to the caller (owner or staff)
    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ReportResponseDto> {
        self.find_visible(user, id).await.map(Into::into)
    }

    /// Status history of a report visible to the caller, oldest first
    pub async fn history(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Vec<StatusHistoryResponseDto>> {
        let report = self.find_visible(user, id).await?;
        let history = self.repo.list_history(report.id).await?;

        Ok(history
            .into_iter()
            .map(|entry| {
                let mut dto = StatusHistoryResponseDto::from(entry);
                if !user.is_staff() {
                    dto.changed_by = None;
                }
                dto
            })
            .collect())
    }

    /// Public lookup by tracking code
    pub async fn track(&self, tracking_code: &str) -> Result<TrackingResponseDto> {
        let tracking_code = tracking_code.trim().to_ascii_uppercase();
        if !is_valid_tracking_code(&tracking_code) {
            return Err(AppError::Validation(format!(
                "Invalid tracking code '{}'",
                tracking_code
            )));
        }

        let report = self
            .repo
            .find_by_tracking_code(&tracking_code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", tracking_code)))?;

        let category = self.repo.find_category(report.category_id).await?;
        let history = self.repo.list_history(report.id).await?;

        Ok(TrackingResponseDto {
            tracking_code: report.tracking_code,
            status: report.status,
            category: category.map(Into::into),
            created_at: report.created_at,
            updated_at: report.updated_at,
            history: history
                .into_iter()
                .map(|entry| StatusHistoryResponseDto {
                    changed_by: None,
                    ..StatusHistoryResponseDto::from(entry)
                })
                .collect(),
        })
    }

    /// Staff status change; report row and history entry are written together
    pub async fn update_status(
        &self,
        staff: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateReportStatusDto,
    ) -> Result<ReportResponseDto> {
        let report = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        if !report.status.can_transition_to(dto.status) {
            return Err(AppError::Validation(format!(
                "Cannot change status from {} to {}",
                report.status, dto.status
            )));
        }

        let transition = StatusTransition {
            from: report.status,
            to: dto.status,
            comment: dto
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            changed_by: staff.sub.clone(),
        };

        let updated = self
            .repo
            .apply_transition(id, &transition)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!("Report {} was updated by someone else", id))
            })?;

        Ok(updated.into())
    }

    async fn find_visible(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Report> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|r| r.user_id == user.sub || user.is_staff())
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }
}
