use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, ReportPriority};
use crate::features::reports::repository::ReportRepository;
use crate::features::reports::services::ReportService;
use crate::features::submissions::dtos::{DraftResponseDto, SubmissionReceiptDto};
use crate::features::submissions::error::WizardError;
use crate::features::submissions::models::{DraftPhoto, ReportDraft, SubmissionReceipt};
use crate::features::submissions::store::DraftStore;
use crate::modules::storage::ObjectStorage;

/// All fields of a report in one request
#[derive(Debug, Clone)]
pub struct NewReportForm {
    pub category_id: Uuid,
    pub photos: Vec<DraftPhoto>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub description: String,
}

/// Drives report drafts through the wizard and performs the submit
pub struct SubmissionService {
    store: Arc<DraftStore>,
    reports: Arc<ReportService>,
    repo: Arc<dyn ReportRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl SubmissionService {
    pub fn new(
        store: Arc<DraftStore>,
        reports: Arc<ReportService>,
        repo: Arc<dyn ReportRepository>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            store,
            reports,
            repo,
            storage,
        }
    }

    pub async fn start_draft(&self, owner: &str) -> Result<DraftResponseDto> {
        let draft = self.store.insert(ReportDraft::new(owner)).await?;
        info!("Draft {} started by {}", draft.id, owner);
        Ok(draft.into())
    }

    pub async fn get_draft(&self, owner: &str, id: Uuid) -> Result<DraftResponseDto> {
        self.store.get(owner, id).await.map(Into::into)
    }

    pub async fn discard_draft(&self, owner: &str, id: Uuid) -> Result<()> {
        self.store.remove(owner, id).await?;
        info!("Draft {} discarded", id);
        Ok(())
    }

    pub async fn select_category(
        &self,
        owner: &str,
        id: Uuid,
        category_id: Uuid,
    ) -> Result<DraftResponseDto> {
        self.ensure_category_active(category_id).await?;
        let (draft, _) = self
            .store
            .update(owner, id, |d| d.select_category(category_id))
            .await?;
        Ok(draft.into())
    }

    pub async fn attach_photo(
        &self,
        owner: &str,
        id: Uuid,
        photo: DraftPhoto,
    ) -> Result<DraftResponseDto> {
        let (draft, _) = self.store.update(owner, id, |d| d.attach_photo(photo)).await?;
        Ok(draft.into())
    }

    pub async fn remove_photo(
        &self,
        owner: &str,
        id: Uuid,
        index: usize,
    ) -> Result<DraftResponseDto> {
        let (draft, _) = self.store.update(owner, id, |d| d.remove_photo(index)).await?;
        Ok(draft.into())
    }

    pub async fn set_location(
        &self,
        owner: &str,
        id: Uuid,
        latitude: f64,
        longitude: f64,
        address: Option<String>,
    ) -> Result<DraftResponseDto> {
        let (draft, _) = self
            .store
            .update(owner, id, |d| d.set_location(latitude, longitude, address))
            .await?;
        Ok(draft.into())
    }

    pub async fn set_description(
        &self,
        owner: &str,
        id: Uuid,
        description: &str,
    ) -> Result<DraftResponseDto> {
        let (draft, _) = self
            .store
            .update(owner, id, |d| d.set_description(description))
            .await?;
        Ok(draft.into())
    }

    pub async fn next(&self, owner: &str, id: Uuid) -> Result<DraftResponseDto> {
        let (draft, _) = self.store.update(owner, id, |d| d.advance()).await?;
        Ok(draft.into())
    }

    pub async fn back(&self, owner: &str, id: Uuid) -> Result<DraftResponseDto> {
        let (draft, _) = self.store.update(owner, id, |d| d.back()).await?;
        Ok(draft.into())
    }

    /// Submit a draft under review.
    ///
    /// Every step is re-checked before anything leaves the process. The
    /// first photo is uploaded, then the report and its initial history
    /// entry are inserted. If the insert fails the uploaded photo is
    /// deleted again. On any failure the draft stays in review with
    /// `last_error` set, including when this future is dropped midway.
    pub async fn submit(&self, owner: &str, id: Uuid) -> Result<SubmissionReceiptDto> {
        let (draft, started) = self
            .store
            .update_recording(owner, id, |d| d.begin_submit())
            .await?;
        started?;

        let mut guard = SubmitGuard::new(Arc::clone(&self.store), owner, id);
        let written = self.write_report(&draft).await;

        match written {
            Ok(receipt) => {
                guard.written(receipt.clone());
                let recorded = self
                    .store
                    .update(owner, id, |d| {
                        d.complete_submit(receipt.clone());
                        Ok::<_, WizardError>(())
                    })
                    .await;
                guard.disarm();
                recorded?;

                info!(
                    "Draft {} submitted as report {} ({})",
                    id, receipt.report_id, receipt.tracking_code
                );
                Ok(receipt.into())
            }
            Err(e) => {
                let message = match &e {
                    AppError::Database(_) => "Could not save the report".to_string(),
                    other => other.to_string(),
                };
                let recorded = self
                    .store
                    .update(owner, id, |d| {
                        d.fail_submit(message);
                        Ok::<_, WizardError>(())
                    })
                    .await;
                guard.disarm();
                recorded?;
                Err(e)
            }
        }
    }

    /// Run a complete form through every wizard step and submit it
    pub async fn create_report(
        &self,
        owner: &str,
        form: NewReportForm,
    ) -> Result<SubmissionReceiptDto> {
        self.ensure_category_active(form.category_id).await?;

        let mut draft = ReportDraft::new(owner);
        draft.select_category(form.category_id)?;
        draft.advance()?;
        for photo in form.photos {
            draft.attach_photo(photo)?;
        }
        draft.advance()?;
        draft.set_location(form.latitude, form.longitude, form.address)?;
        draft.advance()?;
        draft.set_description(&form.description)?;
        draft.advance()?;

        let id = self.store.insert(draft).await?.id;
        let result = self.submit(owner, id).await;
        if let Err(e) = self.store.remove(owner, id).await {
            warn!("Could not drop one-shot draft {}: {}", id, e);
        }
        result
    }

    async fn ensure_category_active(&self, category_id: Uuid) -> Result<()> {
        match self.repo.find_category(category_id).await? {
            Some(category) if category.is_active => Ok(()),
            _ => Err(WizardError::CategoryUnavailable.into()),
        }
    }

    async fn write_report(&self, draft: &ReportDraft) -> Result<SubmissionReceipt> {
        // begin_submit has checked all of these
        let (category_id, location, description, photo) = match (
            draft.category_id,
            draft.location,
            draft.description.as_deref(),
            draft.photos.first(),
        ) {
            (Some(c), Some(l), Some(d), Some(p)) => (c, l, d, p),
            _ => return Err(AppError::Internal("Draft is incomplete".to_string())),
        };

        self.ensure_category_active(category_id).await?;

        let path = format!(
            "reports/{}/{}/{}.{}",
            draft.owner,
            draft.id,
            Uuid::now_v7(),
            photo.extension()
        );
        let stored = self
            .storage
            .put_public(&path, &photo.data, &photo.content_type)
            .await
            .map_err(|e| {
                error!("Photo upload failed for draft {}: {}", draft.id, e);
                e
            })?;

        let data = CreateReport {
            user_id: draft.owner.clone(),
            category_id,
            description: description.to_string(),
            address: draft.address.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            photo_url: stored.url.clone(),
            priority: ReportPriority::default(),
        };

        let report = match self.reports.create(&data).await {
            Ok(report) => report,
            Err(e) => {
                error!("Report insert failed for draft {}: {}", draft.id, e);
                if let Err(cleanup) = self.storage.delete(&stored.key).await {
                    warn!("Could not remove orphaned photo '{}': {}", stored.key, cleanup);
                }
                return Err(e);
            }
        };

        Ok(SubmissionReceipt {
            report_id: report.id,
            tracking_code: report.tracking_code,
            status: report.status,
            photo_url: report.photo_url,
            created_at: report.created_at,
        })
    }
}

/// Settles a draft whose submit future was dropped before it recorded the
/// outcome (client disconnect, request timeout). Without it the draft would
/// stay locked in `submitting` until the TTL runs out.
struct SubmitGuard {
    store: Arc<DraftStore>,
    owner: String,
    id: Uuid,
    receipt: Option<SubmissionReceipt>,
    armed: bool,
}

impl SubmitGuard {
    fn new(store: Arc<DraftStore>, owner: &str, id: Uuid) -> Self {
        Self {
            store,
            owner: owner.to_string(),
            id,
            receipt: None,
            armed: true,
        }
    }

    /// The report exists; an interruption from here on completes the draft
    fn written(&mut self, receipt: SubmissionReceipt) {
        self.receipt = Some(receipt);
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let id = self.id;
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!("Submit of draft {} interrupted outside a runtime", id);
            return;
        };
        warn!("Submit of draft {} was interrupted", id);

        let store = Arc::clone(&self.store);
        let owner = std::mem::take(&mut self.owner);
        let receipt = self.receipt.take();
        runtime.spawn(async move {
            let settled = store
                .update(&owner, id, |d| {
                    if d.submitting {
                        match receipt {
                            Some(receipt) => d.complete_submit(receipt),
                            None => d.fail_submit("Submission was interrupted".to_string()),
                        }
                    }
                    Ok::<_, WizardError>(())
                })
                .await;
            if let Err(e) = settled {
                debug!("Interrupted draft {} is gone: {}", id, e);
            }
        });
    }
}
