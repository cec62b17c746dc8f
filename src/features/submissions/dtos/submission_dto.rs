use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::ReportStatus;
use crate::features::submissions::models::{ReportDraft, SubmissionReceipt, WizardStep};

/// Photo metadata; the bytes stay on the server until submit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DraftPhotoDto {
    pub index: usize,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DraftLocationDto {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

/// Result of a successful submit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionReceiptDto {
    pub report_id: Uuid,
    #[schema(example = "RPT-20261018-0042")]
    pub tracking_code: String,
    pub status: ReportStatus,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<SubmissionReceipt> for SubmissionReceiptDto {
    fn from(r: SubmissionReceipt) -> Self {
        Self {
            report_id: r.report_id,
            tracking_code: r.tracking_code,
            status: r.status,
            photo_url: r.photo_url,
            created_at: r.created_at,
        }
    }
}

/// Wizard state as shown to the client.
///
/// `can_advance` is false whenever the current step is incomplete, so the
/// client keeps its "next" control disabled.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DraftResponseDto {
    pub id: Uuid,
    pub step: WizardStep,
    pub can_advance: bool,
    pub can_submit: bool,
    pub category_id: Option<Uuid>,
    pub photos: Vec<DraftPhotoDto>,
    pub location: Option<DraftLocationDto>,
    pub description: Option<String>,
    /// Set once the draft reaches `submitted`
    pub receipt: Option<SubmissionReceiptDto>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReportDraft> for DraftResponseDto {
    fn from(d: ReportDraft) -> Self {
        let can_advance = d.can_advance();
        let can_submit = d.can_submit();
        Self {
            id: d.id,
            step: d.step,
            can_advance,
            can_submit,
            category_id: d.category_id,
            photos: d
                .photos
                .iter()
                .enumerate()
                .map(|(index, p)| DraftPhotoDto {
                    index,
                    filename: p.filename.clone(),
                    content_type: p.content_type.clone(),
                    size: p.data.len(),
                })
                .collect(),
            location: d.location.map(|l| DraftLocationDto {
                latitude: l.latitude,
                longitude: l.longitude,
                address: d.address.clone(),
            }),
            description: d.description,
            receipt: d.receipt.map(Into::into),
            last_error: d.last_error,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectCategoryDto {
    pub category_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetLocationDto {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    #[schema(example = -15.5006)]
    pub latitude: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    #[schema(example = -70.1349)]
    pub longitude: f64,

    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetDescriptionDto {
    pub description: String,
}

/// Photo upload form (Swagger documentation only; the handler reads the
/// multipart body directly)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotoDto {
    #[schema(format = Binary, content_media_type = "image/jpeg")]
    pub photo: String,
}

/// One-shot report form (Swagger documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateReportFormDto {
    pub category_id: Uuid,
    /// Up to three photos, repeated field
    #[schema(format = Binary, content_media_type = "image/jpeg")]
    pub photo: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub description: String,
}
