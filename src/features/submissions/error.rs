use thiserror::Error;

use super::models::WizardStep;
use crate::core::error::AppError;

/// Why a wizard action was refused. Raised before any external call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("Choose a category")]
    CategoryMissing,

    #[error("Category is not available")]
    CategoryUnavailable,

    #[error("Attach at least one photo")]
    PhotoMissing,

    #[error("At most {max} photos can be attached")]
    TooManyPhotos { max: usize },

    #[error("Photo exceeds the {max} byte limit")]
    PhotoTooLarge { max: usize },

    #[error("Photo is empty")]
    PhotoEmpty,

    #[error("Photo type '{0}' is not supported")]
    UnsupportedPhotoType(String),

    #[error("No photo at position {0}")]
    PhotoIndexOutOfRange(usize),

    #[error("Pick a location on the map")]
    LocationMissing,

    #[error("Coordinates ({lat}, {lon}) are out of range")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("Description must be at least {min} characters (got {actual})")]
    DescriptionTooShort { min: usize, actual: usize },

    #[error("Description must not exceed {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("Complete the earlier steps before editing the {field} (current step: {current})")]
    StepNotReached {
        field: &'static str,
        current: WizardStep,
    },

    #[error("Already at the first step")]
    NoPreviousStep,

    #[error("Review is the last step; submit the report instead")]
    SubmitRequired,

    #[error("Only a draft under review can be submitted (current step: {0})")]
    NotInReview(WizardStep),

    #[error("Report was already submitted")]
    AlreadySubmitted,

    #[error("Report is being submitted")]
    SubmissionInProgress,

    #[error("At most {max} drafts can be open at once; submit or discard one first")]
    TooManyDrafts { max: usize },
}

impl From<WizardError> for AppError {
    fn from(e: WizardError) -> Self {
        match e {
            WizardError::AlreadySubmitted
            | WizardError::SubmissionInProgress
            | WizardError::TooManyDrafts { .. } => {
                AppError::Conflict(e.to_string())
            }
            _ => AppError::Validation(e.to_string()),
        }
    }
}
