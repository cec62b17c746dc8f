use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::WizardStep;
use crate::features::reports::models::ReportStatus;
use crate::features::submissions::error::WizardError;
use crate::shared::constants::{
    ALLOWED_PHOTO_TYPES, MAX_DESCRIPTION_CHARS, MAX_PHOTOS_PER_REPORT, MAX_PHOTO_SIZE,
    MIN_DESCRIPTION_CHARS,
};
use crate::shared::validation::is_valid_coordinate;

/// Photo held in the draft until submit
#[derive(Debug, Clone)]
pub struct DraftPhoto {
    pub data: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

impl DraftPhoto {
    pub fn validate(&self) -> Result<(), WizardError> {
        if self.data.is_empty() {
            return Err(WizardError::PhotoEmpty);
        }
        if self.data.len() > MAX_PHOTO_SIZE {
            return Err(WizardError::PhotoTooLarge {
                max: MAX_PHOTO_SIZE,
            });
        }
        if !ALLOWED_PHOTO_TYPES.contains(&self.content_type.as_str()) {
            return Err(WizardError::UnsupportedPhotoType(self.content_type.clone()));
        }
        Ok(())
    }

    /// File extension used for the stored object
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            "image/heic" => "heic",
            _ => "jpg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// What a successful submit produced
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub report_id: Uuid,
    pub tracking_code: String,
    pub status: ReportStatus,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
}

/// Server-side state of one run through the submission wizard
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub id: Uuid,
    pub owner: String,
    pub step: WizardStep,
    pub category_id: Option<Uuid>,
    pub photos: Vec<DraftPhoto>,
    pub location: Option<DraftLocation>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub receipt: Option<SubmissionReceipt>,
    pub last_error: Option<String>,
    /// Set while the external writes of a submit are in flight
    pub submitting: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportDraft {
    pub fn new(owner: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            owner: owner.to_string(),
            step: WizardStep::CategorySelect,
            category_id: None,
            photos: vec![],
            location: None,
            address: None,
            description: None,
            receipt: None,
            last_error: None,
            submitting: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validity predicate of `step`
    pub fn check_step(&self, step: WizardStep) -> Result<(), WizardError> {
        match step {
            WizardStep::CategorySelect => self
                .category_id
                .map(|_| ())
                .ok_or(WizardError::CategoryMissing),
            WizardStep::PhotoUpload => match self.photos.len() {
                0 => Err(WizardError::PhotoMissing),
                n if n > MAX_PHOTOS_PER_REPORT => Err(WizardError::TooManyPhotos {
                    max: MAX_PHOTOS_PER_REPORT,
                }),
                _ => Ok(()),
            },
            WizardStep::LocationSelect => {
                let location = self.location.ok_or(WizardError::LocationMissing)?;
                if is_valid_coordinate(location.latitude, location.longitude) {
                    Ok(())
                } else {
                    Err(WizardError::InvalidCoordinates {
                        lat: location.latitude,
                        lon: location.longitude,
                    })
                }
            }
            WizardStep::Description => {
                let actual = self
                    .description
                    .as_deref()
                    .map(|d| d.trim().chars().count())
                    .unwrap_or(0);
                if actual < MIN_DESCRIPTION_CHARS {
                    Err(WizardError::DescriptionTooShort {
                        min: MIN_DESCRIPTION_CHARS,
                        actual,
                    })
                } else {
                    Ok(())
                }
            }
            WizardStep::Review | WizardStep::Submitted => Ok(()),
        }
    }

    /// Whether `next` would succeed right now
    pub fn can_advance(&self) -> bool {
        !self.submitting && self.step.next().is_some() && self.check_step(self.step).is_ok()
    }

    /// Every predicate before review, in flow order
    pub fn check_all(&self) -> Result<(), WizardError> {
        WizardStep::ALL
            .iter()
            .take_while(|step| **step < WizardStep::Review)
            .try_for_each(|step| self.check_step(*step))
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && self.step == WizardStep::Review && self.check_all().is_ok()
    }

    fn ensure_mutable(&self) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.submitting {
            return Err(WizardError::SubmissionInProgress);
        }
        Ok(())
    }

    /// Fields belong to a step; they can be edited once that step is reached
    fn ensure_editable(&self, owner_step: WizardStep, field: &'static str) -> Result<(), WizardError> {
        self.ensure_mutable()?;
        if owner_step > self.step {
            return Err(WizardError::StepNotReached {
                field,
                current: self.step,
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.last_error = None;
    }

    /// Set the category; the caller has already checked that it exists and is active
    pub fn select_category(&mut self, category_id: Uuid) -> Result<(), WizardError> {
        self.ensure_editable(WizardStep::CategorySelect, "category")?;
        self.category_id = Some(category_id);
        self.touch();
        Ok(())
    }

    pub fn attach_photo(&mut self, photo: DraftPhoto) -> Result<usize, WizardError> {
        self.ensure_editable(WizardStep::PhotoUpload, "photos")?;
        photo.validate()?;
        if self.photos.len() >= MAX_PHOTOS_PER_REPORT {
            return Err(WizardError::TooManyPhotos {
                max: MAX_PHOTOS_PER_REPORT,
            });
        }
        self.photos.push(photo);
        self.touch();
        Ok(self.photos.len() - 1)
    }

    pub fn remove_photo(&mut self, index: usize) -> Result<(), WizardError> {
        self.ensure_editable(WizardStep::PhotoUpload, "photos")?;
        if index >= self.photos.len() {
            return Err(WizardError::PhotoIndexOutOfRange(index));
        }
        self.photos.remove(index);
        self.touch();
        Ok(())
    }

    /// Coordinates must be picked explicitly; there is no default location
    pub fn set_location(
        &mut self,
        latitude: f64,
        longitude: f64,
        address: Option<String>,
    ) -> Result<(), WizardError> {
        self.ensure_editable(WizardStep::LocationSelect, "location")?;
        if !is_valid_coordinate(latitude, longitude) {
            return Err(WizardError::InvalidCoordinates {
                lat: latitude,
                lon: longitude,
            });
        }
        self.location = Some(DraftLocation {
            latitude,
            longitude,
        });
        self.address = address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());
        self.touch();
        Ok(())
    }

    pub fn set_description(&mut self, text: &str) -> Result<(), WizardError> {
        self.ensure_editable(WizardStep::Description, "description")?;
        let text = text.trim();
        if text.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(WizardError::DescriptionTooLong {
                max: MAX_DESCRIPTION_CHARS,
            });
        }
        self.description = Some(text.to_string());
        self.touch();
        Ok(())
    }

    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_mutable()?;
        let next = self.step.next().ok_or(WizardError::SubmitRequired)?;
        self.check_step(self.step)?;
        self.step = next;
        self.touch();
        Ok(next)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_mutable()?;
        let previous = self.step.previous().ok_or(WizardError::NoPreviousStep)?;
        self.step = previous;
        self.touch();
        Ok(previous)
    }

    /// Validate for submit and lock the draft against edits
    pub fn begin_submit(&mut self) -> Result<(), WizardError> {
        self.ensure_mutable()?;
        if self.step != WizardStep::Review {
            return Err(WizardError::NotInReview(self.step));
        }
        if let Err(e) = self.check_all() {
            self.last_error = Some(e.to_string());
            return Err(e);
        }
        self.submitting = true;
        self.last_error = None;
        Ok(())
    }

    pub fn complete_submit(&mut self, receipt: SubmissionReceipt) {
        self.step = WizardStep::Submitted;
        self.receipt = Some(receipt);
        self.submitting = false;
        self.touch();
    }

    /// Unlock after a failed submit; the draft stays in review
    pub fn fail_submit(&mut self, error: String) {
        self.submitting = false;
        self.updated_at = Utc::now();
        self.last_error = Some(error);
    }
}
