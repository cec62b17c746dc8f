use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Steps of the submission flow, in order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    CategorySelect,
    PhotoUpload,
    LocationSelect,
    Description,
    Review,
    Submitted,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::CategorySelect,
        WizardStep::PhotoUpload,
        WizardStep::LocationSelect,
        WizardStep::Description,
        WizardStep::Review,
        WizardStep::Submitted,
    ];

    /// Step reached by `next`; `None` from review (submit only) and submitted
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::CategorySelect => Some(WizardStep::PhotoUpload),
            WizardStep::PhotoUpload => Some(WizardStep::LocationSelect),
            WizardStep::LocationSelect => Some(WizardStep::Description),
            WizardStep::Description => Some(WizardStep::Review),
            WizardStep::Review | WizardStep::Submitted => None,
        }
    }

    /// Step reached by `back`; `None` from the first step and from submitted
    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::CategorySelect | WizardStep::Submitted => None,
            WizardStep::PhotoUpload => Some(WizardStep::CategorySelect),
            WizardStep::LocationSelect => Some(WizardStep::PhotoUpload),
            WizardStep::Description => Some(WizardStep::LocationSelect),
            WizardStep::Review => Some(WizardStep::Description),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::CategorySelect => "category_select",
            WizardStep::PhotoUpload => "photo_upload",
            WizardStep::LocationSelect => "location_select",
            WizardStep::Description => "description",
            WizardStep::Review => "review",
            WizardStep::Submitted => "submitted",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
