use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::profiles::models::{UserProfile, UserRole};
use crate::shared::validation::PHONE_REGEX;

/// Response DTO for a user profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponseDto {
    pub id: String,
    pub full_name: Option<String>,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponseDto {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            email: p.email,
            role: p.role,
            phone: p.phone,
            address: p.address,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Request DTO for updating the caller's own profile.
///
/// Omitted fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 128, message = "Name must be 1-128 characters"))]
    pub full_name: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Address must not exceed 255 characters"))]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_validation() {
        let ok = UpdateProfileDto {
            full_name: Some("Rosa Quispe".to_string()),
            phone: Some("+51 951 234 567".to_string()),
            address: None,
        };
        assert!(ok.validate().is_ok());

        let bad_phone = UpdateProfileDto {
            full_name: None,
            phone: Some("call me".to_string()),
            address: None,
        };
        assert!(bad_phone.validate().is_err());

        let empty_name = UpdateProfileDto {
            full_name: Some(String::new()),
            phone: None,
            address: None,
        };
        assert!(empty_name.validate().is_err());
    }
}
