use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::clients::{IdentitySession, IdentityUser};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::profiles::dtos::ProfileResponseDto;
use crate::shared::validation::PHONE_REGEX;

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 128, message = "Name must be 1-128 characters"))]
    pub full_name: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for token refresh
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequestDto {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Token pair handed to the client
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionTokensDto {
    pub access_token: String,
    /// Token type (always "bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    pub refresh_token: String,
}

/// User info included in auth responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: String,
    pub email: Option<String>,
}

/// Response DTO for login and refresh
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    #[serde(flatten)]
    pub tokens: SessionTokensDto,
    pub user: AuthUserDto,
}

/// Response DTO for registration.
///
/// `session` is absent while the provider waits for the email to be confirmed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponseDto {
    pub user: AuthUserDto,
    pub session: Option<SessionTokensDto>,
    pub requires_confirmation: bool,
}

/// Current session: token claims plus the stored profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub user: AuthenticatedUser,
    pub profile: Option<ProfileResponseDto>,
}

impl From<&IdentityUser> for AuthUserDto {
    fn from(user: &IdentityUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<IdentitySession> for AuthResponseDto {
    fn from(session: IdentitySession) -> Self {
        let user = AuthUserDto::from(&session.user);
        Self {
            tokens: SessionTokensDto {
                access_token: session.access_token,
                token_type: session.token_type,
                expires_in: session.expires_in,
                refresh_token: session.refresh_token,
            },
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let dto = RegisterRequestDto {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            full_name: None,
            phone: None,
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));

        let dto = RegisterRequestDto {
            email: "citizen@example.test".to_string(),
            password: "long-enough".to_string(),
            full_name: Some("Ana Quispe".to_string()),
            phone: Some("+51 951 234 567".to_string()),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_auth_response_flattens_tokens() {
        let session = IdentitySession {
            access_token: "a".into(),
            token_type: "bearer".into(),
            expires_in: 3600,
            refresh_token: "r".into(),
            user: IdentityUser {
                id: "u-1".into(),
                email: Some("u@example.test".into()),
                app_metadata: Default::default(),
                user_metadata: serde_json::Value::Null,
            },
        };
        let json = serde_json::to_value(AuthResponseDto::from(session)).unwrap();
        assert_eq!(json["access_token"], "a");
        assert_eq!(json["user"]["id"], "u-1");
    }
}
