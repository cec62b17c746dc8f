use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::profiles::models::UserRole;

/// The caller's session, resolved from a validated access token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Identity provider subject, also the profile id
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Identity provider session (absent for service tokens)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Provider-managed metadata carried in the token; only the service can write it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}
