use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;

/// Application role, mirrored in the `user_role` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Citizen,
    Admin,
    Supervisor,
    Operator,
}

impl UserRole {
    /// Municipal staff: everyone except citizens
    pub fn is_staff(&self) -> bool {
        !matches!(self, UserRole::Citizen)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Citizen => write!(f, "citizen"),
            UserRole::Admin => write!(f, "admin"),
            UserRole::Supervisor => write!(f, "supervisor"),
            UserRole::Operator => write!(f, "operator"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "citizen" => Ok(UserRole::Citizen),
            "admin" => Ok(UserRole::Admin),
            "supervisor" => Ok(UserRole::Supervisor),
            "operator" => Ok(UserRole::Operator),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Database model for a user profile
#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    /// Identity provider subject
    pub id: String,
    pub full_name: Option<String>,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a profile at registration
#[derive(Debug)]
pub struct CreateProfile {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("citizen".parse::<UserRole>(), Ok(UserRole::Citizen));
        assert_eq!(" Supervisor ".parse::<UserRole>(), Ok(UserRole::Supervisor));
        assert!("authenticated".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_staff_roles() {
        assert!(!UserRole::Citizen.is_staff());
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Supervisor.is_staff());
        assert!(UserRole::Operator.is_staff());
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Operator.is_admin());
    }
}
