use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::profiles::dtos::{ProfileResponseDto, UpdateProfileDto};
use crate::features::profiles::models::{CreateProfile, UserProfile};

const PROFILE_COLUMNS: &str =
    "id, full_name, email, role, phone, address, created_at, updated_at";

/// Profile access needed by the session flow
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create the profile for a freshly registered user.
    ///
    /// Registering twice with the same subject keeps the existing row and
    /// its role.
    async fn create_for_new_user(&self, data: &CreateProfile) -> Result<UserProfile>;

    /// Get a profile by identity subject, if one exists
    async fn find(&self, user_id: &str) -> Result<Option<UserProfile>>;
}

/// Service for user profile operations
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a profile by identity subject
    pub async fn get(&self, user_id: &str) -> Result<ProfileResponseDto> {
        self.find(user_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    /// Update the owner-editable fields of a profile
    pub async fn update(&self, user_id: &str, dto: UpdateProfileDto) -> Result<ProfileResponseDto> {
        let query = format!(
            r#"
            UPDATE profiles
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let profile = sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(dto.full_name.as_deref().map(str::trim))
            .bind(dto.phone.as_deref().map(str::trim))
            .bind(dto.address.as_deref().map(str::trim))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update profile: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        tracing::info!("Updated profile: {}", user_id);
        Ok(profile.into())
    }
}

#[async_trait]
impl ProfileStore for ProfileService {
    async fn create_for_new_user(&self, data: &CreateProfile) -> Result<UserProfile> {
        let query = format!(
            r#"
            INSERT INTO profiles (id, email, full_name, phone, role)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let profile = sqlx::query_as::<_, UserProfile>(&query)
            .bind(&data.id)
            .bind(&data.email)
            .bind(&data.full_name)
            .bind(&data.phone)
            .bind(data.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create profile: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Profile ready for user: {}", profile.id);
        Ok(profile)
    }

    async fn find(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);

        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get profile: {:?}", e);
                AppError::Database(e)
            })
    }
}
