use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::profiles::dtos::{ProfileResponseDto, UpdateProfileDto};
use crate::features::profiles::services::ProfileService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/profiles/me",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ProfileResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found")
    ),
    tag = "profiles",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_my_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<ProfileService>>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    let profile = service.get(&user.sub).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

#[utoipa::path(
    patch,
    path = "/api/profiles/me",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<ProfileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "profiles",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_my_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<ProfileService>>,
    AppJson(dto): AppJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let profile = service.update(&user.sub, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(profile),
        Some("Profile updated successfully".to_string()),
        None,
    )))
}
