use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::core::middleware::bearer_token;
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, MeResponseDto, RefreshTokenRequestDto, RegisterRequestDto,
    RegisterResponseDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{sse::Event, IntoResponse, Response, Sse},
    Json,
};
use std::sync::Arc;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use validator::Validate;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<RegisterResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.register(dto).await?;
    let message = response
        .requires_confirmation
        .then(|| "Check your email to confirm the account".to_string());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), message, None)),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(auth_response), None, None)))
}

/// Refresh access token using refresh token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequestDto,
    responses(
        (status = 200, description = "Token refreshed successfully", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RefreshTokenRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.refresh_token(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Sign out the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>> {
    let token = bearer_token(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok()),
    )
    .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    service.logout(&user, token).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Signed out".to_string()),
        None,
    )))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<MeResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<MeResponseDto>>> {
    let me = service.get_current_user(user).await?;
    Ok(Json(ApiResponse::success(Some(me), None, None)))
}

/// Stream the caller's auth events (signed_in, signed_out, token_refreshed)
#[utoipa::path(
    get,
    path = "/api/auth/events",
    responses(
        (status = 200, description = "Server-sent event stream", content_type = "text/event-stream"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn auth_events(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Response {
    let subject = user.sub;
    let stream = BroadcastStream::new(service.events().subscribe()).filter_map(move |received| {
        // Lagged receivers just skip what they missed
        let event = received.ok().filter(|e| e.user_id == subject)?;
        Event::default()
            .event(event.kind.as_str())
            .json_data(&event)
            .ok()
            .map(Ok::<_, std::convert::Infallible>)
    });

    Sse::new(stream)
        .keep_alive(
            axum::response::sse::KeepAlive::new()
                .interval(std::time::Duration::from_secs(15))
                .text("ping"),
        )
        .into_response()
}
