use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::submissions::dtos::{
    CreateReportFormDto, DraftResponseDto, SelectCategoryDto, SetDescriptionDto, SetLocationDto,
    SubmissionReceiptDto, UploadPhotoDto,
};
use crate::features::submissions::models::DraftPhoto;
use crate::features::submissions::services::{NewReportForm, SubmissionService};
use crate::shared::types::ApiResponse;

type DraftResult = Result<Json<ApiResponse<DraftResponseDto>>>;

fn draft_response(draft: DraftResponseDto) -> DraftResult {
    Ok(Json(ApiResponse::success(Some(draft), None, None)))
}

async fn next_field(multipart: &mut Multipart) -> Result<Option<Field<'_>>> {
    multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })
}

async fn read_photo(field: Field<'_>) -> Result<DraftPhoto> {
    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let filename = field
        .file_name()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "photo".to_string());
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read photo data: {}", e)))?;

    Ok(DraftPhoto {
        data: data.to_vec(),
        content_type,
        filename,
    })
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}

fn parse_number(value: &str, name: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be a number", name)))
}

/// Start a new report draft
#[utoipa::path(
    post,
    path = "/api/drafts",
    responses(
        (status = 201, description = "Draft created at category_select", body = ApiResponse<DraftResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn start_draft(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
) -> Result<(StatusCode, Json<ApiResponse<DraftResponseDto>>)> {
    let draft = service.start_draft(&user.sub).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(draft), None, None)),
    ))
}

/// Get the current state of a draft
#[utoipa::path(
    get,
    path = "/api/drafts/{id}",
    params(("id" = Uuid, Path, description = "Draft ID")),
    responses(
        (status = 200, description = "Draft state", body = ApiResponse<DraftResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Draft not found or expired")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn get_draft(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
    Path(id): Path<Uuid>,
) -> DraftResult {
    draft_response(service.get_draft(&user.sub, id).await?)
}

/// Discard a draft
#[utoipa::path(
    delete,
    path = "/api/drafts/{id}",
    params(("id" = Uuid, Path, description = "Draft ID")),
    responses(
        (status = 200, description = "Draft discarded"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Draft not found"),
        (status = 409, description = "Draft is being submitted")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn discard_draft(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.discard_draft(&user.sub, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Draft discarded".to_string()),
        None,
    )))
}

/// Choose the report category
#[utoipa::path(
    put,
    path = "/api/drafts/{id}/category",
    params(("id" = Uuid, Path, description = "Draft ID")),
    request_body = SelectCategoryDto,
    responses(
        (status = 200, description = "Category set", body = ApiResponse<DraftResponseDto>),
        (status = 400, description = "Unknown or inactive category"),
        (status = 404, description = "Draft not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn select_category(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SelectCategoryDto>,
) -> DraftResult {
    draft_response(
        service
            .select_category(&user.sub, id, dto.category_id)
            .await?,
    )
}

/// Attach a photo (multipart field `photo`)
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/photos",
    params(("id" = Uuid, Path, description = "Draft ID")),
    request_body(content = UploadPhotoDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo attached", body = ApiResponse<DraftResponseDto>),
        (status = 400, description = "Missing, empty, oversized or unsupported photo"),
        (status = 404, description = "Draft not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn attach_photo(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> DraftResult {
    let mut photo = None;
    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() == Some("photo") {
            photo = Some(read_photo(field).await?);
        } else {
            debug!("Ignoring unknown field: {:?}", field.name());
        }
    }

    let photo = photo.ok_or_else(|| AppError::BadRequest("Photo is required".to_string()))?;
    draft_response(service.attach_photo(&user.sub, id, photo).await?)
}

/// Remove the photo at `index`
#[utoipa::path(
    delete,
    path = "/api/drafts/{id}/photos/{index}",
    params(
        ("id" = Uuid, Path, description = "Draft ID"),
        ("index" = usize, Path, description = "Photo position, starting at 0")
    ),
    responses(
        (status = 200, description = "Photo removed", body = ApiResponse<DraftResponseDto>),
        (status = 400, description = "No photo at that position"),
        (status = 404, description = "Draft not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn remove_photo(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> DraftResult {
    draft_response(service.remove_photo(&user.sub, id, index).await?)
}

/// Set the location picked on the map
#[utoipa::path(
    put,
    path = "/api/drafts/{id}/location",
    params(("id" = Uuid, Path, description = "Draft ID")),
    request_body = SetLocationDto,
    responses(
        (status = 200, description = "Location set", body = ApiResponse<DraftResponseDto>),
        (status = 400, description = "Coordinates out of range"),
        (status = 404, description = "Draft not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn set_location(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SetLocationDto>,
) -> DraftResult {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    draft_response(
        service
            .set_location(&user.sub, id, dto.latitude, dto.longitude, dto.address)
            .await?,
    )
}

/// Set the problem description
#[utoipa::path(
    put,
    path = "/api/drafts/{id}/description",
    params(("id" = Uuid, Path, description = "Draft ID")),
    request_body = SetDescriptionDto,
    responses(
        (status = 200, description = "Description set", body = ApiResponse<DraftResponseDto>),
        (status = 400, description = "Description too long"),
        (status = 404, description = "Draft not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn set_description(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SetDescriptionDto>,
) -> DraftResult {
    draft_response(
        service
            .set_description(&user.sub, id, &dto.description)
            .await?,
    )
}

/// Advance to the next step
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/next",
    params(("id" = Uuid, Path, description = "Draft ID")),
    responses(
        (status = 200, description = "Moved to the next step", body = ApiResponse<DraftResponseDto>),
        (status = 400, description = "Current step is incomplete"),
        (status = 404, description = "Draft not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn next_step(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
    Path(id): Path<Uuid>,
) -> DraftResult {
    draft_response(service.next(&user.sub, id).await?)
}

/// Go back one step
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/back",
    params(("id" = Uuid, Path, description = "Draft ID")),
    responses(
        (status = 200, description = "Moved to the previous step", body = ApiResponse<DraftResponseDto>),
        (status = 400, description = "Already at the first step"),
        (status = 404, description = "Draft not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn previous_step(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
    Path(id): Path<Uuid>,
) -> DraftResult {
    draft_response(service.back(&user.sub, id).await?)
}

/// Submit a draft under review
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/submit",
    params(("id" = Uuid, Path, description = "Draft ID")),
    responses(
        (status = 201, description = "Report created", body = ApiResponse<SubmissionReceiptDto>),
        (status = 400, description = "Draft is not complete or not under review"),
        (status = 404, description = "Draft not found"),
        (status = 409, description = "Draft already submitted or being submitted"),
        (status = 502, description = "Photo upload failed")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn submit_draft(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionReceiptDto>>)> {
    let receipt = service.submit(&user.sub, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(receipt),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// Create a report in one request
///
/// Runs the same step checks as the draft flow. Accepts multipart/form-data
/// with `category_id`, one to three `photo` fields, `latitude`, `longitude`,
/// optional `address` and `description`.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(content = CreateReportFormDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Report created", body = ApiResponse<SubmissionReceiptDto>),
        (status = 400, description = "A field is missing or invalid"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Photo upload failed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(service): State<Arc<SubmissionService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionReceiptDto>>)> {
    let mut category_id = None;
    let mut photos = vec![];
    let mut latitude = None;
    let mut longitude = None;
    let mut address = None;
    let mut description = None;

    while let Some(field) = next_field(&mut multipart).await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "photo" => photos.push(read_photo(field).await?),
            "category_id" => {
                let text = read_text(field, &name).await?;
                category_id = Some(text.trim().parse::<Uuid>().map_err(|_| {
                    AppError::Validation("category_id must be a UUID".to_string())
                })?);
            }
            "latitude" => latitude = Some(parse_number(&read_text(field, &name).await?, &name)?),
            "longitude" => {
                longitude = Some(parse_number(&read_text(field, &name).await?, &name)?)
            }
            "address" => address = Some(read_text(field, &name).await?),
            "description" => description = Some(read_text(field, &name).await?),
            _ => debug!("Ignoring unknown field: {}", name),
        }
    }

    let form = NewReportForm {
        category_id: category_id
            .ok_or_else(|| AppError::Validation("category_id is required".to_string()))?,
        photos,
        latitude: latitude
            .ok_or_else(|| AppError::Validation("latitude is required".to_string()))?,
        longitude: longitude
            .ok_or_else(|| AppError::Validation("longitude is required".to_string()))?,
        address,
        description: description.unwrap_or_default(),
    };

    let receipt = service.create_report(&user.sub, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(receipt),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}
