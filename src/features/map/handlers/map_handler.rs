use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::core::error::Result;
use crate::features::map::dtos::{IconQuery, MapLayerDto, MapPointsQuery};
use crate::features::map::services::MapService;
use crate::shared::types::{ApiResponse, Meta};

/// Report points for the map
///
/// Markers mode returns one marker per report with its icon descriptor.
/// Heatmap mode returns `[lat, lon, weight]` triples weighted by priority and
/// leaves out rejected reports.
#[utoipa::path(
    get,
    path = "/api/map/points",
    params(MapPointsQuery),
    responses(
        (status = 200, description = "Map layer", body = ApiResponse<MapLayerDto>),
        (status = 400, description = "Unknown mode or status")
    ),
    tag = "map"
)]
pub async fn get_map_points(
    State(service): State<Arc<MapService>>,
    Query(query): Query<MapPointsQuery>,
) -> Result<Json<ApiResponse<MapLayerDto>>> {
    let layer = service.points(&query).await?;
    let total = layer.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(layer),
        None,
        Some(Meta { total }),
    )))
}

/// SVG marker icon for a category
#[utoipa::path(
    get,
    path = "/api/map/icons/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug"),
        IconQuery
    ),
    responses(
        (status = 200, description = "SVG marker", content_type = "image/svg+xml", body = String),
        (status = 404, description = "Category not found")
    ),
    tag = "map"
)]
pub async fn get_marker_icon(
    State(service): State<Arc<MapService>>,
    Path(slug): Path<String>,
    Query(query): Query<IconQuery>,
) -> Result<impl IntoResponse> {
    let svg = service.icon(&slug, query.status).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        svg,
    ))
}
