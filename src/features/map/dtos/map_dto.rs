use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::reports::models::ReportStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    #[default]
    Markers,
    Heatmap,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct MapPointsQuery {
    /// `markers` (default) or `heatmap`
    #[serde(default)]
    pub mode: MapMode,
    /// Category slug
    pub category: Option<String>,
    pub status: Option<ReportStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct IconQuery {
    /// Status that sets the ring color
    pub status: Option<ReportStatus>,
}

/// How a marker is drawn
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IconDescriptorDto {
    #[schema(example = "#e67e22")]
    pub color: String,
    pub emoji: String,
    #[schema(example = "/api/map/icons/pothole?status=new")]
    pub icon_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkerDto {
    pub id: Uuid,
    pub tracking_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ReportStatus,
    pub category: String,
    pub icon: IconDescriptorDto,
}

/// Points for one map layer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum MapLayerDto {
    Markers { markers: Vec<MarkerDto> },
    /// `[latitude, longitude, weight]` triples
    Heatmap { points: Vec<[f64; 3]> },
}

impl MapLayerDto {
    pub fn len(&self) -> usize {
        match self {
            MapLayerDto::Markers { markers } => markers.len(),
            MapLayerDto::Heatmap { points } => points.len(),
        }
    }
}
