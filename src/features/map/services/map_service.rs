use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::icon_emoji;
use crate::features::map::dtos::{
    IconDescriptorDto, MapLayerDto, MapMode, MapPointsQuery, MarkerDto,
};
use crate::features::map::icons::{marker_color, marker_svg};
use crate::features::reports::models::{PointFilter, ReportPoint, ReportStatus};
use crate::features::reports::repository::ReportRepository;

/// Map layers over every matching report; no clustering or viewport paging
pub struct MapService {
    repo: Arc<dyn ReportRepository>,
}

impl MapService {
    pub fn new(repo: Arc<dyn ReportRepository>) -> Self {
        Self { repo }
    }

    pub async fn points(&self, query: &MapPointsQuery) -> Result<MapLayerDto> {
        let filter = PointFilter {
            category_slug: query
                .category
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            status: query.status,
            exclude_rejected: query.mode == MapMode::Heatmap,
        };

        let points = self.repo.list_points(&filter).await?;

        Ok(match query.mode {
            MapMode::Markers => MapLayerDto::Markers {
                markers: points.into_iter().map(to_marker).collect(),
            },
            MapMode::Heatmap => MapLayerDto::Heatmap {
                points: points
                    .iter()
                    .map(|p| [p.latitude, p.longitude, p.priority.heat_weight()])
                    .collect(),
            },
        })
    }

    /// SVG marker for a category, optionally ringed by status
    pub async fn icon(&self, slug: &str, status: Option<ReportStatus>) -> Result<String> {
        let category = self
            .repo
            .find_category_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))?;

        Ok(marker_svg(
            marker_color(category.color.as_deref()),
            category.emoji(),
            status,
        ))
    }
}

fn icon_url(slug: &str, status: ReportStatus) -> String {
    format!(
        "/api/map/icons/{}?status={}",
        urlencoding::encode(slug),
        status
    )
}

fn to_marker(p: ReportPoint) -> MarkerDto {
    let icon = IconDescriptorDto {
        color: marker_color(p.category_color.as_deref()).to_string(),
        emoji: icon_emoji(p.category_icon.as_deref()).to_string(),
        icon_url: icon_url(&p.category_slug, p.status),
    };

    MarkerDto {
        id: p.id,
        tracking_code: p.tracking_code,
        latitude: p.latitude,
        longitude: p.longitude,
        status: p.status,
        category: p.category_slug,
        icon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::FALLBACK_EMOJI;
    use crate::features::map::icons::FALLBACK_COLOR;
    use crate::features::reports::models::{CreateReport, ReportPriority, StatusTransition};
    use crate::features::reports::repository::memory::InMemoryReportRepository;

    async fn seed(
        repo: &InMemoryReportRepository,
        slug: &str,
        priority: ReportPriority,
    ) -> uuid::Uuid {
        repo.create(&CreateReport {
            user_id: "citizen-1".to_string(),
            category_id: repo.category_id(slug),
            description: "Something to fix here".to_string(),
            address: None,
            latitude: -15.5,
            longitude: -70.1,
            photo_url: "http://storage.test/p.jpg".to_string(),
            priority,
        })
        .await
        .unwrap()
        .id
    }

    fn setup() -> (Arc<InMemoryReportRepository>, MapService) {
        let repo = Arc::new(InMemoryReportRepository::default());
        (repo.clone(), MapService::new(repo))
    }

    #[tokio::test]
    async fn test_markers_carry_icon_descriptor() {
        let (repo, service) = setup();
        seed(&repo, "lighting", ReportPriority::Low).await;

        let layer = service.points(&MapPointsQuery::default()).await.unwrap();
        let MapLayerDto::Markers { markers } = layer else {
            panic!("expected markers");
        };
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].category, "lighting");
        assert_eq!(markers[0].icon.emoji, "💡");
        assert_eq!(markers[0].icon.color, "#f1c40f");
        assert_eq!(markers[0].icon.icon_url, "/api/map/icons/lighting?status=new");
    }

    #[tokio::test]
    async fn test_heatmap_weights_and_excludes_rejected() {
        let (repo, service) = setup();
        seed(&repo, "pothole", ReportPriority::Urgent).await;
        seed(&repo, "trash", ReportPriority::Low).await;
        let rejected = seed(&repo, "water", ReportPriority::High).await;
        repo.apply_transition(
            rejected,
            &StatusTransition {
                from: ReportStatus::New,
                to: ReportStatus::Rejected,
                comment: None,
                changed_by: "operator-1".to_string(),
            },
        )
        .await
        .unwrap();

        let query = MapPointsQuery {
            mode: MapMode::Heatmap,
            ..Default::default()
        };
        let MapLayerDto::Heatmap { points } = service.points(&query).await.unwrap() else {
            panic!("expected heatmap");
        };

        let mut weights: Vec<f64> = points.iter().map(|p| p[2]).collect();
        weights.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(weights, vec![0.4, 1.0]);

        // Markers still show the rejected report
        let markers = service.points(&MapPointsQuery::default()).await.unwrap();
        assert_eq!(markers.len(), 3);
    }

    #[tokio::test]
    async fn test_points_filtered_by_category_and_status() {
        let (repo, service) = setup();
        seed(&repo, "pothole", ReportPriority::Medium).await;
        seed(&repo, "trash", ReportPriority::Medium).await;

        let query = MapPointsQuery {
            category: Some("pothole".to_string()),
            ..Default::default()
        };
        assert_eq!(service.points(&query).await.unwrap().len(), 1);

        let query = MapPointsQuery {
            status: Some(ReportStatus::Resolved),
            ..Default::default()
        };
        assert_eq!(service.points(&query).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_icon_falls_back_for_unknown_emoji_and_bad_color() {
        let (repo, service) = setup();
        {
            let mut categories = repo.categories.lock().unwrap();
            let water = categories.iter_mut().find(|c| c.slug == "water").unwrap();
            water.icon = Some("kraken".to_string());
            water.color = Some("blue".to_string());
        }

        let svg = service.icon("water", None).await.unwrap();
        assert!(svg.contains(FALLBACK_EMOJI));
        assert!(svg.contains(FALLBACK_COLOR));

        let err = service.icon("unknown", None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
