use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::map::{dtos as map_dtos, handlers as map_handlers};
use crate::features::profiles::{
    dtos as profiles_dtos, handlers as profiles_handlers, models as profiles_models,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::submissions::{
    dtos as submissions_dtos, handlers as submissions_handlers, models as submissions_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::refresh_token,
        auth::handlers::logout,
        auth::handlers::get_me,
        auth::handlers::auth_events,
        // Profiles
        profiles_handlers::get_my_profile,
        profiles_handlers::update_my_profile,
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        // Submission wizard
        submissions_handlers::start_draft,
        submissions_handlers::get_draft,
        submissions_handlers::discard_draft,
        submissions_handlers::select_category,
        submissions_handlers::attach_photo,
        submissions_handlers::remove_photo,
        submissions_handlers::set_location,
        submissions_handlers::set_description,
        submissions_handlers::next_step,
        submissions_handlers::previous_step,
        submissions_handlers::submit_draft,
        submissions_handlers::create_report,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::get_report_history,
        reports_handlers::update_report_status,
        reports_handlers::track_report,
        // Map (public)
        map_handlers::get_map_points,
        map_handlers::get_marker_icon,
        // Dashboard (staff)
        dashboard_handlers::get_summary,
        dashboard_handlers::get_by_category,
        dashboard_handlers::get_by_status,
        dashboard_handlers::get_recent,
        dashboard_handlers::get_trend,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::RefreshTokenRequestDto,
            auth::dtos::SessionTokensDto,
            auth::dtos::AuthUserDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::RegisterResponseDto,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::RegisterResponseDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Profiles
            profiles_models::UserRole,
            profiles_dtos::ProfileResponseDto,
            profiles_dtos::UpdateProfileDto,
            ApiResponse<profiles_dtos::ProfileResponseDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Submission wizard
            submissions_models::WizardStep,
            submissions_dtos::DraftResponseDto,
            submissions_dtos::DraftPhotoDto,
            submissions_dtos::DraftLocationDto,
            submissions_dtos::SelectCategoryDto,
            submissions_dtos::SetLocationDto,
            submissions_dtos::SetDescriptionDto,
            submissions_dtos::UploadPhotoDto,
            submissions_dtos::CreateReportFormDto,
            submissions_dtos::SubmissionReceiptDto,
            ApiResponse<submissions_dtos::DraftResponseDto>,
            ApiResponse<submissions_dtos::SubmissionReceiptDto>,
            // Reports
            reports_models::ReportStatus,
            reports_models::ReportPriority,
            reports_dtos::ReportResponseDto,
            reports_dtos::StatusHistoryResponseDto,
            reports_dtos::TrackedCategoryDto,
            reports_dtos::TrackingResponseDto,
            reports_dtos::UpdateReportStatusDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::StatusHistoryResponseDto>>,
            ApiResponse<reports_dtos::TrackingResponseDto>,
            // Map
            map_dtos::MapMode,
            map_dtos::IconDescriptorDto,
            map_dtos::MarkerDto,
            map_dtos::MapLayerDto,
            ApiResponse<map_dtos::MapLayerDto>,
            // Dashboard
            dashboard_dtos::PaginationMeta,
            dashboard_dtos::StatusCountDto,
            dashboard_dtos::DashboardSummaryDto,
            dashboard_dtos::CategoryCountDto,
            dashboard_dtos::DashboardReportDto,
            dashboard_dtos::DashboardRecentDto,
            dashboard_dtos::DailyCountDto,
            dashboard_dtos::DashboardTrendDto,
            ApiResponse<dashboard_dtos::DashboardSummaryDto>,
            ApiResponse<Vec<dashboard_dtos::CategoryCountDto>>,
            ApiResponse<Vec<dashboard_dtos::StatusCountDto>>,
            ApiResponse<dashboard_dtos::DashboardRecentDto>,
            ApiResponse<dashboard_dtos::DashboardTrendDto>,
        )
    ),
    tags(
        (name = "auth", description = "Sign-up, sign-in and session events"),
        (name = "profiles", description = "User profile management"),
        (name = "categories", description = "Report categories (public)"),
        (name = "submissions", description = "Report submission wizard"),
        (name = "reports", description = "Citizen reports, tracking and status history"),
        (name = "map", description = "Map markers, heatmap and marker icons (public)"),
        (name = "dashboard", description = "Aggregate numbers (staff only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Civic Report API",
        version = "0.1.0",
        description = "API documentation for Civic Report",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_wizard_and_guarded_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/drafts/{id}/submit"));
        assert!(paths.contains_key("/api/map/icons/{slug}"));
        assert!(paths.contains_key("/api/dashboard/trend"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
