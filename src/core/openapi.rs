use utoipa::{Modify, OpenApi};

use crate::core::app;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::shared::category::Category;
use crate::shared::types::{ErrorResponse, HealthResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::export_reports,
        reports_handlers::get_report,
        reports_handlers::correct_category,
        reports_handlers::reclassify_report,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        // Health
        app::health_check,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            HealthResponse,
            Category,
            // Reports
            reports_dtos::CreateReportDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::CorrectCategoryDto,
            reports_dtos::ReclassifyResponseDto,
            // Categories
            categories_dtos::CategoryResponseDto,
        )
    ),
    tags(
        (name = "reports", description = "Cycling hazard reports"),
        (name = "categories", description = "Report categories and display labels"),
        (name = "health", description = "Liveness check"),
    ),
    info(
        title = "RideAware API",
        version = "0.1.0",
        description = "Crowdsourced cycling hazard reports",
    )
)]
pub struct ApiDoc;

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
