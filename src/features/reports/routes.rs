use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::ReportService;
use crate::modules::classifier::TextClassifier;

/// Create routes for the reports feature
pub fn routes(report_service: Arc<ReportService>, classifier: Arc<dyn TextClassifier>) -> Router {
    let state = ReportState {
        report_service,
        classifier,
    };

    Router::new()
        .route(
            "/reports",
            post(handlers::create_report).get(handlers::list_reports),
        )
        .route("/reports/export", get(handlers::export_reports))
        .route("/reports/{id}", get(handlers::get_report))
        .route("/reports/{id}/category", patch(handlers::correct_category))
        .route(
            "/reports/{id}/reclassify",
            post(handlers::reclassify_report),
        )
        .with_state(state)
}
