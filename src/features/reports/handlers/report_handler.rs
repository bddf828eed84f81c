use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::reports::dtos::{
    CorrectCategoryDto, CreateReportDto, ExportReportsQuery, ListReportsQuery,
    ReclassifyResponseDto, ReportResponseDto,
};
use crate::features::reports::models::CreateReport;
use crate::features::reports::services::ReportService;
use crate::modules::classifier::TextClassifier;
use crate::shared::constants::DEFAULT_REPORT_SOURCE;
use crate::shared::types::ErrorResponse;
use crate::shared::validation::validation_message;

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub classifier: Arc<dyn TextClassifier>,
}

/// Submit a report; it is classified and stored
#[utoipa::path(
    post,
    path = "/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report classified and stored", body = ReportResponseDto),
        (status = 400, description = "Invalid report", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(state): State<ReportState>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ReportResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let text = dto.text.trim().to_string();
    let classification = state.classifier.classify(&text);
    let info = state.classifier.model_info();

    let source = dto
        .source
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_REPORT_SOURCE.to_string());

    let report = state
        .report_service
        .create(&CreateReport {
            text,
            latitude: dto.latitude,
            longitude: dto.longitude,
            source,
            category: classification.category,
            confidence: classification.confidence,
            model_name: Some(info.model_name.clone()),
            model_version: Some(info.model_version.clone()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(report.into())))
}

/// List reports, most recent first
#[utoipa::path(
    get,
    path = "/reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Matching reports", body = Vec<ReportResponseDto>),
        (status = 400, description = "Unknown category", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<ListReportsQuery>,
) -> Result<Json<Vec<ReportResponseDto>>> {
    let filter = query.into_filter()?;
    let reports = state.report_service.list(&filter).await?;
    Ok(Json(reports.into_iter().map(|r| r.into()).collect()))
}

/// Download reports as CSV
#[utoipa::path(
    get,
    path = "/reports/export",
    params(ExportReportsQuery),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 400, description = "Unknown category", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn export_reports(
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<ExportReportsQuery>,
) -> Result<Response> {
    let filter = query.into_filter()?;
    let csv = state.report_service.export_csv(&filter).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"reports.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ReportResponseDto),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<ReportResponseDto>> {
    let report = state.report_service.get_by_id(id).await?;
    Ok(Json(report.into()))
}

/// Correct the category of a report by hand
#[utoipa::path(
    patch,
    path = "/reports/{id}/category",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = CorrectCategoryDto,
    responses(
        (status = 200, description = "Category corrected", body = ReportResponseDto),
        (status = 400, description = "Unknown category", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn correct_category(
    State(state): State<ReportState>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<CorrectCategoryDto>,
) -> Result<Json<ReportResponseDto>> {
    let report = state
        .report_service
        .correct_category(id, dto.category)
        .await?;
    Ok(Json(report.into()))
}

/// Re-run the active classifier on a report
///
/// Reports with a human correction are left unchanged.
#[utoipa::path(
    post,
    path = "/reports/{id}/reclassify",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Reclassification result", body = ReclassifyResponseDto),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn reclassify_report(
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<ReclassifyResponseDto>> {
    let (report, reclassified) = state
        .report_service
        .reclassify(id, state.classifier.as_ref())
        .await?;
    Ok(Json(ReclassifyResponseDto {
        reclassified,
        report: report.into(),
    }))
}
