use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::AppError;
use crate::features::reports::models::{Report, ReportFilter};
use crate::shared::category::Category;

/// Request DTO for submitting a report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    /// 5 to 150 characters after trimming
    #[validate(custom(function = "crate::shared::validation::validate_report_text"))]
    #[schema(example = "Glass on bike lane at intersection")]
    pub text: String,
    #[schema(example = 48.2082)]
    pub latitude: f64,
    #[schema(example = 16.3738)]
    pub longitude: f64,
    /// Origin tag, defaults to "real"
    #[serde(default)]
    pub source: Option<String>,
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: i64,
    pub text: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub category: Category,
    pub confidence: f64,
    pub source: String,
    pub is_corrected: bool,
    pub model_name: Option<String>,
    pub model_version: Option<String>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            text: r.text,
            latitude: r.latitude,
            longitude: r.longitude,
            timestamp: r.timestamp,
            category: r.category,
            confidence: r.confidence,
            source: r.source,
            is_corrected: r.is_corrected,
            model_name: r.model_name,
            model_version: r.model_version,
        }
    }
}

/// Query params for listing reports
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListReportsQuery {
    /// Exact category, canonical or display name. Empty means all
    pub category: Option<String>,
    /// Case-insensitive text search
    pub search: Option<String>,
    /// Include reports classified as Spam (default false)
    #[serde(default)]
    pub include_spam: bool,
}

/// Query params for the CSV export
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ExportReportsQuery {
    /// Exact category, canonical or display name. Empty means all
    pub category: Option<String>,
    /// Include reports classified as Spam (default false)
    #[serde(default)]
    pub include_spam: bool,
}

impl ListReportsQuery {
    pub fn into_filter(self) -> Result<ReportFilter, AppError> {
        Ok(ReportFilter {
            category: parse_category_param(self.category.as_deref())?,
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            include_spam: self.include_spam,
        })
    }
}

impl ExportReportsQuery {
    pub fn into_filter(self) -> Result<ReportFilter, AppError> {
        Ok(ReportFilter {
            category: parse_category_param(self.category.as_deref())?,
            search: None,
            include_spam: self.include_spam,
        })
    }
}

fn parse_category_param(raw: Option<&str>) -> Result<Option<Category>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<Category>()
            .map(Some)
            .map_err(|e| AppError::BadRequest(e.to_string())),
    }
}

/// Request DTO for a human category correction
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CorrectCategoryDto {
    pub category: Category,
}

/// Response DTO for a reclassification attempt
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReclassifyResponseDto {
    /// False when the report carries a human correction and was left alone
    pub reclassified: bool,
    pub report: ReportResponseDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_category_param_means_all() {
        let filter = ListReportsQuery {
            category: Some("  ".to_string()),
            search: Some("".to_string()),
            include_spam: false,
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.category, None);
        assert_eq!(filter.search, None);
    }

    #[test]
    fn test_category_param_accepts_display_labels() {
        let filter = ExportReportsQuery {
            category: Some("Hindernis".to_string()),
            include_spam: false,
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.category, Some(Category::Obstacle));
    }

    #[test]
    fn test_unknown_category_param_is_bad_request() {
        let err = ListReportsQuery {
            category: Some("Pothole".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("Pothole")));
    }

    #[test]
    fn test_create_dto_validation() {
        let dto = CreateReportDto {
            text: "Glass on bike lane at intersection".to_string(),
            latitude: 48.2082,
            longitude: 16.3738,
            source: Some("real".to_string()),
        };
        assert!(dto.validate().is_ok());

        let short = CreateReportDto {
            text: "Glas".to_string(),
            ..dto
        };
        assert!(short.validate().is_err());
    }
}
