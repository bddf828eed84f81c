use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::shared::category::Category;

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
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

/// Data for creating a new report, already classified
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub text: String,
    pub latitude: f64,
    pub longitude: f64,
    pub source: String,
    pub category: Category,
    pub confidence: f64,
    pub model_name: Option<String>,
    pub model_version: Option<String>,
}

/// Selection applied to list and export queries, all conditions ANDed
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub category: Option<Category>,
    /// Case-insensitive substring of the report text
    pub search: Option<String>,
    /// Spam is hidden unless explicitly requested
    pub include_spam: bool,
}

impl ReportFilter {
    pub fn matches_search(&self, report: &Report) -> bool {
        match &self.search {
            Some(term) => report.text.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}
