use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tokio::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportFilter};
use crate::modules::classifier::TextClassifier;
use crate::shared::category::Category;
use crate::shared::constants::EXPORT_COLUMNS;

const REPORT_COLUMNS: &str = "id, text, latitude, longitude, timestamp, category, confidence, \
     source, is_corrected, model_name, model_version";

/// Service for report operations
pub struct ReportService {
    pool: SqlitePool,
    /// Serializes inserts and remembers the last issued timestamp, so ids and
    /// timestamps never go backwards even if the wall clock does
    write_lock: Mutex<Option<DateTime<Utc>>>,
}

impl ReportService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(None),
        }
    }

    /// Store a classified report, assigning id and timestamp
    pub async fn create(&self, data: &CreateReport) -> Result<Report> {
        let mut last_timestamp = self.write_lock.lock().await;

        if last_timestamp.is_none() {
            *last_timestamp = self.latest_timestamp().await?;
        }
        let now = Utc::now();
        let timestamp = match *last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };

        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            INSERT INTO reports (
                text, latitude, longitude, timestamp, category, confidence,
                source, is_corrected, model_name, model_version
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(&data.text)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(timestamp)
        .bind(data.category)
        .bind(data.confidence)
        .bind(&data.source)
        .bind(&data.model_name)
        .bind(&data.model_version)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create report: {:?}", e);
            AppError::Database(e)
        })?;

        *last_timestamp = Some(report.timestamp);

        tracing::info!(
            "Created report: {} category={} confidence={:.2} source={}",
            report.id,
            report.category,
            report.confidence,
            report.source
        );

        Ok(report)
    }

    async fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        sqlx::query_scalar::<_, Option<DateTime<Utc>>>("SELECT MAX(timestamp) FROM reports")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to read latest report timestamp: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Get report by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Report> {
        sqlx::query_as::<_, Report>(&format!(
            "SELECT {} FROM reports WHERE id = ?",
            REPORT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// List reports matching the filter, most recent first
    pub async fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM reports WHERE 1 = 1", REPORT_COLUMNS));

        if !filter.include_spam {
            query.push(" AND category <> ").push_bind(Category::Spam);
        }
        if let Some(category) = filter.category {
            query.push(" AND category = ").push_bind(category);
        }
        query.push(" ORDER BY timestamp DESC, id DESC");

        let reports = query
            .build_query_as::<Report>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })?;

        // SQLite's LIKE and lower() only fold ASCII, so text search runs here
        Ok(reports
            .into_iter()
            .filter(|r| filter.matches_search(r))
            .collect())
    }

    /// CSV export of the reports matching the filter
    pub async fn export_csv(&self, filter: &ReportFilter) -> Result<Vec<u8>> {
        let reports = self.list(filter).await?;
        let csv = write_csv(&reports)?;
        tracing::info!("Exported {} reports as CSV", reports.len());
        Ok(csv)
    }

    /// Human override of the assigned category
    pub async fn correct_category(&self, id: i64, category: Category) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            UPDATE reports
            SET category = ?, is_corrected = 1
            WHERE id = ?
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(category)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to correct report category: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tracing::info!("Corrected report {} to category {}", id, category);
        Ok(report)
    }

    /// Re-run the classifier on a report.
    ///
    /// Returns the report and whether it was updated. Corrected reports are
    /// returned untouched.
    pub async fn reclassify(
        &self,
        id: i64,
        classifier: &dyn TextClassifier,
    ) -> Result<(Report, bool)> {
        let report = self.get_by_id(id).await?;
        if report.is_corrected {
            tracing::info!("Skipping reclassification of corrected report {}", id);
            return Ok((report, false));
        }

        let classification = classifier.classify(&report.text);
        let info = classifier.model_info();

        let updated = sqlx::query_as::<_, Report>(&format!(
            r#"
            UPDATE reports
            SET category = ?, confidence = ?, model_name = ?, model_version = ?
            WHERE id = ? AND is_corrected = 0
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(classification.category)
        .bind(classification.confidence)
        .bind(&info.model_name)
        .bind(&info.model_version)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to reclassify report: {:?}", e);
            AppError::Database(e)
        })?;

        match updated {
            Some(report) => {
                tracing::info!(
                    "Reclassified report {} as {} ({})",
                    id,
                    report.category,
                    info.model_name
                );
                Ok((report, true))
            }
            // A correction landed between the read and the update
            None => Ok((self.get_by_id(id).await?, false)),
        }
    }
}

fn write_csv(reports: &[Report]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| AppError::Internal(format!("Failed to write CSV header: {}", e)))?;

    for r in reports {
        writer
            .write_record([
                r.id.to_string(),
                r.text.clone(),
                r.latitude.to_string(),
                r.longitude.to_string(),
                r.timestamp.to_rfc3339(),
                r.category.to_string(),
                r.confidence.to_string(),
                r.source.clone(),
                r.is_corrected.to_string(),
            ])
            .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV: {}", e)))
}
