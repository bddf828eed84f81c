//! Text classification for incoming reports.
//!
//! A classifier maps free report text to one of the fixed [`Category`]
//! labels plus a confidence in `[0, 1]`. The implementation is picked by
//! `CLASSIFIER_MODEL`:
//!
//! | Selection | Implementation | Artifact |
//! |-----------|----------------|----------|
//! | `logreg` (default) | TF-IDF + Logistic Regression | `model/rideaware_model.json` |
//! | `naive_bayes` | TF-IDF + Multinomial Naive Bayes | `model/rideaware_model_nb.json` |
//! | `keyword` | keyword rules baseline | none |
//!
//! Artifacts are trained offline and loaded once at startup. A missing or
//! malformed artifact is a startup error, never a per-request one.

mod artifact;
mod error;
mod keyword;
mod linear;
mod pipeline;
mod tfidf;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::core::config::ClassifierConfig;
use crate::shared::category::Category;

pub use error::ClassifierError;

use artifact::ModelArtifact;
use keyword::KeywordClassifier;
use pipeline::PipelineClassifier;

/// Which classifier the process runs with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    LogisticRegression,
    NaiveBayes,
    Keyword,
}

impl ModelKind {
    pub fn default_artifact_file(&self) -> Option<&'static str> {
        match self {
            ModelKind::LogisticRegression => Some("rideaware_model.json"),
            ModelKind::NaiveBayes => Some("rideaware_model_nb.json"),
            ModelKind::Keyword => None,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::LogisticRegression => write!(f, "logreg"),
            ModelKind::NaiveBayes => write!(f, "naive_bayes"),
            ModelKind::Keyword => write!(f, "keyword"),
        }
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logreg" | "lr" | "logistic" | "logistic_regression" => {
                Ok(ModelKind::LogisticRegression)
            }
            "naive_bayes" | "naivebayes" | "nb" => Ok(ModelKind::NaiveBayes),
            "keyword" | "baseline" => Ok(ModelKind::Keyword),
            other => Err(format!(
                "Invalid CLASSIFIER_MODEL '{}': expected logreg, naive_bayes or keyword",
                other
            )),
        }
    }
}

/// Result of classifying one text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub confidence: f64,
}

/// Provenance recorded on every classified report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub model_name: String,
    pub model_version: String,
}

pub trait TextClassifier: Send + Sync {
    /// Classify already validated, non-empty text
    fn classify(&self, text: &str) -> Classification;

    fn model_info(&self) -> &ModelInfo;
}

/// Build the classifier selected by configuration.
pub fn load_classifier(
    config: &ClassifierConfig,
) -> Result<Arc<dyn TextClassifier>, ClassifierError> {
    match config.artifact_path() {
        None => Ok(Arc::new(KeywordClassifier::new())),
        Some(path) => {
            let artifact = ModelArtifact::load(&path)?;
            let found = artifact.estimator.kind();
            if found != config.model {
                return Err(ClassifierError::KindMismatch {
                    expected: config.model,
                    found,
                });
            }
            let classifier = PipelineClassifier::from_artifact(artifact)?;
            tracing::info!(
                "Loaded {} classifier from {} ({} {})",
                config.model,
                path.display(),
                classifier.model_info().model_name,
                classifier.model_info().model_version
            );
            Ok(Arc::new(classifier))
        }
    }
}

pub(crate) fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
