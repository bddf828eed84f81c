use super::artifact::ModelArtifact;
use super::linear::{argmax, LinearEstimator};
use super::tfidf::TfidfVectorizer;
use super::{clamp01, Classification, ClassifierError, ModelInfo, TextClassifier};
use crate::shared::category::Category;

/// TF-IDF vectorizer followed by a linear estimator
pub struct PipelineClassifier {
    vectorizer: TfidfVectorizer,
    estimator: LinearEstimator,
    labels: Vec<Category>,
    info: ModelInfo,
}

impl PipelineClassifier {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ClassifierError> {
        artifact.validate()?;

        let labels = artifact
            .labels
            .iter()
            .map(|raw| {
                raw.parse::<Category>().unwrap_or_else(|_| {
                    tracing::warn!(
                        "Model label '{}' is not a known category, mapping to {}",
                        raw,
                        Category::FALLBACK
                    );
                    Category::FALLBACK
                })
            })
            .collect();

        Ok(Self {
            vectorizer: TfidfVectorizer::new(artifact.vectorizer),
            estimator: LinearEstimator::new(artifact.estimator),
            labels,
            info: ModelInfo {
                model_name: artifact.model_name,
                model_version: artifact.model_version,
            },
        })
    }
}

impl TextClassifier for PipelineClassifier {
    fn classify(&self, text: &str) -> Classification {
        let features = self.vectorizer.transform(text);
        let probs = self.estimator.predict_proba(&features);

        match argmax(&probs) {
            Some((index, confidence)) => Classification {
                category: self.labels[index],
                confidence: clamp01(confidence),
            },
            None => Classification {
                category: Category::FALLBACK,
                confidence: 0.0,
            },
        }
    }

    fn model_info(&self) -> &ModelInfo {
        &self.info
    }
}
