use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ClassifierError, ModelKind};

/// Trained TF-IDF + linear model, exported to JSON by the offline trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_name: String,
    pub model_version: String,
    /// Class labels in estimator row order
    pub labels: Vec<String>,
    pub vectorizer: VectorizerParams,
    pub estimator: EstimatorParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerParams {
    /// term -> feature index
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index
    pub idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    /// `null` disables normalization
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorParams {
    LogisticRegression {
        /// One row per class, or a single row for a binary model
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    NaiveBayes {
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    },
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

impl EstimatorParams {
    pub fn kind(&self) -> ModelKind {
        match self {
            EstimatorParams::LogisticRegression { .. } => ModelKind::LogisticRegression,
            EstimatorParams::NaiveBayes { .. } => ModelKind::NaiveBayes,
        }
    }
}

impl ModelArtifact {
    /// Read and validate an artifact from disk
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ArtifactMissing(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ClassifierError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ClassifierError> {
        let artifact: ModelArtifact = serde_json::from_str(raw)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check that every matrix matches the vocabulary and label count, so
    /// inference can index without bounds failures.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let n_labels = self.labels.len();
        let n_features = self.vectorizer.vocabulary.len();

        if n_labels < 2 {
            return invalid(format!("expected at least 2 labels, got {}", n_labels));
        }
        if self.vectorizer.idf.len() != n_features {
            return invalid(format!(
                "idf has {} entries but vocabulary has {} terms",
                self.vectorizer.idf.len(),
                n_features
            ));
        }
        let (min_n, max_n) = self.vectorizer.ngram_range;
        if min_n == 0 || min_n > max_n {
            return invalid(format!("invalid ngram_range ({}, {})", min_n, max_n));
        }

        let mut seen = vec![false; n_features];
        for (term, &index) in &self.vectorizer.vocabulary {
            if index >= n_features {
                return invalid(format!(
                    "term '{}' has index {} outside 0..{}",
                    term, index, n_features
                ));
            }
            if std::mem::replace(&mut seen[index], true) {
                return invalid(format!("feature index {} is used twice", index));
            }
        }
        check_finite("idf", &self.vectorizer.idf)?;

        match &self.estimator {
            EstimatorParams::LogisticRegression { coef, intercept } => {
                let binary = n_labels == 2 && coef.len() == 1;
                if coef.len() != n_labels && !binary {
                    return invalid(format!(
                        "coef has {} rows for {} labels",
                        coef.len(),
                        n_labels
                    ));
                }
                if intercept.len() != coef.len() {
                    return invalid(format!(
                        "intercept has {} entries for {} coef rows",
                        intercept.len(),
                        coef.len()
                    ));
                }
                check_rows("coef", coef, n_features)?;
                check_finite("intercept", intercept)?;
            }
            EstimatorParams::NaiveBayes {
                class_log_prior,
                feature_log_prob,
            } => {
                if class_log_prior.len() != n_labels || feature_log_prob.len() != n_labels {
                    return invalid(format!(
                        "naive bayes has {} priors and {} likelihood rows for {} labels",
                        class_log_prior.len(),
                        feature_log_prob.len(),
                        n_labels
                    ));
                }
                check_rows("feature_log_prob", feature_log_prob, n_features)?;
                check_finite("class_log_prior", class_log_prior)?;
            }
        }

        Ok(())
    }
}

fn invalid<T>(message: String) -> Result<T, ClassifierError> {
    Err(ClassifierError::InvalidArtifact(message))
}

fn check_rows(name: &str, rows: &[Vec<f64>], width: usize) -> Result<(), ClassifierError> {
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return invalid(format!(
                "{} row {} has {} columns, expected {}",
                name,
                i,
                row.len(),
                width
            ));
        }
        check_finite(name, row)?;
    }
    Ok(())
}

fn check_finite(name: &str, values: &[f64]) -> Result<(), ClassifierError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        invalid(format!("{} contains non-finite values", name))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Six-term unigram model with one strong keyword per class
    pub fn naive_bayes_json() -> String {
        r#"{
            "model_name": "tfidf+naivebayes",
            "model_version": "1.0",
            "labels": ["Hindernis", "Infrastrukturproblem", "Gefahrenstelle", "Positives Feedback", "Spam"],
            "vectorizer": {
                "vocabulary": {"glas": 0, "radweg": 1, "kreuzung": 2, "danke": 3, "www": 4, "markierung": 5},
                "idf": [1.0, 1.0, 1.0, 1.0, 1.0, 1.0]
            },
            "estimator": {
                "kind": "naive_bayes",
                "class_log_prior": [-1.6094, -1.6094, -1.6094, -1.6094, -1.6094],
                "feature_log_prob": [
                    [-0.5, -3.0, -3.0, -3.0, -3.0, -3.0],
                    [-3.0, -1.0, -3.0, -3.0, -3.0, -1.0],
                    [-3.0, -3.0, -0.5, -3.0, -3.0, -3.0],
                    [-3.0, -3.0, -3.0, -0.5, -3.0, -3.0],
                    [-3.0, -3.0, -3.0, -3.0, -0.5, -3.0]
                ]
            }
        }"#
        .to_string()
    }

    /// Unigram + bigram logistic model, bigram "near miss" votes for danger
    pub fn logistic_json() -> String {
        r#"{
            "model_name": "tfidf+logreg",
            "model_version": "1.0",
            "labels": ["Hindernis", "Infrastrukturproblem", "Gefahrenstelle", "Positives Feedback", "Spam"],
            "vectorizer": {
                "vocabulary": {"glas": 0, "radweg": 1, "kreuzung": 2, "danke": 3, "www": 4, "markierung": 5, "near miss": 6},
                "idf": [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                "ngram_range": [1, 2]
            },
            "estimator": {
                "kind": "logistic_regression",
                "coef": [
                    [3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                    [0.0, 2.0, 0.0, 0.0, 0.0, 2.0, 0.0],
                    [0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 3.0],
                    [0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0],
                    [0.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0]
                ],
                "intercept": [0.0, 0.0, 0.0, 0.0, 0.0]
            }
        }"#
        .to_string()
    }

    fn with<F: FnOnce(&mut serde_json::Value)>(raw: &str, edit: F) -> String {
        let mut value: serde_json::Value = serde_json::from_str(raw).unwrap();
        edit(&mut value);
        value.to_string()
    }

    fn expect_invalid(raw: &str, needle: &str) {
        match ModelArtifact::from_json(raw) {
            Err(ClassifierError::InvalidArtifact(msg)) => {
                assert!(msg.contains(needle), "'{}' does not mention '{}'", msg, needle)
            }
            other => panic!("expected invalid artifact, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_fixtures_are_valid() {
        let nb = ModelArtifact::from_json(&naive_bayes_json()).unwrap();
        assert_eq!(nb.estimator.kind(), ModelKind::NaiveBayes);
        assert_eq!(nb.vectorizer.ngram_range, (1, 1));
        assert!(nb.vectorizer.lowercase);
        assert_eq!(nb.vectorizer.norm, Some(Norm::L2));

        let lr = ModelArtifact::from_json(&logistic_json()).unwrap();
        assert_eq!(lr.estimator.kind(), ModelKind::LogisticRegression);
        assert_eq!(lr.vectorizer.ngram_range, (1, 2));
    }

    #[test]
    fn test_null_norm_disables_normalization() {
        let raw = with(&naive_bayes_json(), |v| {
            v["vectorizer"]["norm"] = serde_json::Value::Null;
        });
        let artifact = ModelArtifact::from_json(&raw).unwrap();
        assert_eq!(artifact.vectorizer.norm, None);
    }

    #[test]
    fn test_rejects_idf_length_mismatch() {
        let raw = with(&naive_bayes_json(), |v| {
            v["vectorizer"]["idf"] = serde_json::json!([1.0, 1.0]);
        });
        expect_invalid(&raw, "idf has 2 entries");
    }

    #[test]
    fn test_rejects_out_of_range_vocabulary_index() {
        let raw = with(&naive_bayes_json(), |v| {
            v["vectorizer"]["vocabulary"]["glas"] = serde_json::json!(42);
        });
        expect_invalid(&raw, "outside");
    }

    #[test]
    fn test_rejects_short_weight_rows() {
        let raw = with(&logistic_json(), |v| {
            v["estimator"]["coef"][2] = serde_json::json!([1.0, 2.0]);
        });
        expect_invalid(&raw, "coef row 2");
    }

    #[test]
    fn test_rejects_label_count_mismatch() {
        let raw = with(&naive_bayes_json(), |v| {
            v["labels"] = serde_json::json!(["Hindernis", "Spam", "Gefahrenstelle"]);
        });
        expect_invalid(&raw, "for 3 labels");
    }

    #[test]
    fn test_accepts_binary_logistic_regression() {
        let raw = r#"{
            "model_name": "binary",
            "model_version": "1",
            "labels": ["Spam", "Hindernis"],
            "vectorizer": {"vocabulary": {"glas": 0}, "idf": [1.0]},
            "estimator": {"kind": "logistic_regression", "coef": [[2.0]], "intercept": [0.0]}
        }"#;
        assert!(ModelArtifact::from_json(raw).is_ok());
    }

    #[test]
    fn test_unknown_estimator_kind_is_json_error() {
        let raw = with(&naive_bayes_json(), |v| {
            v["estimator"]["kind"] = serde_json::json!("svm");
        });
        assert!(matches!(
            ModelArtifact::from_json(&raw),
            Err(ClassifierError::Json(_))
        ));
    }
}
