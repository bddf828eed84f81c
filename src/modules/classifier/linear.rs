use super::artifact::EstimatorParams;
use super::tfidf::SparseVector;

/// Linear scorer over TF-IDF features
pub enum LinearEstimator {
    /// Multinomial (softmax) logistic regression, or binary when `coef` has one row
    Logistic {
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    /// Multinomial naive Bayes
    NaiveBayes {
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    },
}

impl LinearEstimator {
    pub fn new(params: EstimatorParams) -> Self {
        match params {
            EstimatorParams::LogisticRegression { coef, intercept } => {
                LinearEstimator::Logistic { coef, intercept }
            }
            EstimatorParams::NaiveBayes {
                class_log_prior,
                feature_log_prob,
            } => LinearEstimator::NaiveBayes {
                class_log_prior,
                feature_log_prob,
            },
        }
    }

    /// Class probabilities in label order, summing to 1
    pub fn predict_proba(&self, x: &SparseVector) -> Vec<f64> {
        match self {
            LinearEstimator::Logistic { coef, intercept } => {
                let scores: Vec<f64> = coef
                    .iter()
                    .zip(intercept)
                    .map(|(row, b)| dot(row, x) + b)
                    .collect();
                if let [score] = scores.as_slice() {
                    let p = sigmoid(*score);
                    vec![1.0 - p, p]
                } else {
                    softmax(&scores)
                }
            }
            LinearEstimator::NaiveBayes {
                class_log_prior,
                feature_log_prob,
            } => {
                let joint_log_likelihood: Vec<f64> = feature_log_prob
                    .iter()
                    .zip(class_log_prior)
                    .map(|(row, prior)| dot(row, x) + prior)
                    .collect();
                softmax(&joint_log_likelihood)
            }
        }
    }
}

fn dot(row: &[f64], x: &SparseVector) -> f64 {
    x.iter().map(|&(i, v)| row[i] * v).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Numerically stable softmax (log-sum-exp)
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Index and value of the largest probability, first one wins on ties
pub fn argmax(probs: &[f64]) -> Option<(usize, f64)> {
    probs
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((i, p)),
        })
}
