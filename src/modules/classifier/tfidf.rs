use std::collections::{BTreeMap, HashMap};

use super::artifact::{Norm, VectorizerParams};
use crate::shared::validation::TOKEN_REGEX;

/// Sparse feature vector as `(feature index, weight)`, sorted by index
pub type SparseVector = Vec<(usize, f64)>;

/// Inference half of a word n-gram TF-IDF vectorizer
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
    lowercase: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
}

impl TfidfVectorizer {
    pub fn new(params: VectorizerParams) -> Self {
        Self {
            vocabulary: params.vocabulary,
            idf: params.idf,
            ngram_range: params.ngram_range,
            lowercase: params.lowercase,
            sublinear_tf: params.sublinear_tf,
            norm: params.norm,
        }
    }

    /// Token n-grams in document order, joined by a single space
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = TOKEN_REGEX.find_iter(&text).map(|m| m.as_str()).collect();

        let (min_n, max_n) = self.ngram_range;
        let mut grams = Vec::new();
        for n in min_n.max(1)..=max_n {
            if n > tokens.len() {
                break;
            }
            grams.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        grams
    }

    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for gram in self.analyze(text) {
            if let Some(&index) = self.vocabulary.get(&gram) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (index, tf * self.idf[index])
            })
            .collect();

        let norm = match self.norm {
            Some(Norm::L2) => vector.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => vector.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            None => 1.0,
        };
        if norm > 0.0 {
            for (_, v) in vector.iter_mut() {
                *v /= norm;
            }
        }
        vector
    }
}
