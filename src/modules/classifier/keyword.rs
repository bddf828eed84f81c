use super::{Classification, ModelInfo, TextClassifier};
use crate::shared::category::Category;

/// Substring rules checked in order, the first hit decides
const RULES: &[(Category, f64, &[&str])] = &[
    (
        Category::Spam,
        0.90,
        &["http", "www", ".com", ".net", "buy", "free", "promo", "sale", "discount"],
    ),
    (
        Category::Obstacle,
        0.80,
        &["loch", "schlagloch", "glas", "hindernis", "stein", "scherben", "ast", "debris"],
    ),
    (
        Category::InfrastructureProblem,
        0.75,
        &["radweg", "infrastruktur", "baustelle", "markierung", "schlecht", "sign", "markings"],
    ),
    (
        Category::DangerSpot,
        0.78,
        &["gefährlich", "kreuzung", "zu schnell", "beinahe", "unfall", "near miss", "close pass"],
    ),
    (
        Category::PositiveFeedback,
        0.70,
        &["danke", "super", "gut", "toll", "great", "love", "nice", "thanks"],
    ),
];

const NO_MATCH: Classification = Classification {
    category: Category::InfrastructureProblem,
    confidence: 0.55,
};

/// Rule-based baseline, the benchmark the trained models are compared against
pub struct KeywordClassifier {
    info: ModelInfo,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self {
            info: ModelInfo {
                model_name: "baseline".to_string(),
                model_version: "1.0".to_string(),
            },
        }
    }
}

impl TextClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Classification {
        let text = text.to_lowercase();
        RULES
            .iter()
            .find(|(_, _, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|&(category, confidence, _)| Classification {
                category,
                confidence,
            })
            .unwrap_or(NO_MATCH)
    }

    fn model_info(&self) -> &ModelInfo {
        &self.info
    }
}
