use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

/// Fixed label set a report can be classified into.
///
/// The PascalCase variant names are the canonical wire and storage values.
/// German labels from the training data are accepted as aliases.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Type, ToSchema,
)]
pub enum Category {
    #[serde(alias = "Hindernis")]
    Obstacle,
    #[serde(alias = "Gefahrenstelle")]
    DangerSpot,
    #[serde(alias = "Infrastrukturproblem")]
    InfrastructureProblem,
    #[serde(alias = "Positives Feedback")]
    PositiveFeedback,
    Spam,
}

/// Display locale for category labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Obstacle,
        Category::DangerSpot,
        Category::InfrastructureProblem,
        Category::PositiveFeedback,
        Category::Spam,
    ];

    /// Label used when a model emits something outside the fixed set
    pub const FALLBACK: Category = Category::InfrastructureProblem;

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Obstacle => "Obstacle",
            Category::DangerSpot => "DangerSpot",
            Category::InfrastructureProblem => "InfrastructureProblem",
            Category::PositiveFeedback => "PositiveFeedback",
            Category::Spam => "Spam",
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, Category::Obstacle) => "Obstacle",
            (Locale::En, Category::DangerSpot) => "Danger Spot",
            (Locale::En, Category::InfrastructureProblem) => "Infrastructure Problem",
            (Locale::En, Category::PositiveFeedback) => "Positive Feedback",
            (Locale::En, Category::Spam) => "Spam",
            (Locale::De, Category::Obstacle) => "Hindernis",
            (Locale::De, Category::DangerSpot) => "Gefahrenstelle",
            (Locale::De, Category::InfrastructureProblem) => "Infrastrukturproblem",
            (Locale::De, Category::PositiveFeedback) => "Positives Feedback",
            (Locale::De, Category::Spam) => "Spam",
        }
    }

    /// Legend colour on the map
    pub fn color(&self) -> &'static str {
        match self {
            Category::Obstacle => "#f59e0b",
            Category::DangerSpot => "#ef4444",
            Category::InfrastructureProblem => "#3b82f6",
            Category::PositiveFeedback => "#22c55e",
            Category::Spam => "#6b7280",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown category '{}'. Expected one of: {}",
            self.0,
            Category::ALL
                .iter()
                .map(Category::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts canonical names, English and German display labels, ignoring
    /// case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.as_str().to_lowercase() == wanted
                    || c.label(Locale::En).to_lowercase() == wanted
                    || c.label(Locale::De).to_lowercase() == wanted
            })
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            other => Err(format!("Unsupported language '{}'. Use 'en' or 'de'", other)),
        }
    }
}
