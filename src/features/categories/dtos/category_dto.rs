use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::error::AppError;
use crate::shared::category::{Category, Locale};

/// One entry of the category legend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    /// Canonical value, used for filtering and corrections
    pub value: Category,
    /// Display name in the requested language
    #[schema(example = "Danger Spot")]
    pub label: String,
    #[schema(example = "#ef4444")]
    pub color: String,
}

impl CategoryResponseDto {
    pub fn new(category: Category, locale: Locale) -> Self {
        Self {
            value: category,
            label: category.label(locale).to_string(),
            color: category.color().to_string(),
        }
    }
}

/// Query params for the category catalogue
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CategoriesQuery {
    /// Label language, `en` (default) or `de`
    pub lang: Option<String>,
}

impl CategoriesQuery {
    pub fn locale(&self) -> Result<Locale, AppError> {
        match self.lang.as_deref().map(str::trim) {
            None | Some("") => Ok(Locale::default()),
            Some(lang) => lang.parse().map_err(AppError::BadRequest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_defaults_to_english() {
        assert_eq!(CategoriesQuery::default().locale().unwrap(), Locale::En);
        let empty = CategoriesQuery {
            lang: Some(String::new()),
        };
        assert_eq!(empty.locale().unwrap(), Locale::En);
    }

    #[test]
    fn test_unsupported_language_is_bad_request() {
        let query = CategoriesQuery {
            lang: Some("fr".to_string()),
        };
        assert!(matches!(query.locale(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_dto_serializes_canonical_value() {
        let dto = CategoryResponseDto::new(Category::DangerSpot, Locale::De);
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["value"], "DangerSpot");
        assert_eq!(json["label"], "Gefahrenstelle");
        assert_eq!(json["color"], "#ef4444");
    }
}
