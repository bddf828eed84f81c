use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::shared::category::{Category, Locale};

/// Service for the fixed category catalogue
#[derive(Debug, Default)]
pub struct CategoryService;

impl CategoryService {
    pub fn new() -> Self {
        Self
    }

    /// All categories in legend order
    pub fn list(&self, locale: Locale) -> Vec<CategoryResponseDto> {
        Category::ALL
            .into_iter()
            .map(|c| CategoryResponseDto::new(c, locale))
            .collect()
    }

    /// Look up a category by canonical or display name
    pub fn get(&self, value: &str, locale: Locale) -> Result<CategoryResponseDto> {
        let category = value
            .parse::<Category>()
            .map_err(|e| AppError::NotFound(e.to_string()))?;
        Ok(CategoryResponseDto::new(category, locale))
    }
}
