use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::categories::dtos::{CategoriesQuery, CategoryResponseDto};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ErrorResponse;

/// List all categories with display labels and legend colours
#[utoipa::path(
    get,
    path = "/categories",
    params(CategoriesQuery),
    responses(
        (status = 200, description = "Category catalogue", body = Vec<CategoryResponseDto>),
        (status = 400, description = "Unsupported language", body = ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    AppQuery(query): AppQuery<CategoriesQuery>,
) -> Result<Json<Vec<CategoryResponseDto>>> {
    let locale = query.locale()?;
    Ok(Json(service.list(locale)))
}

/// Get a single category
#[utoipa::path(
    get,
    path = "/categories/{value}",
    params(
        ("value" = String, Path, description = "Canonical or display name"),
        CategoriesQuery
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryResponseDto),
        (status = 404, description = "Unknown category", body = ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(value): Path<String>,
    AppQuery(query): AppQuery<CategoriesQuery>,
) -> Result<Json<CategoryResponseDto>> {
    let locale = query.locale()?;
    Ok(Json(service.get(&value, locale)?))
}
