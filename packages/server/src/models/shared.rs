use serde::Serialize;

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 5)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 10)]
    pub total_pages: u64,
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Validate a trimmed display name (1-200 Unicode characters).
pub fn validate_name(name: &str, what: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 200 {
        return Err(AppError::Validation(format!(
            "{what} must be 1-200 characters"
        )));
    }
    Ok(())
}

/// Validate a star rating (1-5).
pub fn validate_stars(stars: i16) -> Result<(), AppError> {
    if !(1..=5).contains(&stars) {
        return Err(AppError::Validation("Stars must be 1-5".into()));
    }
    Ok(())
}
