use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::media::MediaResponse;
use crate::models::room::RoomResponse;

pub use super::shared::{Pagination, escape_like};
use super::shared::{validate_name, validate_stars};

/// Fixed page size of the hotel search listing.
pub const PAGE_SIZE: u64 = 5;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateHotelRequest {
    pub name: String,
    pub city: String,
    /// Star rating, 1-5.
    pub stars: i16,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub about: String,
    /// Distance to the city center in kilometers.
    pub to_center: f64,
}

pub fn validate_create_hotel(req: &CreateHotelRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Name")?;
    validate_name(&req.city, "City")?;
    validate_stars(req.stars)?;
    if req.location.trim().is_empty() {
        return Err(AppError::Validation("Location is required".into()));
    }
    let phone = req.phone.trim();
    if phone.is_empty() || phone.chars().count() > 30 {
        return Err(AppError::Validation("Phone must be 1-30 characters".into()));
    }
    if !req.email.contains('@') {
        return Err(AppError::Validation("Invalid contact email".into()));
    }
    if req.about.trim().is_empty() {
        return Err(AppError::Validation("About is required".into()));
    }
    if !req.to_center.is_finite() || req.to_center < 0.0 {
        return Err(AppError::Validation(
            "Distance to center must be a non-negative number".into(),
        ));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HotelResponse {
    pub id: i32,
    pub name: String,
    pub stars: i16,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub to_center: f64,
    pub about: String,
    /// `pending`, `approved` or `rejected`.
    #[schema(example = "pending")]
    pub status: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::hotel::Model> for HotelResponse {
    fn from(m: crate::entity::hotel::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            stars: m.stars,
            location: m.location,
            phone: m.phone,
            email: m.email,
            city: m.city,
            to_center: m.to_center,
            about: m.about,
            status: m.status,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}

/// Search parameters. All optional and independently combinable.
///
/// `min_price` and `max_price` are each an existence check over the
/// hotel's rooms, not a joint range — see the search handler.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct HotelSearchQuery {
    /// Case-insensitive substring match on hotel name.
    pub name: Option<String>,
    /// Case-insensitive substring match on city.
    pub city: Option<String>,
    /// Exact star rating.
    pub stars: Option<i16>,
    /// Hotel qualifies if at least one room costs this much or more.
    pub min_price: Option<i32>,
    /// Hotel qualifies if at least one room costs this much or less.
    pub max_price: Option<i32>,
    /// One of: name (default), price_asc, price_desc, stars, rating.
    pub sort: Option<String>,
    /// 1-based page number. Page size is fixed at 5.
    pub page: Option<u64>,
}

/// Echo of the filters a result set was produced with, so clients can
/// re-render the search form.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchFilterEcho {
    pub name: Option<String>,
    pub city: Option<String>,
    pub stars: Option<i16>,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub sort: String,
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct HotelListItem {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub stars: i16,
    pub to_center: f64,
    pub status: String,
    /// Cheapest room price, if the hotel has rooms.
    pub min_price: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HotelListResponse {
    pub data: Vec<HotelListItem>,
    pub pagination: Pagination,
    pub filters: SearchFilterEcho,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ComfortResponse {
    pub id: i32,
    #[schema(example = "Wi-Fi")]
    pub name: String,
}

impl From<crate::entity::comfort::Model> for ComfortResponse {
    fn from(m: crate::entity::comfort::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HotelDetailResponse {
    #[serde(flatten)]
    pub hotel: HotelResponse,
    pub rooms: Vec<RoomResponse>,
    pub comforts: Vec<ComfortResponse>,
    /// Cheapest room price across the hotel.
    pub min_price: Option<i32>,
    /// Sum of free units across all room types.
    pub free_total: i64,
    /// Average review stars, if any reviews exist.
    pub avg_rating: Option<f64>,
    pub primary_photo: Option<MediaResponse>,
    /// Non-primary photos.
    pub photos: Vec<MediaResponse>,
}

/// One owned hotel in the owner-profile listing.
#[derive(Serialize, utoipa::ToSchema)]
pub struct OwnedHotelItem {
    #[serde(flatten)]
    pub hotel: HotelResponse,
    pub rooms: Vec<RoomResponse>,
    pub primary_photo: Option<MediaResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct OwnedHotelListResponse {
    pub hotels: Vec<OwnedHotelItem>,
}
