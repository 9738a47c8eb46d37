use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::auth::MeResponse;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct BookRoomRequest {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    /// Guest count.
    pub people: i32,
}

pub fn validate_book_room(req: &BookRoomRequest) -> Result<(), AppError> {
    if req.date_to <= req.date_from {
        return Err(AppError::Validation(
            "Check-out must be after check-in".into(),
        ));
    }
    if req.people < 1 {
        return Err(AppError::Validation("People must be at least 1".into()));
    }
    Ok(())
}

/// Total price of a stay: per-night price times nights.
///
/// No availability check happens anywhere around this; `free_count` is
/// display data only.
pub fn stay_price(price_per_night: i32, from: NaiveDate, to: NaiveDate) -> Result<i32, AppError> {
    let nights = (to - from).num_days();
    i32::try_from(nights)
        .ok()
        .and_then(|n| price_per_night.checked_mul(n))
        .ok_or_else(|| AppError::Validation("Stay is too long".into()))
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BookingResponse {
    pub id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    /// Total price for the stay.
    pub price: i32,
    pub people: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::booking_history::Model> for BookingResponse {
    fn from(m: crate::entity::booking_history::Model) -> Self {
        Self {
            id: m.id,
            hotel_id: m.hotel_id,
            room_id: m.room_id,
            date_from: m.date_from,
            date_to: m.date_to,
            price: m.price,
            people: m.people,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FavoriteResponse {
    pub hotel_id: i32,
    pub room_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::booking_favorite::Model> for FavoriteResponse {
    fn from(m: crate::entity::booking_favorite::Model) -> Self {
        Self {
            hotel_id: m.hotel_id,
            room_id: m.room_id,
            created_at: m.created_at,
        }
    }
}

/// The guest profile: identity, bookings split by the active flag, and
/// saved favorites.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub user: MeResponse,
    pub active_bookings: Vec<BookingResponse>,
    pub inactive_bookings: Vec<BookingResponse>,
    pub favorites: Vec<FavoriteResponse>,
}
