use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::hotel::HotelResponse;
use crate::models::media::MediaResponse;

use super::shared::{validate_name, validate_stars};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRoomRequest {
    pub name: String,
    pub description: String,
    /// Maximum guests per unit.
    pub max_people: i32,
    /// Price per night.
    pub price: i32,
    /// Units currently free.
    pub free_count: i32,
    /// Total unit count of this room type.
    pub rooms: i32,
    /// Amenities to associate with the parent hotel.
    #[serde(default)]
    pub comfort_ids: Vec<i32>,
}

pub fn validate_create_room(req: &CreateRoomRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Name")?;
    if req.description.trim().is_empty() {
        return Err(AppError::Validation("Description is required".into()));
    }
    if req.max_people < 1 {
        return Err(AppError::Validation("Max people must be at least 1".into()));
    }
    if req.price < 0 {
        return Err(AppError::Validation("Price must not be negative".into()));
    }
    if req.rooms < 1 {
        return Err(AppError::Validation("Unit count must be at least 1".into()));
    }
    // free_count > rooms is deliberately not rejected; inventory
    // consistency is out of scope.
    if req.free_count < 0 {
        return Err(AppError::Validation("Free count must not be negative".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RoomResponse {
    pub id: i32,
    pub hotel_id: i32,
    pub name: String,
    pub description: String,
    pub max_people: i32,
    pub rooms: i32,
    pub free_count: i32,
    pub price: i32,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::room::Model> for RoomResponse {
    fn from(m: crate::entity::room::Model) -> Self {
        Self {
            id: m.id,
            hotel_id: m.hotel_id,
            name: m.name,
            description: m.description,
            max_people: m.max_people,
            rooms: m.rooms,
            free_count: m.free_count,
            price: m.price,
            created_at: m.created_at,
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateReviewRequest {
    pub text: String,
    /// Star rating, 1-5.
    pub stars: i16,
}

pub fn validate_create_review(req: &CreateReviewRequest) -> Result<(), AppError> {
    if req.text.trim().is_empty() || req.text.chars().count() > 5000 {
        return Err(AppError::Validation(
            "Review text must be 1-5000 characters".into(),
        ));
    }
    validate_stars(req.stars)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub room_id: i32,
    pub hotel_id: i32,
    pub user_id: i32,
    pub text: String,
    pub stars: i16,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::review::Model> for ReviewResponse {
    fn from(m: crate::entity::review::Model) -> Self {
        Self {
            id: m.id,
            room_id: m.room_id,
            hotel_id: m.hotel_id,
            user_id: m.user_id,
            text: m.text,
            stars: m.stars,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RoomDetailResponse {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub hotel: HotelResponse,
    pub reviews: Vec<ReviewResponse>,
    pub primary_photo: Option<MediaResponse>,
    /// Non-primary photos.
    pub photos: Vec<MediaResponse>,
}
