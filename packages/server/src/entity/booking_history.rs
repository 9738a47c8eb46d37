use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A completed or upcoming reservation. Distinct from a favorite, which
/// carries no date range.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<super::user::Entity>,

    pub hotel_id: i32,
    #[sea_orm(belongs_to, from = "hotel_id", to = "id")]
    pub hotel: BelongsTo<super::hotel::Entity>,

    pub room_id: i32,
    #[sea_orm(belongs_to, from = "room_id", to = "id")]
    pub room: BelongsTo<super::room::Entity>,

    pub date_from: Date,
    pub date_to: Date,

    /// Total price for the stay: room price per night times nights.
    pub price: i32,
    pub people: i32,

    /// Cleared on cancellation.
    pub is_active: bool,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
