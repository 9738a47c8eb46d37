use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "room")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub hotel_id: i32,
    #[sea_orm(belongs_to, from = "hotel_id", to = "id")]
    pub hotel: BelongsTo<super::hotel::Entity>,

    pub name: String,
    pub description: String,

    /// Maximum guests per unit.
    pub max_people: i32,

    /// Total unit count of this room type.
    pub rooms: i32,

    /// Units currently free. Not checked against `rooms`.
    pub free_count: i32,

    /// Price per night.
    pub price: i32,

    #[sea_orm(has_many)]
    pub reviews: HasMany<super::review::Entity>,

    #[sea_orm(has_many)]
    pub media: HasMany<super::media::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
