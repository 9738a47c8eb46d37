use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub hotel_id: i32,
    #[sea_orm(belongs_to, from = "hotel_id", to = "id")]
    pub hotel: BelongsTo<super::hotel::Entity>,

    pub room_id: i32,
    #[sea_orm(belongs_to, from = "room_id", to = "id")]
    pub room: BelongsTo<super::room::Entity>,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub author: BelongsTo<super::user::Entity>,

    pub text: String,
    /// Star rating, 1-5. Feeds the hotel `rating` sort aggregate.
    pub stars: i16,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
