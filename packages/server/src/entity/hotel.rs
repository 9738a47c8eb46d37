use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status a newly listed hotel starts in.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hotel")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    /// Star rating, 1-5.
    pub stars: i16,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    /// Distance to the city center in kilometers.
    pub to_center: f64,
    pub about: String,

    /// One of `STATUS_PENDING`, `STATUS_APPROVED`, `STATUS_REJECTED`.
    pub status: String,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub owner: BelongsTo<super::user::Entity>,

    #[sea_orm(has_many)]
    pub rooms: HasMany<super::room::Entity>,

    #[sea_orm(has_many, via = "hotel_comfort")]
    pub comforts: HasMany<super::comfort::Entity>,

    #[sea_orm(has_many)]
    pub media: HasMany<super::media::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
