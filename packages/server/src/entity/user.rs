use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,

    /// Derived from the email local part at registration.
    #[sea_orm(unique)]
    pub username: String,

    /// Argon2 password hash.
    pub password: String,

    pub first_name: String,
    pub last_name: String,

    #[sea_orm(has_many)]
    pub hotels: HasMany<super::hotel::Entity>,

    #[sea_orm(has_many)]
    pub bookings: HasMany<super::booking_history::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
