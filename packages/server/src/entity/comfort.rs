use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Named amenity (e.g. "Wi-Fi", "Pool"), associated to hotels.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comfort")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(has_many, via = "hotel_comfort")]
    pub hotels: HasMany<super::hotel::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
