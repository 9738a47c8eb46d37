use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hotel_comfort")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub hotel_id: i32,
    #[sea_orm(primary_key)]
    pub comfort_id: i32,

    #[sea_orm(belongs_to, from = "hotel_id", to = "id")]
    pub hotel: BelongsTo<super::hotel::Entity>,
    #[sea_orm(belongs_to, from = "comfort_id", to = "id")]
    pub comfort: BelongsTo<super::comfort::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
