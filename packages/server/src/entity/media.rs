use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An uploaded photo, attached to a hotel and optionally to one of its
/// rooms. At most one row per hotel (room_id NULL) and per room may have
/// `is_primary = true`; the photo handlers enforce this transactionally.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Uploader.
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub uploader: BelongsTo<super::user::Entity>,

    pub hotel_id: i32,
    #[sea_orm(belongs_to, from = "hotel_id", to = "id")]
    pub hotel: BelongsTo<super::hotel::Entity>,

    /// NULL for hotel-level photos.
    pub room_id: Option<i32>,
    #[sea_orm(belongs_to, from = "room_id", to = "id")]
    pub room: BelongsTo<Option<super::room::Entity>>,

    /// SHA-256 hex reference into the blob store.
    pub content_hash: String,

    /// Original upload filename.
    pub filename: String,

    /// MIME content type guessed from the filename.
    pub content_type: Option<String>,

    /// Denormalized blob size to avoid a store round-trip on listings.
    pub size: i64,

    /// Representative image for list/detail display.
    pub is_primary: bool,

    pub description: Option<String>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
