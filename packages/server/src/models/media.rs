use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::media;

/// Response DTO for a single photo.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MediaResponse {
    /// Media record ID (UUIDv7).
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: String,
    /// Original upload filename.
    #[schema(example = "lobby.jpg")]
    pub filename: String,
    /// MIME content type.
    #[schema(example = "image/jpeg")]
    pub content_type: Option<String>,
    /// Blob size in bytes.
    #[schema(example = 142857)]
    pub size: i64,
    /// Whether this is the representative photo of its hotel or room.
    pub is_primary: bool,
    pub description: Option<String>,
    /// SHA-256 content hash.
    #[schema(example = "a1b2c3d4e5f6...")]
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Response DTO for a batch room-photo upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MediaBatchResponse {
    pub created: usize,
    pub photos: Vec<MediaResponse>,
}

impl From<media::Model> for MediaResponse {
    fn from(m: media::Model) -> Self {
        Self {
            id: m.id.to_string(),
            filename: m.filename,
            content_type: m.content_type,
            size: m.size,
            is_primary: m.is_primary,
            description: m.description,
            content_hash: m.content_hash,
            created_at: m.created_at,
        }
    }
}
