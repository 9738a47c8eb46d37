use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, body::Body};
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::*;
use stayhub_common::storage::{BoxReader, ContentHash};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::media;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::handlers::hotel::{find_hotel, find_hotel_for_update, require_owner};
use crate::handlers::room::find_room_for_update;
use crate::models::media::{MediaBatchResponse, MediaResponse};
use crate::state::AppState;
use crate::utils::filename::validate_filename;

pub fn photo_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(32 * 1024 * 1024) // 32 MB
}

pub fn photo_batch_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(128 * 1024 * 1024) // 128 MB
}

/// One uploaded file, already persisted to the blob store.
struct StoredUpload {
    filename: String,
    hash: ContentHash,
    size: i64,
    content_type: Option<String>,
}

#[utoipa::path(
    post,
    path = "/{id}/photos",
    tag = "Photos",
    operation_id = "uploadHotelPhoto",
    summary = "Upload a hotel-level photo",
    description = "Uploads one photo for a hotel via the `file` multipart field. Optional \
        fields: `is_primary` (truthy values: 1, true, on) and `description`. When the new \
        photo is marked primary, the previous hotel-level primary is demoted in the same \
        transaction, so the hotel never has two primary photos. Only the hotel owner may \
        upload. Body limit: 32 MB.",
    params(("id" = i32, Path, description = "Hotel ID")),
    request_body(content_type = "multipart/form-data", description = "Photo upload with optional is_primary and description"),
    responses(
        (status = 201, description = "Photo stored", body = MediaResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the hotel owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Hotel not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(hotel_id))]
pub async fn upload_hotel_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(hotel_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    // Ownership is re-checked under lock below; this early check avoids
    // storing a blob for a request that can never succeed.
    let hotel = find_hotel(&state.db, hotel_id).await?;
    require_owner(&hotel, &auth_user)?;

    let mut upload: Option<StoredUpload> = None;
    let mut is_primary = false;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                if upload.is_some() {
                    return Err(AppError::Validation(
                        "Only one 'file' field is allowed per upload".into(),
                    ));
                }
                upload = Some(store_photo_field(field, &state).await?);
            }
            Some("is_primary") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read is_primary: {e}")))?;
                is_primary = parse_checkbox(&text);
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read description: {e}")))?;
                let text = text.trim().to_string();
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;

    let txn = state.db.begin().await?;
    let hotel = find_hotel_for_update(&txn, hotel_id).await?;
    require_owner(&hotel, &auth_user)?;

    if is_primary {
        demote_hotel_primary(&txn, hotel_id).await?;
    }

    let model = insert_media_row(&txn, &auth_user, hotel_id, None, upload, is_primary, description)
        .await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(MediaResponse::from(model))))
}

#[utoipa::path(
    post,
    path = "/{id}/photos",
    tag = "Photos",
    operation_id = "uploadRoomPhotos",
    summary = "Upload a batch of room photos",
    description = "Uploads one or more photos for a room via repeated `photos` multipart \
        fields. The `primary_index` field (default 0) selects which file of the batch \
        becomes the room's primary photo; any existing primary is demoted in the same \
        transaction. An optional `description` applies to every file. Only the owner of \
        the room's hotel may upload. Body limit: 128 MB.",
    params(("id" = i32, Path, description = "Room ID")),
    request_body(content_type = "multipart/form-data", description = "Repeated photos fields with optional primary_index and description"),
    responses(
        (status = 201, description = "Photos stored", body = MediaBatchResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the hotel owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Room not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(room_id))]
pub async fn upload_room_photos(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(room_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let room = crate::handlers::room::find_room(&state.db, room_id).await?;
    let hotel = find_hotel(&state.db, room.hotel_id).await?;
    require_owner(&hotel, &auth_user)?;

    let mut uploads: Vec<StoredUpload> = Vec::new();
    let mut primary_index: usize = 0;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("photos") => {
                uploads.push(store_photo_field(field, &state).await?);
            }
            Some("primary_index") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read primary_index: {e}"))
                })?;
                primary_index = text
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Validation("primary_index must be a non-negative integer".into()))?;
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read description: {e}")))?;
                let text = text.trim().to_string();
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            _ => {}
        }
    }

    if uploads.is_empty() {
        return Err(AppError::Validation("Missing 'photos' field".into()));
    }
    if primary_index >= uploads.len() {
        return Err(AppError::Validation(format!(
            "primary_index {} is out of range for {} uploaded file(s)",
            primary_index,
            uploads.len()
        )));
    }

    let txn = state.db.begin().await?;
    let room = find_room_for_update(&txn, room_id).await?;
    let hotel = find_hotel(&txn, room.hotel_id).await?;
    require_owner(&hotel, &auth_user)?;

    // The batch always contains exactly one primary, so the previous one
    // is unconditionally demoted.
    demote_room_primary(&txn, room_id).await?;

    let mut photos = Vec::with_capacity(uploads.len());
    for (i, upload) in uploads.into_iter().enumerate() {
        let model = insert_media_row(
            &txn,
            &auth_user,
            room.hotel_id,
            Some(room_id),
            upload,
            i == primary_index,
            description.clone(),
        )
        .await?;
        photos.push(MediaResponse::from(model));
    }
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(MediaBatchResponse {
            created: photos.len(),
            photos,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Photos",
    operation_id = "downloadPhoto",
    summary = "Download a photo",
    description = "Public. Streams the photo content with ETag-based caching via \
        If-None-Match.",
    params(("id" = String, Path, description = "Media ID (UUID)")),
    responses(
        (status = 200, description = "Photo content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers), fields(id))]
pub async fn download_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let media_id =
        Uuid::parse_str(&id).map_err(|_| AppError::Validation("Invalid photo ID".into()))?;

    let media = media::Entity::find_by_id(media_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".into()))?;

    let etag_value = format!("\"{}\"", media.content_hash);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let hash = ContentHash::from_hex(&media.content_hash)?;
    let reader = state.blob_store.get_stream(&hash).await?;
    let stream = ReaderStream::new(reader);
    let body = Body::from_stream(stream);

    let content_type = media
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, media.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&media.filename),
        )
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

/// The hotel-level primary photo, if one exists.
pub(crate) async fn hotel_primary_photo<C: ConnectionTrait>(
    db: &C,
    hotel_id: i32,
) -> Result<Option<MediaResponse>, AppError> {
    let found = media::Entity::find()
        .filter(media::Column::HotelId.eq(hotel_id))
        .filter(media::Column::RoomId.is_null())
        .filter(media::Column::IsPrimary.eq(true))
        .one(db)
        .await?;
    Ok(found.map(MediaResponse::from))
}

/// Non-primary hotel-level photos, oldest first.
pub(crate) async fn hotel_secondary_photos<C: ConnectionTrait>(
    db: &C,
    hotel_id: i32,
) -> Result<Vec<MediaResponse>, AppError> {
    let found = media::Entity::find()
        .filter(media::Column::HotelId.eq(hotel_id))
        .filter(media::Column::RoomId.is_null())
        .filter(media::Column::IsPrimary.eq(false))
        .order_by_asc(media::Column::CreatedAt)
        .order_by_asc(media::Column::Id)
        .all(db)
        .await?;
    Ok(found.into_iter().map(MediaResponse::from).collect())
}

/// The room's primary photo, if one exists.
pub(crate) async fn room_primary_photo<C: ConnectionTrait>(
    db: &C,
    room_id: i32,
) -> Result<Option<MediaResponse>, AppError> {
    let found = media::Entity::find()
        .filter(media::Column::RoomId.eq(room_id))
        .filter(media::Column::IsPrimary.eq(true))
        .one(db)
        .await?;
    Ok(found.map(MediaResponse::from))
}

/// Non-primary room photos, oldest first.
pub(crate) async fn room_secondary_photos<C: ConnectionTrait>(
    db: &C,
    room_id: i32,
) -> Result<Vec<MediaResponse>, AppError> {
    let found = media::Entity::find()
        .filter(media::Column::RoomId.eq(room_id))
        .filter(media::Column::IsPrimary.eq(false))
        .order_by_asc(media::Column::CreatedAt)
        .order_by_asc(media::Column::Id)
        .all(db)
        .await?;
    Ok(found.into_iter().map(MediaResponse::from).collect())
}

/// Clear the primary flag on the hotel's current hotel-level primary.
/// Must run inside a transaction holding the hotel row lock.
async fn demote_hotel_primary(txn: &DatabaseTransaction, hotel_id: i32) -> Result<(), AppError> {
    media::Entity::update_many()
        .col_expr(media::Column::IsPrimary, Expr::value(false))
        .filter(media::Column::HotelId.eq(hotel_id))
        .filter(media::Column::RoomId.is_null())
        .filter(media::Column::IsPrimary.eq(true))
        .exec(txn)
        .await?;
    Ok(())
}

/// Clear the primary flag on the room's current primary.
/// Must run inside a transaction holding the room row lock.
async fn demote_room_primary(txn: &DatabaseTransaction, room_id: i32) -> Result<(), AppError> {
    media::Entity::update_many()
        .col_expr(media::Column::IsPrimary, Expr::value(false))
        .filter(media::Column::RoomId.eq(room_id))
        .filter(media::Column::IsPrimary.eq(true))
        .exec(txn)
        .await?;
    Ok(())
}

async fn insert_media_row(
    txn: &DatabaseTransaction,
    auth_user: &AuthUser,
    hotel_id: i32,
    room_id: Option<i32>,
    upload: StoredUpload,
    is_primary: bool,
    description: Option<String>,
) -> Result<media::Model, AppError> {
    let model = media::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(auth_user.user_id),
        hotel_id: Set(hotel_id),
        room_id: Set(room_id),
        content_hash: Set(upload.hash.to_hex()),
        filename: Set(upload.filename),
        content_type: Set(upload.content_type),
        size: Set(upload.size),
        is_primary: Set(is_primary),
        description: Set(description),
        created_at: Set(Utc::now()),
    };
    Ok(model.insert(txn).await?)
}

/// HTML checkbox semantics: browsers send "on", fetch clients send "true"
/// or "1". Anything else is false.
fn parse_checkbox(text: &str) -> bool {
    matches!(text.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on")
}

/// Stream a multipart file field into the blob store via a temp file.
async fn store_photo_field(
    mut field: axum::extract::multipart::Field<'_>,
    state: &AppState,
) -> Result<StoredUpload, AppError> {
    let filename = field
        .file_name()
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
    let filename = validate_filename(&filename)
        .map_err(|e| AppError::Validation(e.message().into()))?
        .to_string();

    let content_type = mime_guess::from_path(&filename)
        .first()
        .map(|m| m.to_string());

    let max_size = state.config.storage.max_photo_size;
    let temp_path = std::env::temp_dir().join(format!("stayhub-upload-{}", Uuid::new_v4()));

    let result = async {
        let mut temp_file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

        let mut total_size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            total_size += chunk.len() as u64;
            if total_size > max_size {
                return Err(AppError::Validation(format!(
                    "File exceeds maximum size of {max_size} bytes"
                )));
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;
        drop(temp_file);

        let file = tokio::fs::File::open(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;
        let reader: BoxReader = Box::new(file);
        let hash = state.blob_store.put_stream(reader).await?;

        Ok((hash, i64::try_from(total_size).unwrap_or(i64::MAX)))
    }
    .await;

    // Best effort.
    let _ = tokio::fs::remove_file(&temp_path).await;

    let (hash, size) = result?;

    Ok(StoredUpload {
        filename,
        hash,
        size,
        content_type,
    })
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "photo".to_string()
    } else {
        ascii_safe
    };

    // RFC 5987 percent-encoding for filename*.
    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => String::from(b as char),
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("inline; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}
