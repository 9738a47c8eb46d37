use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{booking_favorite, booking_history, comfort, hotel_comfort, review, room};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::handlers::hotel::{find_hotel, find_hotel_for_update, require_owner};
use crate::handlers::media::{room_primary_photo, room_secondary_photos};
use crate::models::booking::{BookRoomRequest, BookingResponse, stay_price, validate_book_room};
use crate::models::room::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/{id}/rooms",
    tag = "Rooms",
    operation_id = "createRoom",
    summary = "Add a room type to a hotel",
    description = "Creates a room type under a hotel. Only the hotel owner may add rooms. \
        `comfort_ids` associates amenities with the parent hotel; unknown IDs are rejected. \
        `free_count` above the total unit count is accepted — inventory consistency is not \
        enforced.",
    params(("id" = i32, Path, description = "Hotel ID")),
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the hotel owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Hotel not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(hotel_id, name = %payload.name))]
pub async fn create_room(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(hotel_id): Path<i32>,
    AppJson(payload): AppJson<CreateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_room(&payload)?;

    let mut comfort_ids = payload.comfort_ids.clone();
    comfort_ids.sort_unstable();
    comfort_ids.dedup();

    let txn = state.db.begin().await?;
    let hotel = find_hotel_for_update(&txn, hotel_id).await?;
    require_owner(&hotel, &auth_user)?;

    if !comfort_ids.is_empty() {
        let known = comfort::Entity::find()
            .filter(comfort::Column::Id.is_in(comfort_ids.clone()))
            .count(&txn)
            .await?;
        if known != comfort_ids.len() as u64 {
            return Err(AppError::Validation("Unknown comfort ID".into()));
        }
    }

    let new_room = room::ActiveModel {
        hotel_id: Set(hotel_id),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        max_people: Set(payload.max_people),
        rooms: Set(payload.rooms),
        free_count: Set(payload.free_count),
        price: Set(payload.price),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_room.insert(&txn).await?;

    for comfort_id in comfort_ids {
        let link = hotel_comfort::ActiveModel {
            hotel_id: Set(hotel_id),
            comfort_id: Set(comfort_id),
        };
        let result = hotel_comfort::Entity::insert(link)
            .on_conflict(
                OnConflict::columns([
                    hotel_comfort::Column::HotelId,
                    hotel_comfort::Column::ComfortId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await;
        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }
    }

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(RoomResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Rooms",
    operation_id = "getRoom",
    summary = "Get a room's detail page",
    description = "Public room detail: the room, its hotel, reviews (newest first), and \
        the room's photos with the primary photo split out.",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room detail", body = RoomDetailResponse),
        (status = 404, description = "Room not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RoomDetailResponse>, AppError> {
    let room = find_room(&state.db, id).await?;
    let hotel = find_hotel(&state.db, room.hotel_id).await?;

    let reviews = review::Entity::find()
        .filter(review::Column::RoomId.eq(id))
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .all(&state.db)
        .await?;

    let primary_photo = room_primary_photo(&state.db, id).await?;
    let photos = room_secondary_photos(&state.db, id).await?;

    Ok(Json(RoomDetailResponse {
        room: room.into(),
        hotel: hotel.into(),
        reviews: reviews.into_iter().map(Into::into).collect(),
        primary_photo,
        photos,
    }))
}

#[utoipa::path(
    post,
    path = "/{id}/reviews",
    tag = "Rooms",
    operation_id = "createReview",
    summary = "Review a room",
    description = "Adds a review for a room. Any authenticated user may review any room, \
        own bookings or not; multiple reviews per user and room are allowed. The review's \
        star rating feeds the hotel `rating` search sort.",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Room not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(room_id))]
pub async fn create_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(room_id): Path<i32>,
    AppJson(payload): AppJson<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_review(&payload)?;

    let room = find_room(&state.db, room_id).await?;

    let new_review = review::ActiveModel {
        hotel_id: Set(room.hotel_id),
        room_id: Set(room_id),
        user_id: Set(auth_user.user_id),
        text: Set(payload.text.trim().to_string()),
        stars: Set(payload.stars),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_review.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(model))))
}

#[utoipa::path(
    post,
    path = "/{id}/book",
    tag = "Bookings",
    operation_id = "bookRoom",
    summary = "Book a room",
    description = "Creates an active booking for the authenticated user. The total price \
        is the room's per-night price times the number of nights. No availability check \
        happens; `free_count` is display data only, and overlapping bookings are allowed.",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = BookRoomRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Room not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(room_id, user_id = auth_user.user_id))]
pub async fn book_room(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(room_id): Path<i32>,
    AppJson(payload): AppJson<BookRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_book_room(&payload)?;

    let room = find_room(&state.db, room_id).await?;
    let price = stay_price(room.price, payload.date_from, payload.date_to)?;

    let new_booking = booking_history::ActiveModel {
        user_id: Set(auth_user.user_id),
        hotel_id: Set(room.hotel_id),
        room_id: Set(room_id),
        date_from: Set(payload.date_from),
        date_to: Set(payload.date_to),
        price: Set(price),
        people: Set(payload.people),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_booking.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}/favorite",
    tag = "Bookings",
    operation_id = "addFavorite",
    summary = "Save a room as a favorite",
    description = "Idempotent: favoriting an already-favorited room succeeds without \
        creating a duplicate.",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 204, description = "Room favorited"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Room not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(room_id, user_id = auth_user.user_id))]
pub async fn add_favorite(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(room_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let room = find_room(&state.db, room_id).await?;

    let favorite = booking_favorite::ActiveModel {
        user_id: Set(auth_user.user_id),
        room_id: Set(room_id),
        hotel_id: Set(room.hotel_id),
        created_at: Set(chrono::Utc::now()),
    };
    let result = booking_favorite::Entity::insert(favorite)
        .on_conflict(
            OnConflict::columns([
                booking_favorite::Column::UserId,
                booking_favorite::Column::RoomId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await;
    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/{id}/favorite",
    tag = "Bookings",
    operation_id = "removeFavorite",
    summary = "Remove a room from favorites",
    description = "Idempotent: removing a room that is not favorited succeeds.",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Room not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(room_id, user_id = auth_user.user_id))]
pub async fn remove_favorite(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(room_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    find_room(&state.db, room_id).await?;

    booking_favorite::Entity::delete_many()
        .filter(booking_favorite::Column::UserId.eq(auth_user.user_id))
        .filter(booking_favorite::Column::RoomId.eq(room_id))
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn find_room<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<room::Model, AppError> {
    room::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".into()))
}

pub(crate) async fn find_room_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<room::Model, AppError> {
    room::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".into()))
}
