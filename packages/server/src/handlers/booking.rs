use axum::Json;
use axum::extract::{Path, State};
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{booking_favorite, booking_history};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::auth::MeResponse;
use crate::models::booking::{BookingResponse, FavoriteResponse, ProfileResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/{id}/cancel",
    tag = "Bookings",
    operation_id = "cancelBooking",
    summary = "Cancel a booking",
    description = "Deactivates a booking. Only the booking's owner may cancel. Cancellation \
        is rejected once the check-in date has arrived, and for bookings that are already \
        cancelled. The row is kept as history; nothing is deleted.",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the booking owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Booking not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already cancelled or check-in passed (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn cancel_booking(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BookingResponse>, AppError> {
    let txn = state.db.begin().await?;

    let booking = booking_history::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

    if booking.user_id != auth_user.user_id {
        return Err(AppError::PermissionDenied);
    }
    if !booking.is_active {
        return Err(AppError::Conflict("Booking is already cancelled".into()));
    }

    let today = chrono::Utc::now().date_naive();
    if booking.date_from <= today {
        return Err(AppError::Conflict(
            "Cannot cancel on or after the check-in date".into(),
        ));
    }

    let mut active: booking_history::ActiveModel = booking.into();
    active.is_active = Set(false);
    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(BookingResponse::from(model)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Profile",
    operation_id = "getProfile",
    summary = "Get the guest profile",
    description = "The authenticated user's identity, bookings newest first split into \
        active and inactive, and saved favorites.",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let bookings = booking_history::Entity::find()
        .filter(booking_history::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(booking_history::Column::CreatedAt)
        .order_by_desc(booking_history::Column::Id)
        .all(&state.db)
        .await?;

    let (active, inactive): (Vec<_>, Vec<_>) =
        bookings.into_iter().partition(|b| b.is_active);

    let favorites = booking_favorite::Entity::find()
        .filter(booking_favorite::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(booking_favorite::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(ProfileResponse {
        user: MeResponse {
            id: auth_user.user_id,
            email: auth_user.email,
            username: auth_user.username,
        },
        active_bookings: active.into_iter().map(BookingResponse::from).collect(),
        inactive_bookings: inactive.into_iter().map(BookingResponse::from).collect(),
        favorites: favorites.into_iter().map(FavoriteResponse::from).collect(),
    }))
}
