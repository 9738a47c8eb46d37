use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, LockType, Query as SeaQuery};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{comfort, hotel, hotel_comfort, review, room};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::handlers::media::{hotel_primary_photo, hotel_secondary_photos};
use crate::models::hotel::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Hotels",
    operation_id = "searchHotels",
    summary = "Search hotels",
    description = "Public hotel search. All filters are optional and combine with AND. \
        `min_price` matches hotels that have at least one room at or above the bound and \
        `max_price` hotels with at least one room at or below it; the two bounds are \
        independent existence checks, not a joint range over a single room. Results are \
        deduplicated and paginated with a fixed page size of 5. Sorting: `name` (default), \
        `price_asc`/`price_desc` by cheapest room, `stars`, or `rating` by average review \
        stars. Ties always break by hotel ID, so ordering is stable across pages.",
    params(HotelSearchQuery),
    responses(
        (status = 200, description = "Search results", body = HotelListResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn search_hotels(
    State(state): State<AppState>,
    Query(query): Query<HotelSearchQuery>,
) -> Result<Json<HotelListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    // Saturate so an absurd page number yields an empty page, not an
    // overflow. Postgres offsets are i64, so clamp there too.
    let offset = Ord::min(
        page.saturating_sub(1).saturating_mul(PAGE_SIZE),
        i64::MAX as u64,
    );

    let mut select = hotel::Entity::find();

    if let Some(ref name) = query.name {
        let term = escape_like(name.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(hotel::Column::Name)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    if let Some(ref city) = query.city {
        let term = escape_like(city.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(hotel::Column::City)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    if let Some(stars) = query.stars {
        if !(1..=5).contains(&stars) {
            return Err(AppError::Validation("stars must be 1-5".into()));
        }
        select = select.filter(hotel::Column::Stars.eq(stars));
    }

    // Each price bound is its own EXISTS over the hotel's rooms. A hotel
    // with rooms at 80 and 300 matches min_price=100&max_price=200 even
    // though no single room lies in [100, 200].
    if let Some(min) = query.min_price {
        select = select.filter(
            hotel::Column::Id.in_subquery(
                SeaQuery::select()
                    .column(room::Column::HotelId)
                    .from(room::Entity)
                    .and_where(room::Column::Price.gte(min))
                    .to_owned(),
            ),
        );
    }
    if let Some(max) = query.max_price {
        select = select.filter(
            hotel::Column::Id.in_subquery(
                SeaQuery::select()
                    .column(room::Column::HotelId)
                    .from(room::Entity)
                    .and_where(room::Column::Price.lte(max))
                    .to_owned(),
            ),
        );
    }

    let sort = query.sort.as_deref().unwrap_or("name").to_string();
    select = match sort.as_str() {
        "name" => select.order_by_asc(hotel::Column::Name),
        "price_asc" => select.order_by(cheapest_room_price_expr(), Order::Asc),
        "price_desc" => select.order_by(cheapest_room_price_expr(), Order::Desc),
        "stars" => select.order_by_desc(hotel::Column::Stars),
        "rating" => select.order_by(avg_rating_sort_expr(), Order::Desc),
        _ => {
            return Err(AppError::Validation(
                "sort must be one of: name, price_asc, price_desc, stars, rating".into(),
            ));
        }
    };
    // Deterministic tie-break so pages never overlap or skip rows.
    select = select.order_by_asc(hotel::Column::Id);

    let total = select
        .clone()
        .paginate(&state.db, PAGE_SIZE)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(PAGE_SIZE);

    let data = select
        .select_only()
        .column(hotel::Column::Id)
        .column(hotel::Column::Name)
        .column(hotel::Column::City)
        .column(hotel::Column::Stars)
        .column(hotel::Column::ToCenter)
        .column(hotel::Column::Status)
        .column_as(cheapest_room_price_expr(), "min_price")
        .offset(Some(offset))
        .limit(Some(PAGE_SIZE))
        .into_model::<HotelListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(HotelListResponse {
        data,
        pagination: Pagination {
            page,
            per_page: PAGE_SIZE,
            total,
            total_pages,
        },
        filters: SearchFilterEcho {
            name: query.name,
            city: query.city,
            stars: query.stars,
            min_price: query.min_price,
            max_price: query.max_price,
            sort,
        },
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Hotels",
    operation_id = "createHotel",
    summary = "List a new hotel",
    description = "Creates a hotel owned by the authenticated user. New hotels start in \
        `pending` status. Listing status is informational only; it never excludes a hotel \
        from search results.",
    request_body = CreateHotelRequest,
    responses(
        (status = 201, description = "Hotel created", body = HotelResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_hotel(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateHotelRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_hotel(&payload)?;

    let new_hotel = hotel::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        city: Set(payload.city.trim().to_string()),
        stars: Set(payload.stars),
        location: Set(payload.location.trim().to_string()),
        phone: Set(payload.phone.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        about: Set(payload.about.trim().to_string()),
        to_center: Set(payload.to_center),
        status: Set(hotel::STATUS_PENDING.to_string()),
        user_id: Set(auth_user.user_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_hotel.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(HotelResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Hotels",
    operation_id = "getHotel",
    summary = "Get a hotel's detail page",
    description = "Public hotel detail: the hotel record, its rooms ordered by price, its \
        amenities, the cheapest room price, total free units, the average review rating \
        across all its rooms, and its photos with the primary photo split out.",
    params(("id" = i32, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Hotel detail", body = HotelDetailResponse),
        (status = 404, description = "Hotel not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<HotelDetailResponse>, AppError> {
    let hotel = find_hotel(&state.db, id).await?;

    let rooms = room::Entity::find()
        .filter(room::Column::HotelId.eq(id))
        .order_by_asc(room::Column::Price)
        .order_by_asc(room::Column::Id)
        .all(&state.db)
        .await?;

    let comforts = comfort::Entity::find()
        .filter(
            comfort::Column::Id.in_subquery(
                SeaQuery::select()
                    .column(hotel_comfort::Column::ComfortId)
                    .from(hotel_comfort::Entity)
                    .and_where(hotel_comfort::Column::HotelId.eq(id))
                    .to_owned(),
            ),
        )
        .order_by_asc(comfort::Column::Name)
        .all(&state.db)
        .await?;

    let min_price = rooms.iter().map(|r| r.price).min();
    let free_total: i64 = rooms.iter().map(|r| i64::from(r.free_count)).sum();
    let avg_rating = hotel_avg_rating(&state.db, id).await?;

    let primary_photo = hotel_primary_photo(&state.db, id).await?;
    let photos = hotel_secondary_photos(&state.db, id).await?;

    Ok(Json(HotelDetailResponse {
        hotel: hotel.into(),
        rooms: rooms.into_iter().map(Into::into).collect(),
        comforts: comforts.into_iter().map(Into::into).collect(),
        min_price,
        free_total,
        avg_rating,
        primary_photo,
        photos,
    }))
}

#[utoipa::path(
    get,
    path = "/hotels",
    tag = "Profile",
    operation_id = "listOwnedHotels",
    summary = "List the hotels owned by the current user",
    description = "Owner dashboard data: every hotel the user has listed, regardless of \
        status, with its rooms and primary photo.",
    responses(
        (status = 200, description = "Owned hotels", body = OwnedHotelListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_owned_hotels(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<OwnedHotelListResponse>, AppError> {
    let hotels = hotel::Entity::find()
        .filter(hotel::Column::UserId.eq(auth_user.user_id))
        .order_by_asc(hotel::Column::Id)
        .all(&state.db)
        .await?;

    let hotel_ids: Vec<i32> = hotels.iter().map(|h| h.id).collect();
    let mut rooms_by_hotel: HashMap<i32, Vec<room::Model>> = HashMap::new();
    if !hotel_ids.is_empty() {
        let rooms = room::Entity::find()
            .filter(room::Column::HotelId.is_in(hotel_ids))
            .order_by_asc(room::Column::Price)
            .order_by_asc(room::Column::Id)
            .all(&state.db)
            .await?;
        for r in rooms {
            rooms_by_hotel.entry(r.hotel_id).or_default().push(r);
        }
    }

    let mut items = Vec::with_capacity(hotels.len());
    for h in hotels {
        let primary_photo = hotel_primary_photo(&state.db, h.id).await?;
        let rooms = rooms_by_hotel
            .remove(&h.id)
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();
        items.push(OwnedHotelItem {
            hotel: h.into(),
            rooms,
            primary_photo,
        });
    }

    Ok(Json(OwnedHotelListResponse { hotels: items }))
}

/// Sort key: cheapest room price of a hotel. NULL for room-less hotels,
/// which Postgres places last under ASC and first under DESC.
fn cheapest_room_price_expr() -> Expr {
    Expr::cust("(SELECT MIN(\"room\".\"price\") FROM \"room\" WHERE \"room\".\"hotel_id\" = \"hotel\".\"id\")")
}

/// Sort key: average review stars across all of a hotel's rooms.
/// Review-less hotels count as 0 so they sort after every rated hotel.
fn avg_rating_sort_expr() -> Expr {
    Expr::cust(
        "COALESCE((SELECT AVG(\"review\".\"stars\") FROM \"review\" WHERE \"review\".\"hotel_id\" = \"hotel\".\"id\"), 0)",
    )
}

/// Average review stars for one hotel, or None if it has no reviews.
pub(crate) async fn hotel_avg_rating<C: ConnectionTrait>(
    db: &C,
    hotel_id: i32,
) -> Result<Option<f64>, AppError> {
    let avg: Option<f64> = review::Entity::find()
        .filter(review::Column::HotelId.eq(hotel_id))
        .select_only()
        .column_as(
            Expr::cust("CAST(AVG(\"review\".\"stars\") AS double precision)"),
            "avg",
        )
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?
        .flatten();
    Ok(avg)
}

pub(crate) async fn find_hotel<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<hotel::Model, AppError> {
    hotel::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Hotel not found".into()))
}

pub(crate) async fn find_hotel_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<hotel::Model, AppError> {
    hotel::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Hotel not found".into()))
}

/// Ownership gate used by every mutating hotel-scoped operation.
pub(crate) fn require_owner(hotel: &hotel::Model, auth_user: &AuthUser) -> Result<(), AppError> {
    if hotel.user_id != auth_user.user_id {
        return Err(AppError::PermissionDenied);
    }
    Ok(())
}
