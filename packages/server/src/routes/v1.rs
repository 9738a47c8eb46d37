use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/hotels", hotel_routes())
        .nest("/rooms", room_routes())
        .nest("/bookings", booking_routes())
        .nest("/media", media_routes())
        .nest("/profile", profile_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn hotel_routes() -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(
            handlers::hotel::search_hotels,
            handlers::hotel::create_hotel
        ))
        .routes(routes!(handlers::hotel::get_hotel))
        .routes(routes!(handlers::room::create_room));

    let photos = OpenApiRouter::new()
        .routes(routes!(handlers::media::upload_hotel_photo))
        .layer(handlers::media::photo_body_limit());

    crud.merge(photos)
}

fn room_routes() -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(handlers::room::get_room))
        .routes(routes!(handlers::room::create_review))
        .routes(routes!(handlers::room::book_room))
        .routes(routes!(
            handlers::room::add_favorite,
            handlers::room::remove_favorite
        ));

    let photos = OpenApiRouter::new()
        .routes(routes!(handlers::media::upload_room_photos))
        .layer(handlers::media::photo_batch_body_limit());

    crud.merge(photos)
}

fn booking_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::booking::cancel_booking))
}

fn media_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::media::download_photo))
}

fn profile_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::booking::get_profile))
        .routes(routes!(handlers::hotel::list_owned_hotels))
}
