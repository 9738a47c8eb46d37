use serde_json::json;

use crate::common::{TestApp, future_date, routes};

mod book_room {
    use super::*;

    #[tokio::test]
    async fn price_is_per_night_times_nights() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let guest = app.create_authenticated_user("guest").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        let res = app
            .post_with_token(
                &routes::room_book(room_id),
                &json!({
                    "date_from": future_date(30),
                    "date_to": future_date(33),
                    "people": 2,
                }),
                &guest,
            )
            .await;

        assert_eq!(res.status, 201, "booking failed: {}", res.text);
        assert_eq!(res.body["price"], 450);
        assert_eq!(res.body["hotel_id"], hotel_id);
        assert_eq!(res.body["room_id"], room_id);
        assert_eq!(res.body["is_active"], true);
    }

    #[tokio::test]
    async fn reversed_dates_are_rejected() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        let res = app
            .post_with_token(
                &routes::room_book(room_id),
                &json!({
                    "date_from": future_date(33),
                    "date_to": future_date(30),
                    "people": 2,
                }),
                &owner,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn booking_requires_authentication() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        let res = app
            .post_without_token(
                &routes::room_book(room_id),
                &json!({
                    "date_from": future_date(30),
                    "date_to": future_date(31),
                    "people": 2,
                }),
            )
            .await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn overlapping_bookings_are_allowed() {
        // Availability is display data only; two guests can book the same
        // room type for the same dates.
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let alice = app.create_authenticated_user("alice").await;
        let bob = app.create_authenticated_user("bob").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        app.book_room(&alice, room_id, &future_date(30), &future_date(33))
            .await;
        app.book_room(&bob, room_id, &future_date(30), &future_date(33))
            .await;
    }
}

mod cancel {
    use super::*;

    #[tokio::test]
    async fn owner_can_cancel_a_future_booking() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let guest = app.create_authenticated_user("guest").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;
        let booking_id = app
            .book_room(&guest, room_id, &future_date(30), &future_date(33))
            .await;

        let res = app
            .post_with_token(&routes::booking_cancel(booking_id), &json!({}), &guest)
            .await;

        assert_eq!(res.status, 200, "cancel failed: {}", res.text);
        assert_eq!(res.body["is_active"], false);
    }

    #[tokio::test]
    async fn cancelling_someone_elses_booking_is_forbidden() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let guest = app.create_authenticated_user("guest").await;
        let other = app.create_authenticated_user("other").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;
        let booking_id = app
            .book_room(&guest, room_id, &future_date(30), &future_date(33))
            .await;

        let res = app
            .post_with_token(&routes::booking_cancel(booking_id), &json!({}), &other)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn double_cancel_is_a_conflict() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let guest = app.create_authenticated_user("guest").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;
        let booking_id = app
            .book_room(&guest, room_id, &future_date(30), &future_date(33))
            .await;

        let first = app
            .post_with_token(&routes::booking_cancel(booking_id), &json!({}), &guest)
            .await;
        assert_eq!(first.status, 200);

        let second = app
            .post_with_token(&routes::booking_cancel(booking_id), &json!({}), &guest)
            .await;
        assert_eq!(second.status, 409);
        assert_eq!(second.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn unknown_booking_is_not_found() {
        let app = TestApp::spawn().await;
        let guest = app.create_authenticated_user("guest").await;

        let res = app
            .post_with_token(&routes::booking_cancel(999_999), &json!({}), &guest)
            .await;

        assert_eq!(res.status, 404);
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn splits_bookings_by_active_flag() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let guest = app.create_authenticated_user("guest").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        let kept = app
            .book_room(&guest, room_id, &future_date(30), &future_date(33))
            .await;
        let cancelled = app
            .book_room(&guest, room_id, &future_date(40), &future_date(42))
            .await;
        app.post_with_token(&routes::booking_cancel(cancelled), &json!({}), &guest)
            .await;

        let res = app.get_with_token(routes::PROFILE, &guest).await;

        assert_eq!(res.status, 200);
        let active = res.body["active_bookings"].as_array().unwrap();
        let inactive = res.body["inactive_bookings"].as_array().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0]["id"], kept);
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0]["id"], cancelled);
    }

    #[tokio::test]
    async fn includes_identity_and_favorites() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let guest = app.create_authenticated_user("guest").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        app.put_with_token(&routes::room_favorite(room_id), &guest)
            .await;

        let res = app.get_with_token(routes::PROFILE, &guest).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["user"]["email"], "guest@test.example");
        let favorites = res.body["favorites"].as_array().unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0]["room_id"], room_id);
        assert_eq!(favorites[0]["hotel_id"], hotel_id);
    }

    #[tokio::test]
    async fn only_shows_the_callers_bookings() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let alice = app.create_authenticated_user("alice").await;
        let bob = app.create_authenticated_user("bob").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        app.book_room(&alice, room_id, &future_date(30), &future_date(33))
            .await;

        let res = app.get_with_token(routes::PROFILE, &bob).await;

        assert!(res.body["active_bookings"].as_array().unwrap().is_empty());
        assert!(res.body["inactive_bookings"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::PROFILE).await;

        assert_eq!(res.status, 401);
    }
}
