use serde_json::json;

use crate::common::{TestApp, routes};

fn room_body() -> serde_json::Value {
    json!({
        "name": "Double Deluxe",
        "description": "Sea view, 28 sqm.",
        "max_people": 2,
        "price": 150,
        "free_count": 3,
        "rooms": 5,
    })
}

mod create_room {
    use super::*;

    #[tokio::test]
    async fn owner_can_add_a_room_type() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("owner").await;
        let hotel_id = app.create_hotel(&token, "Grand Plaza", "Lisbon", 4).await;

        let res = app
            .post_with_token(&routes::hotel_rooms(hotel_id), &room_body(), &token)
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["name"], "Double Deluxe");
        assert_eq!(res.body["hotel_id"], hotel_id);
        assert_eq!(res.body["price"], 150);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let stranger = app.create_authenticated_user("stranger").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;

        let res = app
            .post_with_token(&routes::hotel_rooms(hotel_id), &room_body(), &stranger)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn non_numeric_capacity_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("owner").await;
        let hotel_id = app.create_hotel(&token, "Grand Plaza", "Lisbon", 4).await;

        let mut body = room_body();
        body["max_people"] = json!("lots");
        let res = app
            .post_with_token(&routes::hotel_rooms(hotel_id), &body, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn free_count_above_unit_count_is_accepted() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("owner").await;
        let hotel_id = app.create_hotel(&token, "Grand Plaza", "Lisbon", 4).await;

        let mut body = room_body();
        body["free_count"] = json!(99);
        let res = app
            .post_with_token(&routes::hotel_rooms(hotel_id), &body, &token)
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["free_count"], 99);
    }

    #[tokio::test]
    async fn unknown_comfort_id_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("owner").await;
        let hotel_id = app.create_hotel(&token, "Grand Plaza", "Lisbon", 4).await;

        let mut body = room_body();
        body["comfort_ids"] = json!([999_999]);
        let res = app
            .post_with_token(&routes::hotel_rooms(hotel_id), &body, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn comfort_ids_attach_amenities_to_the_hotel() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("owner").await;
        let hotel_id = app.create_hotel(&token, "Grand Plaza", "Lisbon", 4).await;

        // Seeded amenity catalog starts at ID 1.
        let mut body = room_body();
        body["comfort_ids"] = json!([1, 2, 1]);
        let res = app
            .post_with_token(&routes::hotel_rooms(hotel_id), &body, &token)
            .await;
        assert_eq!(res.status, 201);

        let detail = app.get_without_token(&routes::hotel(hotel_id)).await;
        assert_eq!(detail.body["comforts"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_hotel_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("owner").await;

        let res = app
            .post_with_token(&routes::hotel_rooms(999_999), &room_body(), &token)
            .await;

        assert_eq!(res.status, 404);
    }
}

mod room_detail {
    use super::*;

    #[tokio::test]
    async fn includes_hotel_and_reviews() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let guest = app.create_authenticated_user("guest").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        let review = app
            .post_with_token(
                &routes::room_reviews(room_id),
                &json!({"text": "Lovely.", "stars": 5}),
                &guest,
            )
            .await;
        assert_eq!(review.status, 201);

        let res = app.get_without_token(&routes::room(room_id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Double");
        assert_eq!(res.body["hotel"]["name"], "Grand Plaza");
        let reviews = res.body["reviews"].as_array().unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0]["stars"], 5);
    }

    #[tokio::test]
    async fn unknown_room_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::room(999_999)).await;

        assert_eq!(res.status, 404);
    }
}

mod reviews {
    use super::*;

    #[tokio::test]
    async fn any_authenticated_user_can_review_any_room() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let guest = app.create_authenticated_user("guest").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        let res = app
            .post_with_token(
                &routes::room_reviews(room_id),
                &json!({"text": "No booking needed.", "stars": 4}),
                &guest,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["hotel_id"], hotel_id);
        assert_eq!(res.body["room_id"], room_id);
    }

    #[tokio::test]
    async fn review_requires_authentication() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        let res = app
            .post_without_token(
                &routes::room_reviews(room_id),
                &json!({"text": "Anon.", "stars": 4}),
            )
            .await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn zero_stars_are_rejected() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        let res = app
            .post_with_token(
                &routes::room_reviews(room_id),
                &json!({"text": "Bad.", "stars": 0}),
                &owner,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod favorites {
    use super::*;

    #[tokio::test]
    async fn favorite_is_idempotent() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let guest = app.create_authenticated_user("guest").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        let first = app
            .put_with_token(&routes::room_favorite(room_id), &guest)
            .await;
        assert_eq!(first.status, 204);

        let second = app
            .put_with_token(&routes::room_favorite(room_id), &guest)
            .await;
        assert_eq!(second.status, 204);

        let profile = app.get_with_token(routes::PROFILE, &guest).await;
        assert_eq!(profile.body["favorites"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unfavorite_removes_and_is_idempotent() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("owner").await;
        let guest = app.create_authenticated_user("guest").await;
        let hotel_id = app.create_hotel(&owner, "Grand Plaza", "Lisbon", 4).await;
        let room_id = app.create_room(&owner, hotel_id, "Double", 150).await;

        app.put_with_token(&routes::room_favorite(room_id), &guest)
            .await;

        let removed = app
            .delete_with_token(&routes::room_favorite(room_id), &guest)
            .await;
        assert_eq!(removed.status, 204);

        let again = app
            .delete_with_token(&routes::room_favorite(room_id), &guest)
            .await;
        assert_eq!(again.status, 204);

        let profile = app.get_with_token(routes::PROFILE, &guest).await;
        assert!(profile.body["favorites"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn favoriting_an_unknown_room_is_not_found() {
        let app = TestApp::spawn().await;
        let guest = app.create_authenticated_user("guest").await;

        let res = app
            .put_with_token(&routes::room_favorite(999_999), &guest)
            .await;

        assert_eq!(res.status, 404);
    }
}
