use serde_json::json;

use crate::common::{TestApp, routes};

fn register_body(email: &str) -> serde_json::Value {
    json!({
        "first_name": "Alice",
        "last_name": "Wonder",
        "email": email,
        "password": "securepass",
        "confirm_password": "securepass",
    })
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_valid_details() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &register_body("alice@example.com"))
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["email"], "alice@example.com");
        assert_eq!(res.body["username"], "alice");
    }

    #[tokio::test]
    async fn username_is_derived_from_email_local_part() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &register_body("Bob.Smith+x@example.com"))
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["username"], "bobsmithx");
    }

    #[tokio::test]
    async fn username_collision_gets_numeric_suffix() {
        let app = TestApp::spawn().await;

        let first = app
            .post_without_token(routes::REGISTER, &register_body("carol@one.example"))
            .await;
        assert_eq!(first.status, 201);
        assert_eq!(first.body["username"], "carol");

        let second = app
            .post_without_token(routes::REGISTER, &register_body("carol@two.example"))
            .await;
        assert_eq!(second.status, 201);
        assert_eq!(second.body["username"], "carol1");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let app = TestApp::spawn().await;

        let first = app
            .post_without_token(routes::REGISTER, &register_body("dave@example.com"))
            .await;
        assert_eq!(first.status, 201);

        let second = app
            .post_without_token(routes::REGISTER, &register_body("dave@example.com"))
            .await;
        assert_eq!(second.status, 409);
        assert_eq!(second.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn mismatched_passwords_are_rejected() {
        let app = TestApp::spawn().await;

        let mut body = register_body("eve@example.com");
        body["confirm_password"] = json!("different1");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = TestApp::spawn().await;

        let mut body = register_body("frank@example.com");
        body["password"] = json!("short");
        body["confirm_password"] = json!("short");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &register_body("not-an-email"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_can_log_in() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::REGISTER, &register_body("alice@example.com"))
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "alice@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["email"], "alice@example.com");
        assert_eq!(res.body["username"], "alice");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::REGISTER, &register_body("alice@example.com"))
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "alice@example.com", "password": "wrongpass1"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_email_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "ghost@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn email_is_case_insensitive_at_login() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::REGISTER, &register_body("alice@example.com"))
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "ALICE@Example.COM", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 200);
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn returns_current_identity() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("me_user").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["email"], "me_user@test.example");
        assert!(res.body["id"].is_number());
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
