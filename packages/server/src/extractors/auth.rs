use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. Every
/// operation takes the acting identity through this value explicitly;
/// there is no ambient current-user context.
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub username: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let app_state = AppState::from_ref(state);
        let claims = jwt::verify(token, &app_state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser {
            user_id: claims.uid,
            email: claims.sub,
            username: claims.username,
        })
    }
}
