use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Alice")]
    pub first_name: String,
    #[schema(example = "Wonder")]
    pub last_name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    /// Must match `password`.
    #[schema(example = "s3cure_P@ss!")]
    pub confirm_password: String,
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }
    let email = payload.email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }
    // Light structural check; the unique constraint is the real gate.
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(AppError::Validation("Invalid email address".into())),
    }
    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    if payload.password != payload.confirm_password {
        return Err(AppError::Validation("Passwords do not match".into()));
    }
    Ok(())
}

/// Base username derived from an email's local part: lowercased, with
/// anything outside `[a-z0-9_]` dropped. Collisions get a numeric suffix
/// at registration time.
pub fn username_base(email: &str) -> String {
    let local = email.trim().split('@').next().unwrap_or("");
    let base: String = local
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if base.is_empty() { "guest".to_string() } else { base }
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Username derived from the email local part.
    #[schema(example = "alice")]
    pub username: String,
}

impl From<crate::entity::user::Model> for RegisterResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "alice")]
    pub username: String,
}

/// Current authenticated user's identity.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "alice")]
    pub username: String,
}
