/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new user
/// - `POST /v1/auth/login` - Login and get an access token
/// - `GET  /v1/auth/me` - Current user info
/// - `POST /v1/auth/logout` - Logout (stateless acknowledgement)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use planboard_shared::{
    auth::{jwt, middleware::CurrentUser, password},
    models::user::{CreateUser, PublicUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (also validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    pub password: String,
}

/// Token response returned by register and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,

    pub user: PublicUser,
}

/// Registers a new user
///
/// # Errors
///
/// - `409 Conflict`: username or email already taken
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    req.validate()?;
    password::validate_password_strength(&req.password)?;

    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already registered".to_string()));
    }
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            full_name: req.full_name,
        },
    )
    .await?;

    let claims = jwt::Claims::new(
        user.id,
        &user.username,
        &user.email,
        state.config.jwt.access_token_expire_minutes,
    );
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            user: user.public(),
        }),
    ))
}

/// Logs a user in
///
/// The failure message never distinguishes an unknown username from a
/// wrong password.
///
/// # Errors
///
/// - `401 Unauthorized`: bad credentials or deactivated account
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let credentials_error =
        || ApiError::Unauthorized("Incorrect username or password".to_string());

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(credentials_error)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(credentials_error());
    }

    if !user.is_active {
        return Err(ApiError::Unauthorized("Inactive user".to_string()));
    }

    let claims = jwt::Claims::new(
        user.id,
        &user.username,
        &user.email,
        state.config.jwt.access_token_expire_minutes,
    );
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: user.public(),
    }))
}

/// Returns the authenticated user's profile
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<PublicUser> {
    Json(current.0.public())
}

/// Logout acknowledgement
///
/// Tokens are stateless, so there is nothing to revoke server-side;
/// clients drop the token.
pub async fn logout() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Successfully logged out" }))
}
