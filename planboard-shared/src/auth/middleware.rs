/// Authentication middleware for Axum
///
/// Validates Bearer tokens from the Authorization header, loads the user row
/// behind the token, and adds the authenticated user to request extensions.
///
/// # Request Extensions
///
/// After successful authentication, middleware adds:
/// - `CurrentUser`: the full user row for the token's subject
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get, middleware, Extension};
/// use axum::extract::Request;
/// use axum::middleware::Next;
/// use planboard_shared::auth::middleware::{jwt_auth_middleware, CurrentUser};
/// use sqlx::PgPool;
///
/// async fn handler(Extension(current): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", current.0.username)
/// }
///
/// fn setup(pool: PgPool) -> Router {
///     Router::new()
///         .route("/protected", get(handler))
///         .layer(middleware::from_fn(move |req: Request, next: Next| {
///             jwt_auth_middleware(pool.clone(), "secret".to_string(), req, next)
///         }))
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;

use super::jwt::{validate_token, JwtError};
use crate::models::user::User;

/// Authenticated user added to request extensions
///
/// Wraps the full user row so handlers never re-fetch it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),

    /// User behind the token no longer exists or is deactivated
    UserNotActive,

    /// Database error
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::UserNotActive => {
                (StatusCode::UNAUTHORIZED, "Invalid authentication credentials").into_response()
            }
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// JWT authentication middleware
///
/// Validates the `Authorization: Bearer <token>` header, then loads the
/// user named by the token's subject. Tokens for deleted or deactivated
/// users are rejected even when the signature is valid.
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - Authorization header is missing
/// - Token validation fails or the token has expired
/// - The user no longer exists or is inactive
pub async fn jwt_auth_middleware(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let user = User::find_by_id(&pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(format!("Database error: {}", e)))?
        .ok_or(AuthError::UserNotActive)?;

    if !user.is_active {
        return Err(AuthError::UserNotActive);
    }

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_into_response() {
        let err = AuthError::MissingCredentials;
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = AuthError::InvalidFormat("test".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let err = AuthError::UserNotActive;
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = AuthError::DatabaseError("test".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
