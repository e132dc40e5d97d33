/// JWT token generation and validation
///
/// Tokens are signed with HS256 and bind a numeric user identity via the
/// `sub` claim. The default lifetime is 60 minutes; verification accepts a
/// small clock-skew leeway.
///
/// # Example
///
/// ```
/// use planboard_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, "alice", "alice@example.com", 60);
/// let token = create_token(&claims, "a-secret-key-at-least-32-bytes-long")?;
///
/// let validated = validate_token(&token, "a-secret-key-at-least-32-bytes-long")?;
/// assert_eq!(validated.sub, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Clock-skew leeway accepted when validating `exp`/`iat`, in seconds.
const VALIDATION_LEEWAY_SECS: u64 = 30;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// JWT claims structure
///
/// `sub` carries the numeric user id; `username` and `email` are additional
/// claims carried for traceability only; authorization always re-reads the
/// user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - numeric user ID
    pub sub: i64,

    /// Username at issue time
    pub username: String,

    /// Email at issue time
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates new claims expiring `ttl_minutes` from now
    pub fn new(user_id: i64, username: &str, email: &str, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::minutes(ttl_minutes);

        Self {
            sub: user_id,
            username: username.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts its claims
///
/// Verifies the signature and expiry, accepting
/// [`VALIDATION_LEEWAY_SECS`] of clock skew.
///
/// # Errors
///
/// Returns `JwtError::Expired` for expired tokens and
/// `JwtError::ValidationError` for any other validation failure.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = VALIDATION_LEEWAY_SECS;
    // The sub claim is numeric, not a string; decode it via our own struct.
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(7, "alice", "alice@example.com", 60);

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new(42, "bob", "bob@example.com", 60);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, 42);
        assert_eq!(validated.username, "bob");
        assert_eq!(validated.email, "bob@example.com");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(1, "eve", "eve@example.com", 60);
        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(validate_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        // Expired well past the leeway window.
        let mut claims = Claims::new(1, "old", "old@example.com", 60);
        claims.iat -= 7200;
        claims.exp -= 7200;
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_leeway_tolerates_slight_skew() {
        // A token that expired a few seconds ago is still accepted.
        let mut claims = Claims::new(1, "skew", "skew@example.com", 60);
        claims.exp = Utc::now().timestamp() - 5;

        let token = create_token(&claims, SECRET).expect("Should create token");
        assert!(validate_token(&token, SECRET).is_ok());
    }
}
