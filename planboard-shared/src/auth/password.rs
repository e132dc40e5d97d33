/// Password hashing and verification using Argon2id
///
/// Hashes are stored as PHC strings, which carry the salt and parameter set
/// alongside the digest.
///
/// # Example
///
/// ```
/// use planboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("correct horse battery staple")?;
/// assert!(verify_password("correct horse battery staple", &hash)?);
/// assert!(!verify_password("wrong password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Error type for password operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),
}

/// Hashes a password with Argon2id and a fresh random salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored PHC hash string
///
/// Returns `Ok(false)` for a well-formed hash that does not match; hash
/// parse failures are errors.
///
/// # Errors
///
/// Returns `PasswordError::VerifyError` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PasswordError::VerifyError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Validates password strength requirements
///
/// Requires at least 8 characters with one letter and one digit.
///
/// # Errors
///
/// Returns `PasswordError::WeakPassword` naming the failed requirement.
pub fn validate_password_strength(password: &str) -> Result<(), PasswordError> {
    if password.len() < 8 {
        return Err(PasswordError::WeakPassword(
            "must be at least 8 characters".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(PasswordError::WeakPassword(
            "must contain at least one letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::WeakPassword(
            "must contain at least one digit".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1234").expect("Should hash");
        assert!(verify_password("secret1234", &hash).expect("Should verify"));
        assert!(!verify_password("other-password", &hash).expect("Should verify"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret1234").expect("Should hash");
        let b = hash_password("secret1234").expect("Should hash");
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(verify_password("secret1234", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("abc123xy").is_ok());
        assert!(validate_password_strength("short1").is_err());
        assert!(validate_password_strength("onlyletters").is_err());
        assert!(validate_password_strength("12345678").is_err());
    }
}
