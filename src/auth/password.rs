//! Password hashing and verification using Argon2id.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::ServiceError;

/// Hashes a password into a PHC string suitable for storage.
///
/// # Errors
///
/// Returns [`ServiceError::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("failed to hash password: {e}")))
}

/// Checks `password` against a stored PHC hash.
///
/// # Errors
///
/// Returns [`ServiceError::Internal`] if the stored hash is malformed. A
/// wrong password is `Ok(false)`, not an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ServiceError::Internal(format!("invalid password hash format: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn hash_and_verify() {
        let hash = assert_ok!(hash_password("correct horse"));
        assert!(hash.starts_with("$argon2id$"));
        assert!(assert_ok!(verify_password("correct horse", &hash)));
    }

    #[test]
    fn wrong_password_is_false() {
        let hash = assert_ok!(hash_password("correct horse"));
        assert!(!assert_ok!(verify_password("battery staple", &hash)));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = assert_ok!(hash_password("same"));
        let b = assert_ok!(hash_password("same"));
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_error() {
        assert_err!(verify_password("anything", "not-a-phc-string"));
    }
}
