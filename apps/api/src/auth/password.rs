//! Salted Argon2id password hashing. Hashing is CPU-bound, so the async
//! wrappers run on the blocking pool.

use std::sync::OnceLock;

use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::AppError;

/// Hashes a password into a PHC string (algorithm, params and salt included).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// `false` for a wrong password; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| anyhow!("Password hashing task failed: {e}"))?
        .map_err(|e| AppError::Internal(anyhow!("Password hashing failed: {e}")))
}

pub async fn verify_password_blocking(password: String, stored_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| anyhow!("Password verification task failed: {e}"))?
        .map_err(|e| AppError::Internal(anyhow!("Stored password hash is invalid: {e}")))
}

/// Hash of a throwaway password, verified against when a login names an
/// unknown email so both failure paths cost one Argon2 verify.
fn dummy_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password("recruit-api-unknown-user").unwrap_or_default())
}

/// Runs a verify whose outcome is ignored.
pub async fn verify_dummy_blocking(password: String) {
    let _ = tokio::task::spawn_blocking(move || verify_password(&password, dummy_hash())).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_and_not_plaintext() {
        let first = hash_password("hunter22").unwrap();
        let second = hash_password("hunter22").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert!(!first.contains("hunter22"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_accepts_right_and_rejects_wrong_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_unreadable_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext-password").is_err());
    }

    #[test]
    fn test_dummy_hash_is_real_argon2_and_rejects_guesses() {
        assert!(dummy_hash().starts_with("$argon2id$"));
        assert!(!verify_password("hunter22", dummy_hash()).unwrap());
    }

    #[tokio::test]
    async fn test_dummy_verify_completes() {
        verify_dummy_blocking("anything".to_string()).await;
    }

    #[tokio::test]
    async fn test_blocking_wrappers_round_trip() {
        let hash = hash_password_blocking("s3cret".to_string()).await.unwrap();
        assert!(verify_password_blocking("s3cret".to_string(), hash).await.unwrap());
    }
}
