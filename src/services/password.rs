/// Password hashing and verification using Argon2id
use argon2::{
    Argon2, PasswordHash, PasswordVerifier,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use crate::error::{ApiError, ApiResult};

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Hash a password with a fresh random salt. Returns a PHC string.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {}", e)))
}

/// `Ok(false)` on mismatch; an unparsable stored hash is an internal error.
pub fn verify_password(password: &str, stored_hash: &str) -> ApiResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ApiError::Internal(format!("invalid password hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
