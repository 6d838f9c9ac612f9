use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// One-way salted password hashing.
///
/// Stateless: the only source of variation is the OS random generator used
/// for salts, so a single instance can be shared freely across tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with Argon2id and a fresh random salt.
    ///
    /// Two calls with the same input never produce the same string.
    ///
    /// # Returns
    /// PHC string (algorithm, parameters, salt and digest in one value)
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 rejected the input or parameters
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext password against a stored PHC hash.
    ///
    /// Parameters and salt are read back from the stored hash. The digest
    /// comparison is constant-time.
    ///
    /// # Returns
    /// `true` when the password matches, `false` otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a parsable PHC string
    pub fn verify(&self, plaintext: &str, secret_hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(secret_hash)
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
