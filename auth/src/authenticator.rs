use std::sync::Arc;

use crate::directory::DirectoryError;
use crate::directory::Identity;
use crate::directory::IdentityDirectory;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Verifies email and password pairs against an identity directory.
///
/// Read-only: a successful or failed attempt leaves the directory untouched.
pub struct CredentialAuthenticator<D>
where
    D: IdentityDirectory + ?Sized,
{
    directory: Arc<D>,
    password_hasher: PasswordHasher,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("User not found for the given email")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidCredential,

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

impl<D> CredentialAuthenticator<D>
where
    D: IdentityDirectory + ?Sized,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self {
            directory,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check credentials and return the matching identity.
    ///
    /// # Arguments
    /// * `email` - Email the identity was registered with
    /// * `password` - Plaintext password to verify
    ///
    /// # Errors
    /// * `UserNotFound` - No identity owns this email
    /// * `InvalidCredential` - Password does not match
    /// * `Directory` - Identity lookup failed
    /// * `Password` - Stored hash could not be read
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthenticationError> {
        let identity = self
            .directory
            .find_by_email(email)
            .await?
            .ok_or(AuthenticationError::UserNotFound)?;

        if !self
            .password_hasher
            .verify(password, identity.secret_hash())?
        {
            tracing::debug!(user_id = identity.id(), "Password mismatch");
            return Err(AuthenticationError::InvalidCredential);
        }

        Ok(identity)
    }
}
