use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// An account as seen by the authentication layer.
///
/// The secret hash is readable only inside this crate, and the type is not
/// serializable, so it cannot leak into a response body.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    id: i64,
    display_name: String,
    email: String,
    secret_hash: String,
}

impl Identity {
    pub fn new(
        id: i64,
        display_name: impl Into<String>,
        email: impl Into<String>,
        secret_hash: impl Into<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email: email.into(),
            secret_hash: secret_hash.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn secret_hash(&self) -> &str {
        &self.secret_hash
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("secret_hash", &"<redacted>")
            .finish()
    }
}

/// Failure reaching the identity store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Identity directory unavailable: {0}")]
pub struct DirectoryError(pub String);

/// Read-only port to wherever identities are stored.
///
/// Services implement this over their own user repository.
#[async_trait]
pub trait IdentityDirectory: Send + Sync + 'static {
    /// Resolve an identity by its email, compared exactly as stored.
    ///
    /// # Returns
    /// `None` when no identity owns this email
    ///
    /// # Errors
    /// * `DirectoryError` - The underlying store could not be queried
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DirectoryError>;

    /// Whether any identity already owns this email.
    ///
    /// # Errors
    /// * `DirectoryError` - The underlying store could not be queried
    async fn exists_by_email(&self, email: &str) -> Result<bool, DirectoryError>;
}
