use std::sync::Arc;

use async_trait::async_trait;
use auth::DirectoryError;
use auth::Identity;
use auth::IdentityDirectory;

use crate::user::ports::UserRepository;

/// Identity directory backed by the user repository.
pub struct UserDirectory<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
}

impl<UR> UserDirectory<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<UR> IdentityDirectory for UserDirectory<UR>
where
    UR: UserRepository,
{
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DirectoryError> {
        self.repository
            .find_by_email(email)
            .await
            .map(|user| user.as_ref().map(Identity::from))
            .map_err(|e| DirectoryError(e.to_string()))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DirectoryError> {
        self.repository
            .exists_by_email(email)
            .await
            .map_err(|e| DirectoryError(e.to_string()))
    }
}
