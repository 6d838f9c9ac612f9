use std::sync::Arc;

use async_trait::async_trait;
use auth::CredentialAuthenticator;
use auth::Identity;
use auth::IdentityDirectory;
use chrono::Utc;

use crate::domain::user::directory::UserDirectory;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    directory: Arc<UserDirectory<UR>>,
    authenticator: CredentialAuthenticator<UserDirectory<UR>>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service over a repository.
    ///
    /// Credential checks go through a [`UserDirectory`] over the same repository.
    pub fn new(repository: Arc<UR>) -> Self {
        let directory = Arc::new(UserDirectory::new(Arc::clone(&repository)));

        Self {
            repository,
            authenticator: CredentialAuthenticator::new(Arc::clone(&directory)),
            directory,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if command.password.is_empty() {
            return Err(UserError::EmptyPassword);
        }

        let email_taken = self
            .directory
            .exists_by_email(command.email.as_str())
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        if email_taken {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.authenticator.hash_password(&command.password)?;

        let user = self
            .repository
            .create(NewUser {
                name: command.name,
                email: command.email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, UserError> {
        self.authenticator
            .authenticate(email, password)
            .await
            .map_err(|e| {
                tracing::info!(reason = %e, "Login rejected");
                UserError::from(e)
            })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
