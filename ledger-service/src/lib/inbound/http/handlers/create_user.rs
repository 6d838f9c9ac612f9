use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Register an account. Name and email are checked here, before the service
/// sees the request; password rules and email uniqueness are the service's.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<RegistrationForm>,
) -> Result<ApiSuccess<RegisteredUserData>, ApiError> {
    let command = CreateUserCommand::try_from(body)?;
    let user = state.user_service.create_user(command).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        RegisteredUserData::from(&user),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationForm {
    name: String,
    email: String,
    password: String,
}

impl TryFrom<RegistrationForm> for CreateUserCommand {
    type Error = UserError;

    fn try_from(form: RegistrationForm) -> Result<Self, Self::Error> {
        Ok(CreateUserCommand::new(
            DisplayName::new(form.name)?,
            EmailAddress::new(form.email)?,
            form.password,
        ))
    }
}

/// Registered user as returned to clients; the password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredUserData {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for RegisteredUserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            name: user.name.to_string(),
            email: user.email.to_string(),
            created_at: user.created_at,
        }
    }
}
