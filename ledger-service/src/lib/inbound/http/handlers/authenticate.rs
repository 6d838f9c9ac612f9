use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Exchange email and password for a signed bearer token.
pub async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<AuthenticateRequestBody>,
) -> Result<ApiSuccess<AuthenticateResponseData>, ApiError> {
    let identity = state
        .user_service
        .authenticate(&body.email, &body.password)
        .await?;

    let token = state.token_codec.issue(&identity).map_err(|e| {
        ApiError::InternalServerError(format!("Token generation failed: {}", e))
    })?;

    tracing::info!(user_id = identity.id(), "Token issued");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthenticateResponseData {
            name: identity.display_name().to_string(),
            token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticateRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticateResponseData {
    pub name: String,
    pub token: String,
}
