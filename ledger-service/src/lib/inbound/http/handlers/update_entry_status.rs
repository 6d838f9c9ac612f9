use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::create_entry::EntryData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::entry::models::EntryId;
use crate::domain::entry::models::EntryStatus;
use crate::inbound::http::middleware::AuthenticationContext;
use crate::inbound::http::router::AppState;

pub async fn update_entry_status(
    State(state): State<AppState>,
    context: AuthenticationContext,
    Path(entry_id): Path<i64>,
    Json(body): Json<UpdateStatusRequestBody>,
) -> Result<ApiSuccess<EntryData>, ApiError> {
    let status: EntryStatus = body.status.parse()?;

    state
        .entry_service
        .update_status(context.user_id, EntryId(entry_id), status)
        .await
        .map_err(ApiError::from)
        .map(|ref entry| ApiSuccess::new(StatusCode::OK, entry.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateStatusRequestBody {
    status: String,
}
