use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::create_entry::EntryData;
use super::create_entry::EntryRequestBody;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::entry::models::EntryDraft;
use crate::domain::entry::models::EntryId;
use crate::inbound::http::middleware::AuthenticationContext;
use crate::inbound::http::router::AppState;

pub async fn update_entry(
    State(state): State<AppState>,
    context: AuthenticationContext,
    Path(entry_id): Path<i64>,
    Json(body): Json<EntryRequestBody>,
) -> Result<ApiSuccess<EntryData>, ApiError> {
    state
        .entry_service
        .update_entry(context.user_id, EntryId(entry_id), EntryDraft::try_from(body)?)
        .await
        .map_err(ApiError::from)
        .map(|ref entry| ApiSuccess::new(StatusCode::OK, entry.into()))
}
