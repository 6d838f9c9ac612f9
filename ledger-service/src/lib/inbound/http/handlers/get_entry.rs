use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::create_entry::EntryData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::entry::models::EntryId;
use crate::inbound::http::middleware::AuthenticationContext;
use crate::inbound::http::router::AppState;

pub async fn get_entry(
    State(state): State<AppState>,
    context: AuthenticationContext,
    Path(entry_id): Path<i64>,
) -> Result<ApiSuccess<EntryData>, ApiError> {
    state
        .entry_service
        .get_entry(context.user_id, EntryId(entry_id))
        .await
        .map_err(ApiError::from)
        .map(|ref entry| ApiSuccess::new(StatusCode::OK, entry.into()))
}
