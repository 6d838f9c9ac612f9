use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::entry::models::EntryId;
use crate::inbound::http::middleware::AuthenticationContext;
use crate::inbound::http::router::AppState;

pub async fn delete_entry(
    State(state): State<AppState>,
    context: AuthenticationContext,
    Path(entry_id): Path<i64>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .entry_service
        .delete_entry(context.user_id, EntryId(entry_id))
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
