use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::create_entry::EntryData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::entry::errors::EntryError;
use crate::domain::entry::models::EntryFilter;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticationContext;
use crate::inbound::http::router::AppState;

/// List the caller's entries, optionally narrowed by the query parameters.
pub async fn search_entries(
    State(state): State<AppState>,
    context: AuthenticationContext,
    Query(params): Query<SearchEntriesParams>,
) -> Result<ApiSuccess<Vec<EntryData>>, ApiError> {
    let filter = params.into_filter(context.user_id)?;

    state
        .entry_service
        .search(filter)
        .await
        .map_err(ApiError::from)
        .map(|entries| {
            ApiSuccess::new(StatusCode::OK, entries.iter().map(EntryData::from).collect())
        })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchEntriesParams {
    description: Option<String>,
    month: Option<i32>,
    year: Option<i32>,
    kind: Option<String>,
}

impl SearchEntriesParams {
    fn into_filter(self, user_id: UserId) -> Result<EntryFilter, EntryError> {
        Ok(EntryFilter {
            user_id,
            description: self.description.filter(|d| !d.is_empty()),
            month: self.month,
            year: self.year,
            kind: self.kind.map(|kind| kind.parse()).transpose()?,
        })
    }
}
