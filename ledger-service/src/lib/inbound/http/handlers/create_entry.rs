use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::entry::errors::EntryError;
use crate::domain::entry::models::EntryDraft;
use crate::domain::entry::models::EntryKind;
use crate::domain::entry::models::EntryStatus;
use crate::domain::entry::models::LedgerEntry;
use crate::inbound::http::middleware::AuthenticationContext;
use crate::inbound::http::router::AppState;

pub async fn create_entry(
    State(state): State<AppState>,
    context: AuthenticationContext,
    Json(body): Json<EntryRequestBody>,
) -> Result<ApiSuccess<EntryData>, ApiError> {
    state
        .entry_service
        .create_entry(context.user_id, EntryDraft::try_from(body)?)
        .await
        .map_err(ApiError::from)
        .map(|ref entry| ApiSuccess::new(StatusCode::CREATED, entry.into()))
}

/// Editable entry fields as sent by clients, shared by create and update.
///
/// `kind` stays text until conversion so an unknown value is reported like
/// any other entry error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryRequestBody {
    description: String,
    month: i32,
    year: i32,
    amount: Decimal,
    kind: String,
}

impl TryFrom<EntryRequestBody> for EntryDraft {
    type Error = EntryError;

    fn try_from(body: EntryRequestBody) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: body.kind.parse()?,
            description: body.description,
            month: body.month,
            year: body.year,
            amount: body.amount,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryData {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub month: i32,
    pub year: i32,
    pub amount: Decimal,
    pub kind: EntryKind,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&LedgerEntry> for EntryData {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id.0,
            user_id: entry.user_id.0,
            description: entry.description.clone(),
            month: entry.month,
            year: entry.year,
            amount: entry.amount,
            kind: entry.kind,
            status: entry.status,
            created_at: entry.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn body(kind: &str) -> EntryRequestBody {
        EntryRequestBody {
            description: "Rent".to_string(),
            month: 5,
            year: 2024,
            amount: dec!(800.00),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn test_body_into_draft() {
        let draft = EntryDraft::try_from(body("EXPENSE")).unwrap();

        assert_eq!(draft.kind, EntryKind::Expense);
        assert_eq!(draft.amount, dec!(800.00));
    }

    #[test]
    fn test_unknown_kind_is_an_entry_error() {
        let err = EntryDraft::try_from(body("GIFT")).unwrap_err();

        assert!(matches!(err, EntryError::InvalidKind(ref kind) if kind == "GIFT"));
        assert_eq!(
            ApiError::from(err),
            ApiError::UnprocessableEntity("Unknown entry kind: GIFT".to_string())
        );
    }
}
