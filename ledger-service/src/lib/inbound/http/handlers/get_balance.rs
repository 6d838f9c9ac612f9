use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticationContext;
use crate::inbound::http::router::AppState;

/// Balance of the caller's completed entries. Only the owner may ask, and the
/// account must still exist.
pub async fn get_balance(
    State(state): State<AppState>,
    context: AuthenticationContext,
    Path(user_id): Path<i64>,
) -> Result<ApiSuccess<BalanceResponseData>, ApiError> {
    let user_id = UserId(user_id);
    if user_id != context.user_id {
        return Err(ApiError::Forbidden(
            "Balance is only available to its owner".to_string(),
        ));
    }

    let user = state.user_service.get_user(&user_id).await?;
    let balance = state.entry_service.balance(user.id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        BalanceResponseData {
            user_id: user.id.0,
            balance,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceResponseData {
    pub user_id: i64,
    pub balance: Decimal,
}
