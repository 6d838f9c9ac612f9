use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::directory::Identity;

/// Payload carried by an access token.
///
/// Field names on the wire are fixed by existing clients: `userid`, `nome`
/// and `horaExpiracao` sit next to the registered `sub`, `iat` and `exp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject: the identity's email
    pub sub: String,

    #[serde(rename = "userid")]
    pub user_id: i64,

    #[serde(rename = "nome")]
    pub display_name: String,

    /// Expiration wall-clock time, `HH:MM` in UTC, for display only
    #[serde(rename = "horaExpiracao")]
    pub expiration_time: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Build the claims for `identity`, valid for `ttl` from `issued_at`.
    ///
    /// `None` when the expiry falls outside the representable time range.
    pub fn for_identity(
        identity: &Identity,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(ttl)?;

        Some(Self {
            sub: identity.email().to_string(),
            user_id: identity.id(),
            display_name: identity.display_name().to_string(),
            expiration_time: expires_at.format("%H:%M").to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// A token stops being valid at the exact second it expires.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
