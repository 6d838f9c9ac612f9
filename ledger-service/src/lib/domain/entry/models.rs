use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::entry::errors::EntryError;
use crate::domain::entry::errors::EntryValidationError;
use crate::domain::user::models::UserId;

/// Ledger entry identifier, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Direction of money for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "INCOME",
            EntryKind::Expense => "EXPENSE",
        }
    }
}

impl FromStr for EntryKind {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(EntryKind::Income),
            "EXPENSE" => Ok(EntryKind::Expense),
            other => Err(EntryError::InvalidKind(other.to_string())),
        }
    }
}

/// Settlement state of an entry. Only completed entries count towards the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Pending,
    Cancelled,
    Completed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "PENDING",
            EntryStatus::Cancelled => "CANCELLED",
            EntryStatus::Completed => "COMPLETED",
        }
    }
}

impl FromStr for EntryStatus {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(EntryStatus::Pending),
            "CANCELLED" => Ok(EntryStatus::Cancelled),
            "COMPLETED" => Ok(EntryStatus::Completed),
            other => Err(EntryError::InvalidStatus(other.to_string())),
        }
    }
}

/// A recorded income or expense owned by one user.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub description: String,
    pub month: i32,
    pub year: i32,
    pub amount: Decimal,
    pub kind: EntryKind,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Replace the user-editable fields, keeping id, owner, status and creation time.
    pub fn apply(&mut self, draft: EntryDraft) {
        self.description = draft.description;
        self.month = draft.month;
        self.year = draft.year;
        self.amount = draft.amount;
        self.kind = draft.kind;
    }
}

/// User-supplied fields of an entry, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub description: String,
    pub month: i32,
    pub year: i32,
    pub amount: Decimal,
    pub kind: EntryKind,
}

impl EntryDraft {
    /// Check the draft against the ledger's business rules.
    ///
    /// # Errors
    /// * `Description` - Description is blank
    /// * `Month` - Month outside 1..=12
    /// * `Year` - Year is not four digits
    /// * `Amount` - Amount is zero or negative
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.description.trim().is_empty() {
            return Err(EntryValidationError::Description);
        }
        if !(1..=12).contains(&self.month) {
            return Err(EntryValidationError::Month);
        }
        if !(1000..=9999).contains(&self.year) {
            return Err(EntryValidationError::Year);
        }
        if self.amount <= Decimal::ZERO {
            return Err(EntryValidationError::Amount);
        }
        Ok(())
    }
}

/// An entry ready to be stored; the repository assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLedgerEntry {
    pub user_id: UserId,
    pub draft: EntryDraft,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

/// Search criteria. `description` matches case-insensitively as a substring;
/// the other set fields must match exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFilter {
    pub user_id: UserId,
    pub description: Option<String>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub kind: Option<EntryKind>,
}

impl EntryFilter {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            description: None,
            month: None,
            year: None,
            kind: None,
        }
    }

    /// Whether `entry` satisfies every set criterion.
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        entry.user_id == self.user_id
            && self.description.as_ref().map_or(true, |needle| {
                entry
                    .description
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            })
            && self.month.map_or(true, |month| entry.month == month)
            && self.year.map_or(true, |year| entry.year == year)
            && self.kind.map_or(true, |kind| entry.kind == kind)
    }
}
