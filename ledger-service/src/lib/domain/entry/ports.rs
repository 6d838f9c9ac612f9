use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::entry::errors::EntryError;
use crate::domain::entry::models::EntryDraft;
use crate::domain::entry::models::EntryFilter;
use crate::domain::entry::models::EntryId;
use crate::domain::entry::models::EntryKind;
use crate::domain::entry::models::EntryStatus;
use crate::domain::entry::models::LedgerEntry;
use crate::domain::entry::models::NewLedgerEntry;
use crate::domain::user::models::UserId;

/// Port for ledger entry operations. Every call acts on behalf of `owner`.
#[async_trait]
pub trait EntryServicePort: Send + Sync + 'static {
    /// Record a new entry for `owner`. New entries always start as `Pending`.
    ///
    /// # Errors
    /// * `Validation` - Draft breaks a business rule
    /// * `DatabaseError` - Database operation failed
    async fn create_entry(&self, owner: UserId, draft: EntryDraft)
        -> Result<LedgerEntry, EntryError>;

    /// # Errors
    /// * `NotFound` - Entry does not exist
    /// * `Forbidden` - Entry belongs to another user
    async fn get_entry(&self, owner: UserId, id: EntryId) -> Result<LedgerEntry, EntryError>;

    /// Replace the editable fields of an entry.
    ///
    /// # Errors
    /// * `Validation` - Draft breaks a business rule
    /// * `NotFound` - Entry does not exist
    /// * `Forbidden` - Entry belongs to another user
    async fn update_entry(
        &self,
        owner: UserId,
        id: EntryId,
        draft: EntryDraft,
    ) -> Result<LedgerEntry, EntryError>;

    /// # Errors
    /// * `NotFound` - Entry does not exist
    /// * `Forbidden` - Entry belongs to another user
    async fn update_status(
        &self,
        owner: UserId,
        id: EntryId,
        status: EntryStatus,
    ) -> Result<LedgerEntry, EntryError>;

    /// # Errors
    /// * `NotFound` - Entry does not exist
    /// * `Forbidden` - Entry belongs to another user
    async fn delete_entry(&self, owner: UserId, id: EntryId) -> Result<(), EntryError>;

    /// Entries matching the filter; the filter is always scoped to its user.
    async fn search(&self, filter: EntryFilter) -> Result<Vec<LedgerEntry>, EntryError>;

    /// Completed income minus completed expense for `owner`.
    async fn balance(&self, owner: UserId) -> Result<Decimal, EntryError>;
}

/// Persistence operations for ledger entries.
#[async_trait]
pub trait EntryRepository: Send + Sync + 'static {
    async fn create(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, EntryError>;

    async fn find_by_id(&self, id: EntryId) -> Result<Option<LedgerEntry>, EntryError>;

    /// Store the current field values of an existing entry.
    ///
    /// # Errors
    /// * `NotFound` - Entry does not exist
    async fn update(&self, entry: &LedgerEntry) -> Result<LedgerEntry, EntryError>;

    async fn delete(&self, id: EntryId) -> Result<(), EntryError>;

    async fn search(&self, filter: &EntryFilter) -> Result<Vec<LedgerEntry>, EntryError>;

    /// Sum of amounts for one user's entries of the given kind and status, zero when none match.
    async fn sum_amount(
        &self,
        user_id: UserId,
        kind: EntryKind,
        status: EntryStatus,
    ) -> Result<Decimal, EntryError>;
}
