use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::entry::errors::EntryError;
use crate::domain::entry::models::EntryDraft;
use crate::domain::entry::models::EntryFilter;
use crate::domain::entry::models::EntryId;
use crate::domain::entry::models::EntryKind;
use crate::domain::entry::models::EntryStatus;
use crate::domain::entry::models::LedgerEntry;
use crate::domain::entry::models::NewLedgerEntry;
use crate::domain::entry::ports::EntryRepository;
use crate::domain::entry::ports::EntryServicePort;
use crate::domain::user::models::UserId;

/// Domain service implementation for ledger entries.
pub struct EntryService<ER>
where
    ER: EntryRepository,
{
    repository: Arc<ER>,
}

impl<ER> EntryService<ER>
where
    ER: EntryRepository,
{
    pub fn new(repository: Arc<ER>) -> Self {
        Self { repository }
    }

    async fn owned_entry(&self, owner: UserId, id: EntryId) -> Result<LedgerEntry, EntryError> {
        let entry = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(EntryError::NotFound(id.to_string()))?;

        if entry.user_id != owner {
            tracing::warn!(entry_id = %id, user_id = %owner, "Entry access denied");
            return Err(EntryError::Forbidden(id.to_string()));
        }

        Ok(entry)
    }
}

#[async_trait]
impl<ER> EntryServicePort for EntryService<ER>
where
    ER: EntryRepository,
{
    async fn create_entry(
        &self,
        owner: UserId,
        draft: EntryDraft,
    ) -> Result<LedgerEntry, EntryError> {
        draft.validate()?;

        let entry = self
            .repository
            .create(NewLedgerEntry {
                user_id: owner,
                draft,
                status: EntryStatus::Pending,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(entry_id = %entry.id, user_id = %owner, "Entry recorded");

        Ok(entry)
    }

    async fn get_entry(&self, owner: UserId, id: EntryId) -> Result<LedgerEntry, EntryError> {
        self.owned_entry(owner, id).await
    }

    async fn update_entry(
        &self,
        owner: UserId,
        id: EntryId,
        draft: EntryDraft,
    ) -> Result<LedgerEntry, EntryError> {
        draft.validate()?;

        let mut entry = self.owned_entry(owner, id).await?;
        entry.apply(draft);

        self.repository.update(&entry).await
    }

    async fn update_status(
        &self,
        owner: UserId,
        id: EntryId,
        status: EntryStatus,
    ) -> Result<LedgerEntry, EntryError> {
        let mut entry = self.owned_entry(owner, id).await?;
        entry.status = status;

        let entry = self.repository.update(&entry).await?;
        tracing::info!(entry_id = %id, status = status.as_str(), "Entry status changed");

        Ok(entry)
    }

    async fn delete_entry(&self, owner: UserId, id: EntryId) -> Result<(), EntryError> {
        self.owned_entry(owner, id).await?;
        self.repository.delete(id).await?;

        tracing::info!(entry_id = %id, user_id = %owner, "Entry deleted");

        Ok(())
    }

    async fn search(&self, filter: EntryFilter) -> Result<Vec<LedgerEntry>, EntryError> {
        self.repository.search(&filter).await
    }

    async fn balance(&self, owner: UserId) -> Result<Decimal, EntryError> {
        let income = self
            .repository
            .sum_amount(owner, EntryKind::Income, EntryStatus::Completed)
            .await?;
        let expense = self
            .repository
            .sum_amount(owner, EntryKind::Expense, EntryStatus::Completed)
            .await?;

        Ok(income - expense)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::entry::errors::EntryValidationError;

    mock! {
        pub TestEntryRepository {}

        #[async_trait]
        impl EntryRepository for TestEntryRepository {
            async fn create(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, EntryError>;
            async fn find_by_id(&self, id: EntryId) -> Result<Option<LedgerEntry>, EntryError>;
            async fn update(&self, entry: &LedgerEntry) -> Result<LedgerEntry, EntryError>;
            async fn delete(&self, id: EntryId) -> Result<(), EntryError>;
            async fn search(&self, filter: &EntryFilter) -> Result<Vec<LedgerEntry>, EntryError>;
            async fn sum_amount(
                &self,
                user_id: UserId,
                kind: EntryKind,
                status: EntryStatus,
            ) -> Result<Decimal, EntryError>;
        }
    }

    fn rent_draft() -> EntryDraft {
        EntryDraft {
            description: "Rent".to_string(),
            month: 5,
            year: 2024,
            amount: dec!(800.00),
            kind: EntryKind::Expense,
        }
    }

    fn stored_rent(owner: UserId) -> LedgerEntry {
        let draft = rent_draft();
        LedgerEntry {
            id: EntryId(7),
            user_id: owner,
            description: draft.description,
            month: draft.month,
            year: draft.year,
            amount: draft.amount,
            kind: draft.kind,
            status: EntryStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_entry_starts_pending() {
        let mut repository = MockTestEntryRepository::new();

        repository
            .expect_create()
            .withf(|entry| entry.user_id == UserId(1) && entry.status == EntryStatus::Pending)
            .times(1)
            .returning(|entry| {
                Ok(LedgerEntry {
                    id: EntryId(7),
                    user_id: entry.user_id,
                    description: entry.draft.description,
                    month: entry.draft.month,
                    year: entry.draft.year,
                    amount: entry.draft.amount,
                    kind: entry.draft.kind,
                    status: entry.status,
                    created_at: entry.created_at,
                })
            });

        let service = EntryService::new(Arc::new(repository));

        let entry = service
            .create_entry(UserId(1), rent_draft())
            .await
            .expect("Failed to create entry");

        assert_eq!(entry.id, EntryId(7));
        assert_eq!(entry.status, EntryStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_entry_rejects_invalid_draft() {
        let mut repository = MockTestEntryRepository::new();
        repository.expect_create().times(0);

        let service = EntryService::new(Arc::new(repository));

        let result = service
            .create_entry(
                UserId(1),
                EntryDraft {
                    month: 13,
                    ..rent_draft()
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(EntryError::Validation(EntryValidationError::Month))
        ));
    }

    #[tokio::test]
    async fn test_get_entry_of_another_user_is_forbidden() {
        let mut repository = MockTestEntryRepository::new();

        repository
            .expect_find_by_id()
            .with(eq(EntryId(7)))
            .times(1)
            .returning(|_| Ok(Some(stored_rent(UserId(2)))));

        let service = EntryService::new(Arc::new(repository));

        let result = service.get_entry(UserId(1), EntryId(7)).await;

        assert!(matches!(result, Err(EntryError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_entry_keeps_status() {
        let mut repository = MockTestEntryRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| {
                Ok(Some(LedgerEntry {
                    status: EntryStatus::Completed,
                    ..stored_rent(UserId(1))
                }))
            });
        repository
            .expect_update()
            .withf(|entry| entry.amount == dec!(950.00) && entry.status == EntryStatus::Completed)
            .times(1)
            .returning(|entry| Ok(entry.clone()));

        let service = EntryService::new(Arc::new(repository));

        let entry = service
            .update_entry(
                UserId(1),
                EntryId(7),
                EntryDraft {
                    amount: dec!(950.00),
                    ..rent_draft()
                },
            )
            .await
            .expect("Failed to update entry");

        assert_eq!(entry.amount, dec!(950.00));
    }

    #[tokio::test]
    async fn test_update_status() {
        let mut repository = MockTestEntryRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(stored_rent(UserId(1)))));
        repository
            .expect_update()
            .withf(|entry| entry.status == EntryStatus::Cancelled)
            .times(1)
            .returning(|entry| Ok(entry.clone()));

        let service = EntryService::new(Arc::new(repository));

        let entry = service
            .update_status(UserId(1), EntryId(7), EntryStatus::Cancelled)
            .await
            .expect("Failed to update status");

        assert_eq!(entry.status, EntryStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_delete_missing_entry() {
        let mut repository = MockTestEntryRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_delete().times(0);

        let service = EntryService::new(Arc::new(repository));

        let result = service.delete_entry(UserId(1), EntryId(99)).await;

        assert!(matches!(result, Err(EntryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_balance_counts_completed_entries() {
        let mut repository = MockTestEntryRepository::new();

        repository
            .expect_sum_amount()
            .with(eq(UserId(1)), eq(EntryKind::Income), eq(EntryStatus::Completed))
            .times(1)
            .returning(|_, _, _| Ok(dec!(3000.00)));
        repository
            .expect_sum_amount()
            .with(eq(UserId(1)), eq(EntryKind::Expense), eq(EntryStatus::Completed))
            .times(1)
            .returning(|_, _, _| Ok(dec!(1250.50)));

        let service = EntryService::new(Arc::new(repository));

        let balance = service.balance(UserId(1)).await.expect("Failed to compute balance");

        assert_eq!(balance, dec!(1749.50));
    }
}
