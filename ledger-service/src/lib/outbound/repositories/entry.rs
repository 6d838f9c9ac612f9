use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use sqlx::Row;

use crate::domain::entry::errors::EntryError;
use crate::domain::entry::models::EntryFilter;
use crate::domain::entry::models::EntryId;
use crate::domain::entry::models::EntryKind;
use crate::domain::entry::models::EntryStatus;
use crate::domain::entry::models::LedgerEntry;
use crate::domain::entry::models::NewLedgerEntry;
use crate::domain::entry::ports::EntryRepository;
use crate::domain::user::models::UserId;

const ENTRY_COLUMNS: &str =
    "id, user_id, description, month, year, amount, kind, status, created_at";

pub struct PostgresEntryRepository {
    pool: PgPool,
}

impl PostgresEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> EntryError {
    EntryError::DatabaseError(e.to_string())
}

fn entry_from_row(row: &PgRow) -> Result<LedgerEntry, EntryError> {
    let kind: String = row.try_get("kind").map_err(database_error)?;
    let status: String = row.try_get("status").map_err(database_error)?;

    Ok(LedgerEntry {
        id: EntryId(row.try_get("id").map_err(database_error)?),
        user_id: UserId(row.try_get("user_id").map_err(database_error)?),
        description: row.try_get("description").map_err(database_error)?,
        month: row.try_get("month").map_err(database_error)?,
        year: row.try_get("year").map_err(database_error)?,
        amount: row.try_get("amount").map_err(database_error)?,
        kind: kind.parse()?,
        status: status.parse()?,
        created_at: row.try_get("created_at").map_err(database_error)?,
    })
}

/// Substring pattern for ILIKE with the LIKE wildcards in `needle` escaped.
fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl EntryRepository for PostgresEntryRepository {
    async fn create(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, EntryError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO ledger_entries (user_id, description, month, year, amount, kind, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(entry.user_id.0)
        .bind(&entry.draft.description)
        .bind(entry.draft.month)
        .bind(entry.draft.year)
        .bind(entry.draft.amount)
        .bind(entry.draft.kind.as_str())
        .bind(entry.status.as_str())
        .bind(entry.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        entry_from_row(&row)
    }

    async fn find_by_id(&self, id: EntryId) -> Result<Option<LedgerEntry>, EntryError> {
        sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entries WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .as_ref()
        .map(entry_from_row)
        .transpose()
    }

    async fn update(&self, entry: &LedgerEntry) -> Result<LedgerEntry, EntryError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE ledger_entries
            SET description = $2, month = $3, year = $4, amount = $5, kind = $6, status = $7
            WHERE id = $1
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(entry.id.0)
        .bind(&entry.description)
        .bind(entry.month)
        .bind(entry.year)
        .bind(entry.amount)
        .bind(entry.kind.as_str())
        .bind(entry.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .ok_or(EntryError::NotFound(entry.id.to_string()))?;

        entry_from_row(&row)
    }

    async fn delete(&self, id: EntryId) -> Result<(), EntryError> {
        let result = sqlx::query("DELETE FROM ledger_entries WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(EntryError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn search(&self, filter: &EntryFilter) -> Result<Vec<LedgerEntry>, EntryError> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entries WHERE user_id = "
        ));
        query.push_bind(filter.user_id.0);

        if let Some(description) = &filter.description {
            query
                .push(" AND description ILIKE ")
                .push_bind(contains_pattern(description));
        }
        if let Some(month) = filter.month {
            query.push(" AND month = ").push_bind(month);
        }
        if let Some(year) = filter.year {
            query.push(" AND year = ").push_bind(year);
        }
        if let Some(kind) = filter.kind {
            query.push(" AND kind = ").push_bind(kind.as_str());
        }
        query.push(" ORDER BY year, month, id");

        query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?
            .iter()
            .map(entry_from_row)
            .collect()
    }

    async fn sum_amount(
        &self,
        user_id: UserId,
        kind: EntryKind,
        status: EntryStatus,
    ) -> Result<Decimal, EntryError> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM ledger_entries
            WHERE user_id = $1 AND kind = $2 AND status = $3
            "#,
        )
        .bind(user_id.0)
        .bind(kind.as_str())
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }
}
