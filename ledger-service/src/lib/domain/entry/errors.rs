use thiserror::Error;

/// Rule broken by a ledger entry draft
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntryValidationError {
    #[error("Provide a valid description.")]
    Description,

    #[error("Provide a valid month.")]
    Month,

    #[error("Provide a valid year.")]
    Year,

    #[error("Provide a valid amount.")]
    Amount,
}

/// Top-level error for ledger entry operations
#[derive(Debug, Clone, Error)]
pub enum EntryError {
    #[error("{0}")]
    Validation(#[from] EntryValidationError),

    #[error("Unknown entry kind: {0}")]
    InvalidKind(String),

    #[error("Unknown entry status: {0}")]
    InvalidStatus(String),

    #[error("Ledger entry not found: {0}")]
    NotFound(String),

    #[error("Ledger entry {0} belongs to another user")]
    Forbidden(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
