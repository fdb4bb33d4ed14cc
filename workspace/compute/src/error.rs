use chrono::NaiveDate;
use thiserror::Error;
use tracing::error;

/// Error types for the ledger engine.
///
/// Every variant is raised before any record is written, except
/// `StoreUnavailable`, which is passed through untouched for the caller to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Missing or malformed input field, out-of-range amount, unparseable date
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payment date {date} is after today ({today})")]
    FutureDate { date: NaiveDate, today: NaiveDate },

    #[error("Payment date {date} is before the file start date {start}")]
    BeforeFileStart { date: NaiveDate, start: NaiveDate },

    #[error("A payment is already recorded for {0}")]
    DuplicateDate(NaiveDate),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File {0} is closed")]
    AlreadyClosed(i32),

    /// Caller's authorization tier is insufficient
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The record store could not be reached or rejected the write
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),
}

impl LedgerError {
    /// Stable machine-readable code for transport layers.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "VALIDATION_ERROR",
            LedgerError::FutureDate { .. } => "FUTURE_DATE",
            LedgerError::BeforeFileStart { .. } => "BEFORE_FILE_START",
            LedgerError::DuplicateDate(_) => "DUPLICATE_DATE",
            LedgerError::NotFound(_) => "NOT_FOUND",
            LedgerError::AlreadyClosed(_) => "ALREADY_CLOSED",
            LedgerError::AccessDenied(_) => "ACCESS_DENIED",
            LedgerError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}

impl From<sea_orm::DbErr> for LedgerError {
    fn from(err: sea_orm::DbErr) -> Self {
        let ledger_error = LedgerError::StoreUnavailable(err.to_string());
        error!(?ledger_error, "Database error");
        ledger_error
    }
}

impl From<validator::ValidationErrors> for LedgerError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first offending field, sorted so the message is deterministic
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .first()
            .map(|(field, errs)| {
                let detail = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{} {}", field, detail)
            })
            .unwrap_or_else(|| errors.to_string());
        LedgerError::Validation(message)
    }
}

/// Type alias for Result with LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;
