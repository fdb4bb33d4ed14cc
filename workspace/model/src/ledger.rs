//! Plain ledger types shared by every record store and by the reconciliation engine.

use chrono::NaiveDate;

/// Display status of a day covered by a recorded transaction.
pub const RECEIVED: &str = "Received";

/// How a repayment was made. The set is open: anything other than cash or UPI is
/// kept verbatim (upper-cased) as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentMode {
    Cash,
    Upi,
    Other(String),
}

impl PaymentMode {
    /// Parses a tag as typed by a user. Known modes match case-insensitively.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "CASH" => PaymentMode::Cash,
            "UPI" => PaymentMode::Upi,
            _ => PaymentMode::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Upi => "UPI",
            PaymentMode::Other(tag) => tag,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one calendar day inside a file's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayStatus {
    /// A transaction exists for the day.
    Paid,
    /// No transaction, and the day is on or before the evaluation date.
    Bounce,
    /// No transaction, and the day is still in the future.
    Pending,
}

impl DayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DayStatus::Paid => RECEIVED,
            DayStatus::Bounce => "BOUNCE",
            DayStatus::Pending => "PENDING",
        }
    }
}

/// A classified day, with the transaction that paid it if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub transaction_id: Option<i32>,
}

/// The derived per-file aggregates, written back to the store as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileSummary {
    pub total_received: i64,
    pub transaction_count: i64,
    pub bounce_count: i64,
}

impl FileSummary {
    pub fn of(file: &crate::LoanFile) -> Self {
        Self {
            total_received: file.total_received,
            transaction_count: file.transaction_count,
            bounce_count: file.bounce_count,
        }
    }
}
