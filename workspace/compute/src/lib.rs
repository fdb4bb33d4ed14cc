pub mod bounce;
pub mod error;
pub mod ledger;
pub mod store;


use chrono::{Local, NaiveDate};

pub use error::{LedgerError, Result};
pub use ledger::{FileSchedule, Ledger, NewLoanFile, PaymentInput, Portfolio, Reconciliation};
pub use store::{DatabaseStore, MemoryStore, RecordStore};

/// Returns the ledger used by the server and the CLI.
///
/// `today` pins the evaluation date; without it the local calendar date is used.
pub fn default_ledger(today: Option<NaiveDate>) -> Ledger {
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    Ledger::new(today)
}
