pub mod entities;
pub mod ledger;

pub use entities::loan_file::{FileStatus, Model as LoanFile, RepaymentFrequency};
pub use entities::loan_transaction::Model as Transaction;
pub use ledger::{DayEntry, DayStatus, FileSummary, PaymentMode, RECEIVED};
