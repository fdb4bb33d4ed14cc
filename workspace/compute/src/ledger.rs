//! Mutation operations over loan files and their repayments.
//!
//! A [`Ledger`] is bound to one evaluation date. Every operation validates all of
//! its preconditions before it writes anything, then writes the record change and
//! the file's refreshed aggregates. `total_received` and `transaction_count` are
//! adjusted incrementally; `bounce_count` is always recounted over the whole window.

use chrono::NaiveDate;
use model::{FileStatus, FileSummary, LoanFile, PaymentMode, RepaymentFrequency, Transaction};
use tracing::{debug, info, instrument, trace, warn};
use validator::Validate;

use crate::bounce;
use crate::error::{LedgerError, Result};
use crate::store::{NewTransaction, RecordStore, TransactionFields};

pub mod report;

pub use report::{FileSchedule, Portfolio, Reconciliation};

/// Borrower and schedule details for a new file, as entered by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct NewLoanFile {
    #[validate(length(min = 1, message = "is required"))]
    pub person_name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub person_mobile: String,
    #[validate(length(min = 1, message = "is required"))]
    pub reference_mobile: String,
    #[validate(length(min = 1, message = "is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "is required"))]
    pub business_name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub business_address: String,
    #[validate(range(min = 1, max = 500000, message = "must be between 1 and 500000"))]
    pub principal_amount: i64,
    #[validate(range(min = 1, message = "must be positive"))]
    pub installment: i64,
    /// `YYYY-MM-DD`
    #[validate(length(min = 1, message = "is required"))]
    pub start_date: String,
    /// `YYYY-MM-DD`
    #[validate(length(min = 1, message = "is required"))]
    pub end_date: String,
}

impl NewLoanFile {
    fn trimmed(self) -> Self {
        Self {
            person_name: self.person_name.trim().to_string(),
            person_mobile: self.person_mobile.trim().to_string(),
            reference_mobile: self.reference_mobile.trim().to_string(),
            address: self.address.trim().to_string(),
            business_name: self.business_name.trim().to_string(),
            business_address: self.business_address.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
            ..self
        }
    }
}

/// A repayment as entered by a user, used both to record and to edit one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInput {
    /// `YYYY-MM-DD`
    pub date: String,
    pub amount: i64,
    pub mode: String,
}

impl PaymentInput {
    pub fn new(date: impl Into<String>, amount: i64, mode: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            amount,
            mode: mode.into(),
        }
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!("{} '{}' is not a valid date (YYYY-MM-DD)", field, value))
    })
}

/// The reconciliation engine, evaluated as of one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ledger {
    today: NaiveDate,
}

impl Ledger {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// The evaluation date every operation of this ledger uses.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub async fn get_file<S: RecordStore + ?Sized>(&self, store: &S, file_id: i32) -> Result<LoanFile> {
        store
            .get_file(file_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("file {}", file_id)))
    }

    pub async fn get_transaction<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        transaction_id: i32,
    ) -> Result<Transaction> {
        store
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("transaction {}", transaction_id)))
    }

    /// Files in id order, optionally only those with the given status.
    pub async fn list_files<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        status: Option<FileStatus>,
    ) -> Result<Vec<LoanFile>> {
        let mut files = store.list_files().await?;
        if let Some(status) = status {
            files.retain(|f| f.status == status);
        }
        files.sort_by_key(|f| f.id);
        Ok(files)
    }

    /// Transactions of an existing file, in ascending date order.
    pub async fn file_transactions<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        file_id: i32,
    ) -> Result<Vec<Transaction>> {
        self.get_file(store, file_id).await?;
        store.list_transactions(file_id).await
    }

    /// Opens a new ACTIVE file under the next sequential file number.
    #[instrument(skip(self, store, data), fields(today = %self.today))]
    pub async fn create_file<S: RecordStore + ?Sized>(&self, store: &S, data: NewLoanFile) -> Result<i32> {
        trace!("Entering create_file");
        let data = data.trimmed();
        if let Err(errors) = data.validate() {
            let err = LedgerError::from(errors);
            warn!("Rejected new file: {}", err);
            return Err(err);
        }
        let start_date = parse_date("start_date", &data.start_date)?;
        let end_date = parse_date("end_date", &data.end_date)?;
        if end_date <= start_date {
            warn!("Rejected new file: end date {} not after start date {}", end_date, start_date);
            return Err(LedgerError::Validation(
                "end_date must be after start_date".to_string(),
            ));
        }

        let next_id = store
            .list_files()
            .await?
            .iter()
            .map(|f| f.id)
            .max()
            .map_or(1, |max| max + 1);
        debug!("Assigning file number {}", next_id);

        let file = LoanFile {
            id: next_id,
            person_name: data.person_name,
            person_mobile: data.person_mobile,
            reference_mobile: data.reference_mobile,
            address: data.address,
            business_name: data.business_name,
            business_address: data.business_address,
            principal_amount: data.principal_amount,
            installment: data.installment,
            start_date,
            end_date,
            status: FileStatus::Active,
            frequency: RepaymentFrequency::Daily,
            total_received: 0,
            bounce_count: 0,
            transaction_count: 0,
        };
        let id = store.append_file(file).await?;
        info!("Created file {}", id);
        Ok(id)
    }

    /// Records a repayment for `file_id` and returns the new transaction's id.
    #[instrument(skip(self, store, input), fields(today = %self.today, date = %input.date))]
    pub async fn add_transaction<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        file_id: i32,
        input: PaymentInput,
    ) -> Result<i32> {
        trace!("Entering add_transaction for file {}", file_id);
        let file = self.get_file(store, file_id).await?;
        if !file.is_active() {
            warn!("Rejected payment for closed file {}", file_id);
            return Err(LedgerError::AlreadyClosed(file_id));
        }

        let date = self.check_payment_date(&file, &input.date)?;
        let mut transactions = store.list_transactions(file_id).await?;
        if transactions.iter().any(|t| t.date == date) {
            warn!("Rejected payment for file {}: {} already paid", file_id, date);
            return Err(LedgerError::DuplicateDate(date));
        }
        let mode = check_payment_details(input.amount, &input.mode)?;
        let total_received = received_total(file.total_received, 0, input.amount)?;

        let id = store
            .append_transaction(NewTransaction {
                file_id,
                date,
                amount: input.amount,
                mode: mode.clone(),
            })
            .await?;
        transactions.push(Transaction {
            id,
            file_id,
            date,
            amount: input.amount,
            mode: mode.to_string(),
        });

        let summary = FileSummary {
            total_received,
            transaction_count: file.transaction_count + 1,
            bounce_count: bounce::bounce_count(&file, &transactions, self.today),
        };
        self.store_summary(store, file_id, summary).await?;
        info!(
            "Recorded payment {} of {} on {} for file {} ({} bounces)",
            id, input.amount, date, file_id, summary.bounce_count
        );
        Ok(id)
    }

    /// Changes date, amount and mode of a recorded repayment.
    #[instrument(skip(self, store, input), fields(today = %self.today, date = %input.date))]
    pub async fn edit_transaction<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        transaction_id: i32,
        input: PaymentInput,
    ) -> Result<Transaction> {
        trace!("Entering edit_transaction for transaction {}", transaction_id);
        let existing = self.get_transaction(store, transaction_id).await?;
        let file = self.get_file(store, existing.file_id).await?;

        let date = self.check_payment_date(&file, &input.date)?;
        // Payments on a closed file may not move past its end date
        if !file.is_active() && date != existing.date && date > file.end_date {
            warn!(
                "Rejected edit of transaction {}: {} is after the end of closed file {}",
                transaction_id, date, file.id
            );
            return Err(LedgerError::Validation(format!(
                "date {} is after the end date {} of closed file {}",
                date, file.end_date, file.id
            )));
        }
        let mut transactions = store.list_transactions(file.id).await?;
        if date != existing.date
            && transactions
                .iter()
                .any(|t| t.id != transaction_id && t.date == date)
        {
            warn!(
                "Rejected edit of transaction {}: {} already paid for file {}",
                transaction_id, date, file.id
            );
            return Err(LedgerError::DuplicateDate(date));
        }
        let mode = check_payment_details(input.amount, &input.mode)?;
        let total_received = received_total(file.total_received, existing.amount, input.amount)?;

        let updated = store
            .update_transaction(
                transaction_id,
                TransactionFields {
                    date,
                    amount: input.amount,
                    mode: mode.clone(),
                },
            )
            .await?;
        if !updated {
            return Err(LedgerError::NotFound(format!("transaction {}", transaction_id)));
        }

        let edited = Transaction {
            id: transaction_id,
            file_id: file.id,
            date,
            amount: input.amount,
            mode: mode.to_string(),
        };
        match transactions.iter_mut().find(|t| t.id == transaction_id) {
            Some(slot) => *slot = edited.clone(),
            None => transactions.push(edited.clone()),
        }

        let summary = FileSummary {
            total_received,
            transaction_count: file.transaction_count,
            bounce_count: bounce::bounce_count(&file, &transactions, self.today),
        };
        self.store_summary(store, file.id, summary).await?;
        info!(
            "Edited transaction {} of file {}: {} {} -> {} {}",
            transaction_id, file.id, existing.date, existing.amount, date, input.amount
        );
        Ok(edited)
    }

    /// Removes a recorded repayment and returns it.
    #[instrument(skip(self, store), fields(today = %self.today))]
    pub async fn delete_transaction<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        transaction_id: i32,
    ) -> Result<Transaction> {
        trace!("Entering delete_transaction for transaction {}", transaction_id);
        let existing = self.get_transaction(store, transaction_id).await?;
        let file = self.get_file(store, existing.file_id).await?;

        if !store.delete_transaction(transaction_id).await? {
            warn!("Transaction {} vanished before delete", transaction_id);
            return Err(LedgerError::NotFound(format!("transaction {}", transaction_id)));
        }

        let transactions = store.list_transactions(file.id).await?;
        let summary = FileSummary {
            total_received: file.total_received - existing.amount,
            transaction_count: file.transaction_count - 1,
            bounce_count: bounce::bounce_count(&file, &transactions, self.today),
        };
        self.store_summary(store, file.id, summary).await?;
        info!("Deleted transaction {} of file {}", transaction_id, file.id);
        Ok(existing)
    }

    /// Closes an ACTIVE file, freezing its window at the file end date.
    #[instrument(skip(self, store), fields(today = %self.today))]
    pub async fn close_file<S: RecordStore + ?Sized>(&self, store: &S, file_id: i32) -> Result<LoanFile> {
        trace!("Entering close_file for file {}", file_id);
        let mut file = self.get_file(store, file_id).await?;
        if file.status == FileStatus::Closed {
            warn!("File {} is already closed", file_id);
            return Err(LedgerError::AlreadyClosed(file_id));
        }

        let transactions = store.list_transactions(file_id).await?;
        file.status = FileStatus::Closed;
        file.bounce_count = bounce::bounce_count(&file, &transactions, self.today);

        if !store.update_file_status(file_id, FileStatus::Closed).await? {
            return Err(LedgerError::NotFound(format!("file {}", file_id)));
        }
        self.store_summary(store, file_id, FileSummary::of(&file)).await?;
        info!(
            "Closed file {} with {} bounces up to {}",
            file_id, file.bounce_count, file.end_date
        );
        Ok(file)
    }

    /// Moves a file to `status`. Closing goes through [`Ledger::close_file`];
    /// asking for ACTIVE is a no-op on an active file and rejected on a closed one.
    pub async fn set_file_status<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        file_id: i32,
        status: FileStatus,
    ) -> Result<LoanFile> {
        match status {
            FileStatus::Closed => self.close_file(store, file_id).await,
            FileStatus::Active => {
                let file = self.get_file(store, file_id).await?;
                if file.status == FileStatus::Closed {
                    warn!("Refused to reopen file {}", file_id);
                    return Err(LedgerError::Validation(format!(
                        "file {} is closed and cannot be reopened",
                        file_id
                    )));
                }
                Ok(file)
            }
        }
    }

    /// Date checks shared by add and edit: parse, not after today, not before start.
    fn check_payment_date(&self, file: &LoanFile, raw: &str) -> Result<NaiveDate> {
        let date = parse_date("date", raw)?;
        if date > self.today {
            warn!("Rejected payment date {} after today {}", date, self.today);
            return Err(LedgerError::FutureDate {
                date,
                today: self.today,
            });
        }
        if date < file.start_date {
            warn!("Rejected payment date {} before file start {}", date, file.start_date);
            return Err(LedgerError::BeforeFileStart {
                date,
                start: file.start_date,
            });
        }
        Ok(date)
    }

    async fn store_summary<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        file_id: i32,
        summary: FileSummary,
    ) -> Result<()> {
        if store.update_file_summary(file_id, summary).await? {
            debug!("Stored summary for file {}: {:?}", file_id, summary);
            Ok(())
        } else {
            Err(LedgerError::NotFound(format!("file {}", file_id)))
        }
    }
}

/// The file's received total after replacing an amount of `removed` with `added`.
fn received_total(total: i64, removed: i64, added: i64) -> Result<i64> {
    total
        .checked_sub(removed)
        .and_then(|rest| rest.checked_add(added))
        .ok_or_else(|| {
            warn!("Rejected amount {}: received total would overflow", added);
            LedgerError::Validation("amount too large".to_string())
        })
}

fn check_payment_details(amount: i64, mode: &str) -> Result<PaymentMode> {
    if amount <= 0 {
        return Err(LedgerError::Validation("amount must be positive".to_string()));
    }
    let mode = PaymentMode::from_tag(mode);
    if mode.is_empty() {
        return Err(LedgerError::Validation("mode is required".to_string()));
    }
    Ok(mode)
}
