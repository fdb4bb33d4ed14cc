//! The record store the ledger reads and writes through.
//!
//! The ledger never caches records between operations; every operation reads what
//! it needs through this trait and writes its result back. Two implementations are
//! provided: an in-memory map and a SeaORM-backed database store.

use async_trait::async_trait;
use chrono::NaiveDate;
use model::{FileStatus, FileSummary, LoanFile, PaymentMode, Transaction};

use crate::error::Result;

pub mod database;
pub mod memory;

pub use database::DatabaseStore;
pub use memory::MemoryStore;

/// A transaction that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub file_id: i32,
    pub date: NaiveDate,
    pub amount: i64,
    pub mode: PaymentMode,
}

/// The editable fields of a recorded transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFields {
    pub date: NaiveDate,
    pub amount: i64,
    pub mode: PaymentMode,
}

/// CRUD access to loan files and their transactions.
///
/// Update and delete operations return `Ok(false)` when the addressed record does
/// not exist. Any `Err` means the store itself failed.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_files(&self) -> Result<Vec<LoanFile>>;

    async fn get_file(&self, file_id: i32) -> Result<Option<LoanFile>>;

    /// Transactions of one file, in ascending date order.
    async fn list_transactions(&self, file_id: i32) -> Result<Vec<Transaction>>;

    async fn get_transaction(&self, transaction_id: i32) -> Result<Option<Transaction>>;

    /// Persists a file under the id it already carries.
    async fn append_file(&self, file: LoanFile) -> Result<i32>;

    /// Persists a transaction and returns its newly assigned id.
    async fn append_transaction(&self, transaction: NewTransaction) -> Result<i32>;

    async fn update_file_status(&self, file_id: i32, status: FileStatus) -> Result<bool>;

    /// Overwrites the derived aggregates of a file.
    async fn update_file_summary(&self, file_id: i32, summary: FileSummary) -> Result<bool>;

    async fn update_transaction(&self, transaction_id: i32, fields: TransactionFields) -> Result<bool>;

    async fn delete_transaction(&self, transaction_id: i32) -> Result<bool>;
}
