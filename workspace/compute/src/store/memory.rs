use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use model::{FileStatus, FileSummary, LoanFile, Transaction};
use tracing::{debug, trace};

use super::{NewTransaction, RecordStore, TransactionFields};
use crate::error::{LedgerError, Result};

#[derive(Debug, Default)]
struct Tables {
    files: BTreeMap<i32, LoanFile>,
    transactions: BTreeMap<i32, Transaction>,
    last_transaction_id: i32,
}

/// Record store kept entirely in memory.
///
/// It can be marked unavailable, after which every call fails with
/// `StoreUnavailable` until it is marked available again.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LedgerError::StoreUnavailable("memory store is offline".to_string()));
        }
        self.tables
            .lock()
            .map_err(|e| LedgerError::StoreUnavailable(format!("memory store lock poisoned: {}", e)))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_files(&self) -> Result<Vec<LoanFile>> {
        Ok(self.tables()?.files.values().cloned().collect())
    }

    async fn get_file(&self, file_id: i32) -> Result<Option<LoanFile>> {
        Ok(self.tables()?.files.get(&file_id).cloned())
    }

    async fn list_transactions(&self, file_id: i32) -> Result<Vec<Transaction>> {
        let tables = self.tables()?;
        let mut transactions: Vec<Transaction> = tables
            .transactions
            .values()
            .filter(|t| t.file_id == file_id)
            .cloned()
            .collect();
        transactions.sort_by_key(|t| (t.date, t.id));
        Ok(transactions)
    }

    async fn get_transaction(&self, transaction_id: i32) -> Result<Option<Transaction>> {
        Ok(self.tables()?.transactions.get(&transaction_id).cloned())
    }

    async fn append_file(&self, file: LoanFile) -> Result<i32> {
        let mut tables = self.tables()?;
        if tables.files.contains_key(&file.id) {
            return Err(LedgerError::StoreUnavailable(format!(
                "file {} already exists",
                file.id
            )));
        }
        let id = file.id;
        trace!("Storing file {} in memory", id);
        tables.files.insert(id, file);
        Ok(id)
    }

    async fn append_transaction(&self, transaction: NewTransaction) -> Result<i32> {
        let mut tables = self.tables()?;
        tables.last_transaction_id += 1;
        let id = tables.last_transaction_id;
        debug!("Storing transaction {} for file {}", id, transaction.file_id);
        tables.transactions.insert(
            id,
            Transaction {
                id,
                file_id: transaction.file_id,
                date: transaction.date,
                amount: transaction.amount,
                mode: transaction.mode.to_string(),
            },
        );
        Ok(id)
    }

    async fn update_file_status(&self, file_id: i32, status: FileStatus) -> Result<bool> {
        let mut tables = self.tables()?;
        Ok(match tables.files.get_mut(&file_id) {
            Some(file) => {
                file.status = status;
                true
            }
            None => false,
        })
    }

    async fn update_file_summary(&self, file_id: i32, summary: FileSummary) -> Result<bool> {
        let mut tables = self.tables()?;
        Ok(match tables.files.get_mut(&file_id) {
            Some(file) => {
                file.total_received = summary.total_received;
                file.transaction_count = summary.transaction_count;
                file.bounce_count = summary.bounce_count;
                true
            }
            None => false,
        })
    }

    async fn update_transaction(&self, transaction_id: i32, fields: TransactionFields) -> Result<bool> {
        let mut tables = self.tables()?;
        Ok(match tables.transactions.get_mut(&transaction_id) {
            Some(transaction) => {
                transaction.date = fields.date;
                transaction.amount = fields.amount;
                transaction.mode = fields.mode.to_string();
                true
            }
            None => false,
        })
    }

    async fn delete_transaction(&self, transaction_id: i32) -> Result<bool> {
        Ok(self.tables()?.transactions.remove(&transaction_id).is_some())
    }
}
