//! Read-side views over the ledger: the per-file day schedule, the portfolio
//! dashboard figures, and reconciliation of cached aggregates.

use model::{DayEntry, DayStatus, FileStatus, FileSummary, LoanFile, Transaction};
use tracing::{debug, info, instrument, warn};

use super::Ledger;
use crate::bounce;
use crate::error::Result;
use crate::store::RecordStore;

/// Everything the file details view lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSchedule {
    pub file: LoanFile,
    /// Recorded repayments, newest first.
    pub transactions: Vec<Transaction>,
    /// Bounced and pending days of the window, oldest first.
    pub unpaid_days: Vec<DayEntry>,
}

/// Dashboard figures across all files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Portfolio {
    pub active_files: i64,
    pub closed_files: i64,
    /// Sum of principal minus received over ACTIVE files only.
    pub total_pending: i64,
}

/// Outcome of recounting a file's aggregates from its transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub file_id: i32,
    pub previous: FileSummary,
    pub current: FileSummary,
}

impl Reconciliation {
    /// Whether the cached aggregates had drifted and were rewritten.
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

impl Ledger {
    #[instrument(skip(self, store), fields(today = %self.today))]
    pub async fn file_schedule<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        file_id: i32,
    ) -> Result<FileSchedule> {
        let file = self.get_file(store, file_id).await?;
        let mut transactions = store.list_transactions(file_id).await?;

        let unpaid_days: Vec<DayEntry> = bounce::classify_days(&file, &transactions, self.today)
            .into_iter()
            .filter(|day| day.status != DayStatus::Paid)
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        debug!(
            "File {} schedule: {} payments, {} unpaid days",
            file_id,
            transactions.len(),
            unpaid_days.len()
        );
        Ok(FileSchedule {
            file,
            transactions,
            unpaid_days,
        })
    }

    #[instrument(skip(self, store))]
    pub async fn portfolio<S: RecordStore + ?Sized>(&self, store: &S) -> Result<Portfolio> {
        let files = store.list_files().await?;
        let portfolio = files.iter().fold(Portfolio::default(), |mut acc, file| {
            match file.status {
                FileStatus::Active => {
                    acc.active_files += 1;
                    acc.total_pending += file.pending_amount();
                }
                FileStatus::Closed => acc.closed_files += 1,
            }
            acc
        });
        debug!("Portfolio: {:?}", portfolio);
        Ok(portfolio)
    }

    /// Recounts a file's aggregates from scratch and rewrites them if they drifted.
    #[instrument(skip(self, store), fields(today = %self.today))]
    pub async fn reconcile_file<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        file_id: i32,
    ) -> Result<Reconciliation> {
        let file = self.get_file(store, file_id).await?;
        let transactions = store.list_transactions(file_id).await?;
        let reconciliation = Reconciliation {
            file_id,
            previous: FileSummary::of(&file),
            current: bounce::summarize(&file, &transactions, self.today),
        };

        if reconciliation.changed() {
            warn!(
                "File {} aggregates drifted: {:?} -> {:?}",
                file_id, reconciliation.previous, reconciliation.current
            );
            self.store_summary(store, file_id, reconciliation.current).await?;
        }
        Ok(reconciliation)
    }

    /// Reconciles every ACTIVE file. Closed files keep their frozen aggregates.
    #[instrument(skip(self, store), fields(today = %self.today))]
    pub async fn reconcile_all<S: RecordStore + ?Sized>(&self, store: &S) -> Result<Vec<Reconciliation>> {
        let files = self.list_files(store, Some(FileStatus::Active)).await?;
        let mut results = Vec::with_capacity(files.len());
        for file in files {
            results.push(self.reconcile_file(store, file.id).await?);
        }
        let changed = results.iter().filter(|r| r.changed()).count();
        info!("Reconciled {} active files, {} changed", results.len(), changed);
        Ok(results)
    }
}
