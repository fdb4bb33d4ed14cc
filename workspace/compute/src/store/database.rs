use async_trait::async_trait;
use model::entities::{loan_file, loan_transaction};
use model::{FileStatus, FileSummary, LoanFile, Transaction};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, instrument, trace};

use super::{NewTransaction, RecordStore, TransactionFields};
use crate::error::Result;

/// Record store backed by the `files` and `transactions` tables.
///
/// Works over a plain connection or over an open database transaction; the latter
/// makes a whole ledger operation commit or roll back as one unit.
#[derive(Debug)]
pub struct DatabaseStore<'c, C: ConnectionTrait> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> DatabaseStore<'c, C> {
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<'c, C: ConnectionTrait> RecordStore for DatabaseStore<'c, C> {
    #[instrument(skip(self))]
    async fn list_files(&self) -> Result<Vec<LoanFile>> {
        let files = loan_file::Entity::find()
            .order_by_asc(loan_file::Column::Id)
            .all(self.db)
            .await?;
        trace!("Loaded {} files", files.len());
        Ok(files)
    }

    async fn get_file(&self, file_id: i32) -> Result<Option<LoanFile>> {
        Ok(loan_file::Entity::find_by_id(file_id).one(self.db).await?)
    }

    #[instrument(skip(self))]
    async fn list_transactions(&self, file_id: i32) -> Result<Vec<Transaction>> {
        let transactions = loan_transaction::Entity::find()
            .filter(loan_transaction::Column::FileId.eq(file_id))
            .order_by_asc(loan_transaction::Column::Date)
            .order_by_asc(loan_transaction::Column::Id)
            .all(self.db)
            .await?;
        trace!("Loaded {} transactions for file {}", transactions.len(), file_id);
        Ok(transactions)
    }

    async fn get_transaction(&self, transaction_id: i32) -> Result<Option<Transaction>> {
        Ok(loan_transaction::Entity::find_by_id(transaction_id)
            .one(self.db)
            .await?)
    }

    async fn append_file(&self, file: LoanFile) -> Result<i32> {
        let inserted = loan_file::ActiveModel {
            id: Set(file.id),
            person_name: Set(file.person_name),
            person_mobile: Set(file.person_mobile),
            reference_mobile: Set(file.reference_mobile),
            address: Set(file.address),
            business_name: Set(file.business_name),
            business_address: Set(file.business_address),
            principal_amount: Set(file.principal_amount),
            installment: Set(file.installment),
            start_date: Set(file.start_date),
            end_date: Set(file.end_date),
            status: Set(file.status),
            frequency: Set(file.frequency),
            total_received: Set(file.total_received),
            bounce_count: Set(file.bounce_count),
            transaction_count: Set(file.transaction_count),
        }
        .insert(self.db)
        .await?;
        debug!("Inserted file {}", inserted.id);
        Ok(inserted.id)
    }

    async fn append_transaction(&self, transaction: NewTransaction) -> Result<i32> {
        let inserted = loan_transaction::ActiveModel {
            file_id: Set(transaction.file_id),
            date: Set(transaction.date),
            amount: Set(transaction.amount),
            mode: Set(transaction.mode.to_string()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;
        debug!("Inserted transaction {} for file {}", inserted.id, inserted.file_id);
        Ok(inserted.id)
    }

    async fn update_file_status(&self, file_id: i32, status: FileStatus) -> Result<bool> {
        let Some(file) = loan_file::Entity::find_by_id(file_id).one(self.db).await? else {
            return Ok(false);
        };
        let mut active: loan_file::ActiveModel = file.into();
        active.status = Set(status);
        active.update(self.db).await?;
        Ok(true)
    }

    async fn update_file_summary(&self, file_id: i32, summary: FileSummary) -> Result<bool> {
        let Some(file) = loan_file::Entity::find_by_id(file_id).one(self.db).await? else {
            return Ok(false);
        };
        let mut active: loan_file::ActiveModel = file.into();
        active.total_received = Set(summary.total_received);
        active.transaction_count = Set(summary.transaction_count);
        active.bounce_count = Set(summary.bounce_count);
        active.update(self.db).await?;
        Ok(true)
    }

    async fn update_transaction(&self, transaction_id: i32, fields: TransactionFields) -> Result<bool> {
        let Some(transaction) = loan_transaction::Entity::find_by_id(transaction_id)
            .one(self.db)
            .await?
        else {
            return Ok(false);
        };
        let mut active: loan_transaction::ActiveModel = transaction.into();
        active.date = Set(fields.date);
        active.amount = Set(fields.amount);
        active.mode = Set(fields.mode.to_string());
        active.update(self.db).await?;
        Ok(true)
    }

    async fn delete_transaction(&self, transaction_id: i32) -> Result<bool> {
        let result = loan_transaction::Entity::delete_by_id(transaction_id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
