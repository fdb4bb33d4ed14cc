use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use model::{FileStatus, LoanFile, RepaymentFrequency, Transaction};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};

use crate::error::Result;
use crate::ledger::{Ledger, NewLoanFile};
use crate::store::RecordStore;

pub async fn setup_db() -> std::result::Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// An ACTIVE file record with zeroed aggregates.
pub fn sample_file(id: i32, start_date: NaiveDate, end_date: NaiveDate) -> LoanFile {
    LoanFile {
        id,
        person_name: "Rahul Sharma".to_string(),
        person_mobile: "9876543210".to_string(),
        reference_mobile: "8765432109".to_string(),
        address: "123 Main Street, Mumbai".to_string(),
        business_name: "Sharma Electronics".to_string(),
        business_address: "456 Business Park, Mumbai".to_string(),
        principal_amount: 100_000,
        installment: 2_000,
        start_date,
        end_date,
        status: FileStatus::Active,
        frequency: RepaymentFrequency::Daily,
        total_received: 0,
        bounce_count: 0,
        transaction_count: 0,
    }
}

pub fn payment(id: i32, file_id: i32, date: NaiveDate, amount: i64) -> Transaction {
    Transaction {
        id,
        file_id,
        date,
        amount,
        mode: "CASH".to_string(),
    }
}

/// Valid creation input; tests override single fields with struct update syntax.
pub fn new_file_input(start_date: &str, end_date: &str) -> NewLoanFile {
    NewLoanFile {
        person_name: "Priya Patel".to_string(),
        person_mobile: "8765432109".to_string(),
        reference_mobile: "7654321098".to_string(),
        address: "789 Oak Avenue, Delhi".to_string(),
        business_name: "Patel Textiles".to_string(),
        business_address: "321 Market Street, Delhi".to_string(),
        principal_amount: 150_000,
        installment: 2_000,
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
    }
}

/// Opens a file through the ledger and returns its id.
pub async fn open_file(
    store: &dyn RecordStore,
    ledger: &Ledger,
    start_date: &str,
    end_date: &str,
) -> Result<i32> {
    ledger
        .create_file(store, new_file_input(start_date, end_date))
        .await
}
