//! Behaviour when the record store cannot be reached.

use model::FileSummary;
use sea_orm::Database;

use super::helpers::{date, new_file_input, open_file};
use crate::error::{LedgerError, Result};
use crate::ledger::{Ledger, PaymentInput};
use crate::store::{DatabaseStore, MemoryStore};

#[tokio::test]
async fn offline_memory_store_changes_nothing() -> Result<()> {
    let store = MemoryStore::new();
    let ledger = Ledger::new(date(2024, 1, 5));
    let file_id = open_file(&store, &ledger, "2024-01-01", "2024-03-31").await?;
    ledger
        .add_transaction(&store, file_id, PaymentInput::new("2024-01-01", 2000, "CASH"))
        .await?;
    let before = FileSummary::of(&ledger.get_file(&store, file_id).await?);

    store.set_unavailable(true);
    let result = ledger
        .add_transaction(&store, file_id, PaymentInput::new("2024-01-02", 2000, "CASH"))
        .await;
    assert!(matches!(result, Err(LedgerError::StoreUnavailable(_))));
    assert!(matches!(
        ledger.create_file(&store, new_file_input("2024-01-01", "2024-02-01")).await,
        Err(LedgerError::StoreUnavailable(_))
    ));
    assert!(matches!(
        ledger.portfolio(&store).await,
        Err(LedgerError::StoreUnavailable(_))
    ));

    store.set_unavailable(false);
    assert_eq!(FileSummary::of(&ledger.get_file(&store, file_id).await?), before);
    assert_eq!(ledger.file_transactions(&store, file_id).await?.len(), 1);
    assert_eq!(ledger.list_files(&store, None).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn missing_schema_is_unavailable() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let store = DatabaseStore::new(&db);
    let ledger = Ledger::new(date(2024, 1, 5));

    let error = ledger.list_files(&store, None).await.unwrap_err();
    assert_eq!(error.code(), "STORE_UNAVAILABLE");
    assert!(matches!(
        ledger.create_file(&store, new_file_input("2024-01-01", "2024-02-01")).await,
        Err(LedgerError::StoreUnavailable(_))
    ));
}
