//! Adding, editing and deleting repayments.

use model::FileSummary;

use super::helpers::{date, open_file};
use super::on_both_stores;
use crate::error::{LedgerError, Result};
use crate::ledger::{Ledger, PaymentInput};
use crate::store::RecordStore;

async fn summary(store: &dyn RecordStore, ledger: &Ledger, file_id: i32) -> Result<FileSummary> {
    Ok(FileSummary::of(&ledger.get_file(store, file_id).await?))
}

async fn add_checks_run_in_order(store: &dyn RecordStore) -> Result<()> {
    let ledger = Ledger::new(date(2024, 1, 10));
    let file_id = open_file(store, &ledger, "2024-01-05", "2024-03-05").await?;
    let add = |date: &str, amount: i64, mode: &str| {
        ledger.add_transaction(store, file_id, PaymentInput::new(date, amount, mode))
    };

    ledger
        .add_transaction(store, file_id, PaymentInput::new("2024-01-06", 2000, "CASH"))
        .await?;
    let before = summary(store, &ledger, file_id).await?;

    assert!(matches!(add("06/01/2024", 2000, "CASH").await, Err(LedgerError::Validation(_))));
    assert_eq!(
        add("2024-01-11", 2000, "CASH").await,
        Err(LedgerError::FutureDate {
            date: date(2024, 1, 11),
            today: date(2024, 1, 10)
        })
    );
    assert_eq!(
        add("2024-01-04", 2000, "CASH").await,
        Err(LedgerError::BeforeFileStart {
            date: date(2024, 1, 4),
            start: date(2024, 1, 5)
        })
    );
    // Same date is refused whatever the amount or mode
    assert_eq!(
        add("2024-01-06", 3100, "UPI").await,
        Err(LedgerError::DuplicateDate(date(2024, 1, 6)))
    );
    assert!(matches!(add("2024-01-07", 0, "CASH").await, Err(LedgerError::Validation(_))));
    assert!(matches!(add("2024-01-07", 2000, " ").await, Err(LedgerError::Validation(_))));

    // First failing check wins
    assert!(matches!(add("2024-01-11", 0, "").await, Err(LedgerError::FutureDate { .. })));
    assert!(matches!(add("2024-01-06", -1, "").await, Err(LedgerError::DuplicateDate(_))));

    // Nothing was written by any rejected call
    assert_eq!(summary(store, &ledger, file_id).await?, before);
    assert_eq!(ledger.file_transactions(store, file_id).await?.len(), 1);

    // Today itself is a valid payment date
    add("2024-01-10", 2000, "upi").await?;
    let transactions = ledger.file_transactions(store, file_id).await?;
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[1].mode, "UPI");
    assert_eq!(transactions[1].status(), "Received");
    Ok(())
}

on_both_stores!(add_checks_run_in_order);

async fn add_to_missing_file(store: &dyn RecordStore) -> Result<()> {
    let ledger = Ledger::new(date(2024, 1, 10));
    let result = ledger
        .add_transaction(store, 42, PaymentInput::new("2024-01-10", 100, "CASH"))
        .await;
    assert!(matches!(result, Err(LedgerError::NotFound(_))));
    Ok(())
}

on_both_stores!(add_to_missing_file);

async fn oversized_amounts_are_refused(store: &dyn RecordStore) -> Result<()> {
    let ledger = Ledger::new(date(2024, 1, 10));
    let file_id = open_file(store, &ledger, "2024-01-05", "2024-03-05").await?;
    ledger
        .add_transaction(store, file_id, PaymentInput::new("2024-01-06", 2000, "CASH"))
        .await?;
    let second = ledger
        .add_transaction(store, file_id, PaymentInput::new("2024-01-07", 2000, "CASH"))
        .await?;
    let before = summary(store, &ledger, file_id).await?;

    let added = ledger
        .add_transaction(store, file_id, PaymentInput::new("2024-01-08", i64::MAX, "CASH"))
        .await;
    assert_eq!(added, Err(LedgerError::Validation("amount too large".to_string())));

    let edited = ledger
        .edit_transaction(store, second, PaymentInput::new("2024-01-07", i64::MAX, "CASH"))
        .await;
    assert_eq!(edited, Err(LedgerError::Validation("amount too large".to_string())));

    assert_eq!(summary(store, &ledger, file_id).await?, before);
    let transactions = ledger.file_transactions(store, file_id).await?;
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[1].amount, 2000);
    Ok(())
}

on_both_stores!(oversized_amounts_are_refused);

async fn add_then_delete_restores_file(store: &dyn RecordStore) -> Result<()> {
    let ledger = Ledger::new(date(2024, 1, 20));
    let file_id = open_file(store, &ledger, "2024-01-01", "2024-03-31").await?;
    for day in ["2024-01-02", "2024-01-03", "2024-01-09"] {
        ledger
            .add_transaction(store, file_id, PaymentInput::new(day, 2000, "CASH"))
            .await?;
    }
    let before = summary(store, &ledger, file_id).await?;

    let id = ledger
        .add_transaction(store, file_id, PaymentInput::new("2024-01-15", 1750, "UPI"))
        .await?;
    let during = summary(store, &ledger, file_id).await?;
    assert_eq!(during.total_received, before.total_received + 1750);
    assert_eq!(during.transaction_count, before.transaction_count + 1);
    assert_eq!(during.bounce_count, before.bounce_count - 1);

    let removed = ledger.delete_transaction(store, id).await?;
    assert_eq!(removed.amount, 1750);
    assert_eq!(removed.date, date(2024, 1, 15));
    assert_eq!(summary(store, &ledger, file_id).await?, before);

    assert!(matches!(
        ledger.delete_transaction(store, id).await,
        Err(LedgerError::NotFound(_))
    ));
    assert!(matches!(
        ledger.get_transaction(store, id).await,
        Err(LedgerError::NotFound(_))
    ));
    Ok(())
}

on_both_stores!(add_then_delete_restores_file);

async fn edit_amount_only(store: &dyn RecordStore) -> Result<()> {
    let ledger = Ledger::new(date(2024, 1, 8));
    let file_id = open_file(store, &ledger, "2024-01-01", "2024-03-31").await?;
    let id = ledger
        .add_transaction(store, file_id, PaymentInput::new("2024-01-04", 2000, "CASH"))
        .await?;
    let before = summary(store, &ledger, file_id).await?;

    let edited = ledger
        .edit_transaction(store, id, PaymentInput::new("2024-01-04", 2500, "CASH"))
        .await?;
    assert_eq!(edited.amount, 2500);

    let after = summary(store, &ledger, file_id).await?;
    assert_eq!(after.total_received, before.total_received + 500);
    assert_eq!(after.transaction_count, before.transaction_count);
    assert_eq!(after.bounce_count, before.bounce_count);
    Ok(())
}

on_both_stores!(edit_amount_only);

async fn edit_date_rules(store: &dyn RecordStore) -> Result<()> {
    let ledger = Ledger::new(date(2024, 1, 8));
    let file_id = open_file(store, &ledger, "2024-01-01", "2024-03-31").await?;
    let first = ledger
        .add_transaction(store, file_id, PaymentInput::new("2024-01-02", 2000, "CASH"))
        .await?;
    ledger
        .add_transaction(store, file_id, PaymentInput::new("2024-01-03", 2000, "CASH"))
        .await?;
    let before = summary(store, &ledger, file_id).await?;
    let edit = |date: &str, amount: i64| {
        ledger.edit_transaction(store, first, PaymentInput::new(date, amount, "UPI"))
    };

    assert_eq!(
        edit("2024-01-03", 2000).await,
        Err(LedgerError::DuplicateDate(date(2024, 1, 3)))
    );
    assert!(matches!(edit("2024-01-09", 2000).await, Err(LedgerError::FutureDate { .. })));
    assert!(matches!(edit("2023-12-31", 2000).await, Err(LedgerError::BeforeFileStart { .. })));
    assert!(matches!(edit("2024-01-05", 0).await, Err(LedgerError::Validation(_))));
    assert_eq!(summary(store, &ledger, file_id).await?, before);

    // Moving a payment to another unpaid day keeps the bounce count
    let moved = edit("2024-01-05", 2000).await?;
    assert_eq!(moved.date, date(2024, 1, 5));
    assert_eq!(moved.mode, "UPI");
    assert_eq!(summary(store, &ledger, file_id).await?, before);

    // Moving it to today removes today's bounce but reopens 01-05
    edit("2024-01-08", 2000).await?;
    assert_eq!(summary(store, &ledger, file_id).await?.bounce_count, before.bounce_count);

    let missing = ledger
        .edit_transaction(store, 999, PaymentInput::new("2024-01-05", 10, "CASH"))
        .await;
    assert!(matches!(missing, Err(LedgerError::NotFound(_))));
    Ok(())
}

on_both_stores!(edit_date_rules);
