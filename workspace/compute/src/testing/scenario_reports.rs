//! File schedule, portfolio figures and file listing.

use model::{DayStatus, FileStatus};

use super::helpers::{date, open_file};
use super::on_both_stores;
use crate::error::{LedgerError, Result};
use crate::ledger::{Ledger, PaymentInput};
use crate::store::RecordStore;

async fn schedule_lists_payments_and_gaps(store: &dyn RecordStore) -> Result<()> {
    let ledger = Ledger::new(date(2024, 1, 6));
    let file_id = open_file(store, &ledger, "2024-01-01", "2024-02-29").await?;
    let first = ledger
        .add_transaction(store, file_id, PaymentInput::new("2024-01-01", 2000, "CASH"))
        .await?;
    let latest = ledger
        .add_transaction(store, file_id, PaymentInput::new("2024-01-05", 2000, "UPI"))
        .await?;
    ledger
        .add_transaction(store, file_id, PaymentInput::new("2024-01-03", 1500, "CASH"))
        .await?;

    let schedule = ledger.file_schedule(store, file_id).await?;
    assert_eq!(schedule.file.id, file_id);
    assert_eq!(schedule.file.total_received, 5500);

    let dates: Vec<_> = schedule.transactions.iter().map(|t| t.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 5), date(2024, 1, 3), date(2024, 1, 1)]);
    assert_eq!(schedule.transactions[0].id, latest);
    assert_eq!(schedule.transactions[2].id, first);

    let gaps: Vec<_> = schedule
        .unpaid_days
        .iter()
        .map(|d| (d.date, d.status, d.transaction_id))
        .collect();
    assert_eq!(
        gaps,
        vec![
            (date(2024, 1, 2), DayStatus::Bounce, None),
            (date(2024, 1, 4), DayStatus::Bounce, None),
            (date(2024, 1, 6), DayStatus::Bounce, None),
        ]
    );
    assert_eq!(schedule.file.bounce_count, 3);
    Ok(())
}

on_both_stores!(schedule_lists_payments_and_gaps);

async fn portfolio_counts_active_pending(store: &dyn RecordStore) -> Result<()> {
    let ledger = Ledger::new(date(2024, 1, 10));
    assert_eq!(ledger.portfolio(store).await?.active_files, 0);

    let a = open_file(store, &ledger, "2024-01-01", "2024-03-31").await?;
    let b = open_file(store, &ledger, "2024-01-02", "2024-03-31").await?;
    let c = open_file(store, &ledger, "2024-01-03", "2024-03-31").await?;
    for (file_id, day) in [(a, "2024-01-01"), (a, "2024-01-02"), (b, "2024-01-05"), (c, "2024-01-05")] {
        ledger
            .add_transaction(store, file_id, PaymentInput::new(day, 2000, "CASH"))
            .await?;
    }
    ledger.close_file(store, c).await?;

    let portfolio = ledger.portfolio(store).await?;
    assert_eq!(portfolio.active_files, 2);
    assert_eq!(portfolio.closed_files, 1);
    // Closed files do not contribute to the outstanding amount
    assert_eq!(portfolio.total_pending, 2 * 150_000 - 6000);
    Ok(())
}

on_both_stores!(portfolio_counts_active_pending);

async fn listing_and_lookup(store: &dyn RecordStore) -> Result<()> {
    let ledger = Ledger::new(date(2024, 1, 10));
    let a = open_file(store, &ledger, "2024-01-01", "2024-03-31").await?;
    let b = open_file(store, &ledger, "2024-01-01", "2024-03-31").await?;
    let c = open_file(store, &ledger, "2024-01-01", "2024-03-31").await?;
    ledger.close_file(store, b).await?;

    let ids = |files: Vec<model::LoanFile>| files.into_iter().map(|f| f.id).collect::<Vec<_>>();
    assert_eq!(ids(ledger.list_files(store, None).await?), vec![a, b, c]);
    assert_eq!(ids(ledger.list_files(store, Some(FileStatus::Active)).await?), vec![a, c]);
    assert_eq!(ids(ledger.list_files(store, Some(FileStatus::Closed)).await?), vec![b]);

    assert_eq!(
        ledger.get_file(store, 404).await,
        Err(LedgerError::NotFound("file 404".to_string()))
    );
    assert!(matches!(
        ledger.file_schedule(store, 404).await,
        Err(LedgerError::NotFound(_))
    ));
    assert!(matches!(
        ledger.file_transactions(store, 404).await,
        Err(LedgerError::NotFound(_))
    ));
    Ok(())
}

on_both_stores!(listing_and_lookup);

async fn reconcile_all_skips_closed(store: &dyn RecordStore) -> Result<()> {
    let opening = Ledger::new(date(2024, 1, 5));
    let a = open_file(store, &opening, "2024-01-01", "2024-03-31").await?;
    let b = open_file(store, &opening, "2024-01-01", "2024-01-31").await?;
    opening.close_file(store, b).await?;
    assert_eq!(opening.get_file(store, a).await?.bounce_count, 0);

    let later = Ledger::new(date(2024, 1, 12));
    let results = later.reconcile_all(store).await?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_id, a);
    assert_eq!(results[0].current.bounce_count, 12);
    assert_eq!(later.get_file(store, a).await?.bounce_count, 12);
    assert_eq!(later.get_file(store, b).await?.bounce_count, 5);

    // A second pass on the same day finds nothing to fix
    assert!(later.reconcile_all(store).await?.iter().all(|r| !r.changed()));
    Ok(())
}

on_both_stores!(reconcile_all_skips_closed);
