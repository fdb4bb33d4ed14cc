//! File creation: numbering, initial state and input validation.

use model::{FileStatus, RepaymentFrequency};

use super::helpers::{date, new_file_input};
use super::on_both_stores;
use crate::error::{LedgerError, Result};
use crate::ledger::{Ledger, NewLoanFile};
use crate::store::RecordStore;

fn is_validation(result: &Result<i32>, field: &str) -> bool {
    matches!(result, Err(LedgerError::Validation(message)) if message.contains(field))
}

async fn files_are_numbered_sequentially(store: &dyn RecordStore) -> Result<()> {
    let ledger = Ledger::new(date(2024, 6, 1));

    // Historic start dates are allowed
    let first = ledger
        .create_file(store, new_file_input("2020-01-01", "2020-12-31"))
        .await?;
    let second = ledger
        .create_file(store, new_file_input("2024-06-01", "2024-09-01"))
        .await?;
    let third = ledger
        .create_file(
            store,
            NewLoanFile {
                person_name: "  Amit Kumar  ".to_string(),
                ..new_file_input("2024-05-01", "2024-08-01")
            },
        )
        .await?;
    assert_eq!((first, second, third), (1, 2, 3));

    let file = ledger.get_file(store, third).await?;
    assert_eq!(file.person_name, "Amit Kumar");
    assert_eq!(file.status, FileStatus::Active);
    assert_eq!(file.frequency, RepaymentFrequency::Daily);
    assert_eq!(file.start_date, date(2024, 5, 1));
    assert_eq!(file.end_date, date(2024, 8, 1));
    assert_eq!(
        (file.total_received, file.transaction_count, file.bounce_count),
        (0, 0, 0)
    );
    Ok(())
}

on_both_stores!(files_are_numbered_sequentially);

async fn invalid_files_are_rejected(store: &dyn RecordStore) -> Result<()> {
    let ledger = Ledger::new(date(2024, 6, 1));
    let valid = || new_file_input("2024-01-01", "2024-04-01");

    let blank_name = NewLoanFile {
        person_name: "   ".to_string(),
        ..valid()
    };
    assert!(is_validation(&ledger.create_file(store, blank_name).await, "person_name"));

    let missing_business = NewLoanFile {
        business_address: String::new(),
        ..valid()
    };
    assert!(is_validation(
        &ledger.create_file(store, missing_business).await,
        "business_address"
    ));

    for principal in [0, -5, 500_001] {
        let input = NewLoanFile {
            principal_amount: principal,
            ..valid()
        };
        assert!(is_validation(&ledger.create_file(store, input).await, "principal_amount"));
    }

    let no_installment = NewLoanFile {
        installment: 0,
        ..valid()
    };
    assert!(is_validation(&ledger.create_file(store, no_installment).await, "installment"));

    for (start, end) in [("2024-03-01", "2024-03-01"), ("2024-03-02", "2024-03-01")] {
        let result = ledger.create_file(store, new_file_input(start, end)).await;
        assert!(is_validation(&result, "end_date"), "{:?}", result);
    }

    let bad_date = ledger
        .create_file(store, new_file_input("2024-13-01", "2024-12-31"))
        .await;
    assert!(is_validation(&bad_date, "start_date"));

    assert!(store.list_files().await?.is_empty());

    // Upper bound is inclusive
    let largest = NewLoanFile {
        principal_amount: 500_000,
        installment: 1,
        ..valid()
    };
    assert_eq!(ledger.create_file(store, largest).await?, 1);
    Ok(())
}

on_both_stores!(invalid_files_are_rejected);
