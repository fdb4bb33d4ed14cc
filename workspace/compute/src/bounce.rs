//! Classification of the days in a loan file's window into paid, bounced and
//! pending days.
//!
//! The window runs from the file start date to its effective end: the end date for
//! a closed file, the evaluation date ("today") otherwise. Both ends are inclusive
//! and the walk steps one calendar day at a time. An unpaid day on or before today
//! is a bounce, including today itself; an unpaid day after today is pending.

use std::collections::HashMap;

use chrono::NaiveDate;
use model::{DayEntry, DayStatus, FileStatus, FileSummary, LoanFile, Transaction};
use tracing::{instrument, trace};

/// Last day of the window for `file` as seen on `today`.
pub fn effective_end(file: &LoanFile, today: NaiveDate) -> NaiveDate {
    match file.status {
        FileStatus::Closed => file.end_date,
        FileStatus::Active => today,
    }
}

/// The inclusive `(first, last)` days to classify, or `None` when the file starts
/// after its effective end.
pub fn window(file: &LoanFile, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let end = effective_end(file, today);
    (file.start_date <= end).then_some((file.start_date, end))
}

/// Status of a single day given the transaction recorded on it, if any.
pub fn classify_day(date: NaiveDate, paid_by: Option<i32>, today: NaiveDate) -> DayStatus {
    match paid_by {
        Some(_) => DayStatus::Paid,
        None if date <= today => DayStatus::Bounce,
        None => DayStatus::Pending,
    }
}

fn paid_days(file: &LoanFile, transactions: &[Transaction]) -> HashMap<NaiveDate, i32> {
    transactions
        .iter()
        .filter(|t| t.file_id == file.id)
        .map(|t| (t.date, t.id))
        .collect()
}

/// Every day of the window with its status, in ascending date order.
#[instrument(skip(file, transactions), fields(file_id = file.id, today = %today))]
pub fn classify_days(file: &LoanFile, transactions: &[Transaction], today: NaiveDate) -> Vec<DayEntry> {
    let Some((first, last)) = window(file, today) else {
        trace!("Empty window for file {}", file.id);
        return Vec::new();
    };
    let paid = paid_days(file, transactions);

    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|date| {
            let transaction_id = paid.get(&date).copied();
            DayEntry {
                date,
                status: classify_day(date, transaction_id, today),
                transaction_id,
            }
        })
        .collect()
}

/// Number of bounced days in the window.
pub fn bounce_count(file: &LoanFile, transactions: &[Transaction], today: NaiveDate) -> i64 {
    let Some((first, last)) = window(file, today) else {
        return 0;
    };
    let paid = paid_days(file, transactions);

    let count = first
        .iter_days()
        .take_while(|day| *day <= last)
        .filter(|day| classify_day(*day, paid.get(day).copied(), today) == DayStatus::Bounce)
        .count();
    trace!("File {} has {} bounced days up to {}", file.id, count, last);
    count as i64
}

/// All derived aggregates of a file computed from scratch.
pub fn summarize(file: &LoanFile, transactions: &[Transaction], today: NaiveDate) -> FileSummary {
    let own = || transactions.iter().filter(|t| t.file_id == file.id);
    FileSummary {
        total_received: own().map(|t| t.amount).sum(),
        transaction_count: own().count() as i64,
        bounce_count: bounce_count(file, transactions, today),
    }
}
