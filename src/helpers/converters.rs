//! Mapping between ledger types and the transport types in `common`.

use common::{
    CreateFileRequest, DayDto, FileDto, PaymentRequest, PortfolioDto, ReconciliationDto,
    ScheduleDto, TransactionDto,
};
use compute::{FileSchedule, LedgerError, NewLoanFile, PaymentInput, Portfolio, Reconciliation};
use model::{FileStatus, LoanFile, Transaction};

pub fn file_to_dto(file: LoanFile) -> FileDto {
    FileDto {
        pending_amount: file.pending_amount(),
        status: file.status.as_str().to_string(),
        frequency: file.frequency.as_str().to_string(),
        id: file.id,
        person_name: file.person_name,
        person_mobile: file.person_mobile,
        reference_mobile: file.reference_mobile,
        address: file.address,
        business_name: file.business_name,
        business_address: file.business_address,
        principal_amount: file.principal_amount,
        installment: file.installment,
        start_date: file.start_date,
        end_date: file.end_date,
        total_received: file.total_received,
        bounce_count: file.bounce_count,
        transaction_count: file.transaction_count,
    }
}

pub fn transaction_to_dto(transaction: Transaction) -> TransactionDto {
    TransactionDto {
        status: transaction.status().to_string(),
        id: transaction.id,
        file_id: transaction.file_id,
        date: transaction.date,
        amount: transaction.amount,
        mode: transaction.payment_mode().to_string(),
    }
}

pub fn schedule_to_dto(schedule: FileSchedule) -> ScheduleDto {
    ScheduleDto {
        file: file_to_dto(schedule.file),
        transactions: schedule.transactions.into_iter().map(transaction_to_dto).collect(),
        unpaid_days: schedule
            .unpaid_days
            .into_iter()
            .map(|day| DayDto {
                date: day.date,
                status: day.status.label().to_string(),
            })
            .collect(),
    }
}

pub fn portfolio_to_dto(portfolio: Portfolio) -> PortfolioDto {
    PortfolioDto {
        active_files: portfolio.active_files,
        closed_files: portfolio.closed_files,
        total_pending: portfolio.total_pending,
    }
}

pub fn reconciliation_to_dto(reconciliation: &Reconciliation) -> ReconciliationDto {
    ReconciliationDto {
        file_id: reconciliation.file_id,
        changed: reconciliation.changed(),
        total_received: reconciliation.current.total_received,
        transaction_count: reconciliation.current.transaction_count,
        bounce_count: reconciliation.current.bounce_count,
    }
}

pub fn create_request_to_input(request: CreateFileRequest) -> NewLoanFile {
    NewLoanFile {
        person_name: request.person_name,
        person_mobile: request.person_mobile,
        reference_mobile: request.reference_mobile,
        address: request.address,
        business_name: request.business_name,
        business_address: request.business_address,
        principal_amount: request.principal_amount,
        installment: request.installment,
        start_date: request.start_date,
        end_date: request.end_date,
    }
}

pub fn payment_request_to_input(request: PaymentRequest) -> PaymentInput {
    PaymentInput::new(request.date, request.amount, request.mode)
}

/// Parses a status filter or target, reporting unknown values as validation errors.
pub fn parse_status(value: &str) -> Result<FileStatus, LedgerError> {
    FileStatus::parse(value)
        .ok_or_else(|| LedgerError::Validation(format!("status '{}' is not ACTIVE or CLOSED", value)))
}
