//! Transport-layer types of the loan ledger API.
//! Request bodies accept both the REST field names and the camelCase names used by
//! the action endpoint, so one struct serves both surfaces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error body returned with every non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ErrorResponse {
    /// Human readable error message
    pub error: String,
    /// Machine readable error code, e.g. `DUPLICATE_DATE`
    pub code: String,
    /// Always false
    pub success: bool,
}

// ===================== Files =====================

/// Request body for opening a new loan file.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Default)]
pub struct CreateFileRequest {
    #[serde(alias = "personName")]
    pub person_name: String,
    #[serde(alias = "personMobile")]
    pub person_mobile: String,
    #[serde(alias = "referenceMobile")]
    pub reference_mobile: String,
    pub address: String,
    #[serde(alias = "businessName")]
    pub business_name: String,
    #[serde(alias = "businessAddress")]
    pub business_address: String,
    /// Principal in whole rupees, 1..=500000
    #[serde(alias = "principalAmount")]
    pub principal_amount: i64,
    /// Expected daily payment
    pub installment: i64,
    /// First due day (YYYY-MM-DD)
    #[serde(alias = "fileStartDate")]
    pub start_date: String,
    /// Scheduled end (YYYY-MM-DD), after the start date
    #[serde(alias = "fileEndDate")]
    pub end_date: String,
}

/// Number assigned to a newly opened file.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CreatedFileDto {
    #[serde(rename = "fileNumber")]
    pub file_number: i32,
}

/// Loan file with its cached aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FileDto {
    pub id: i32,
    pub person_name: String,
    pub person_mobile: String,
    pub reference_mobile: String,
    pub address: String,
    pub business_name: String,
    pub business_address: String,
    pub principal_amount: i64,
    pub installment: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `ACTIVE` or `CLOSED`
    pub status: String,
    /// Always `DAILY`
    pub frequency: String,
    pub total_received: i64,
    /// Principal minus received, may be negative
    pub pending_amount: i64,
    pub bounce_count: i64,
    pub transaction_count: i64,
}

/// Query parameters of the file listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct FilesQuery {
    /// Only files with this status (`ACTIVE` or `CLOSED`)
    pub status: Option<String>,
}

// ===================== Transactions =====================

/// Request body for recording or editing a repayment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PaymentRequest {
    /// Payment day (YYYY-MM-DD)
    pub date: String,
    pub amount: i64,
    /// `CASH`, `UPI` or any other tag
    pub mode: String,
}

/// Recorded repayment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TransactionDto {
    pub id: i32,
    pub file_id: i32,
    pub date: NaiveDate,
    pub amount: i64,
    pub mode: String,
    /// Always `Received`
    pub status: String,
}

// ===================== Schedule and portfolio =====================

/// One unpaid day of a file's window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DayDto {
    pub date: NaiveDate,
    /// `BOUNCE` or `PENDING`
    pub status: String,
}

/// File details view: the file, its payments newest first and its unpaid days.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ScheduleDto {
    pub file: FileDto,
    pub transactions: Vec<TransactionDto>,
    pub unpaid_days: Vec<DayDto>,
}

/// Dashboard figures.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PortfolioDto {
    pub active_files: i64,
    pub closed_files: i64,
    /// Outstanding principal over active files
    pub total_pending: i64,
}

/// Result of recounting one file's aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ReconciliationDto {
    pub file_id: i32,
    /// Whether the stored aggregates had drifted and were rewritten
    pub changed: bool,
    pub total_received: i64,
    pub transaction_count: i64,
    pub bounce_count: i64,
}

// ===================== Actions =====================

/// Body of the action dispatch endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    /// `getFiles`, `getTransactions`, `createFile`, `addTransaction` or `updateFileStatus`
    pub action: Option<String>,
    /// File addressed by `getTransactions`
    pub file_number: Option<i32>,
    /// Payload of the write actions
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

/// `data` of the `addTransaction` action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AddTransactionData {
    #[serde(alias = "fileNumber")]
    pub file_number: i32,
    pub date: String,
    pub amount: i64,
    pub mode: String,
}

/// `data` of the `updateFileStatus` action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FileStatusData {
    #[serde(alias = "fileNumber")]
    pub file_number: i32,
    /// `ACTIVE` or `CLOSED`
    pub status: String,
}
