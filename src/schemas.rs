use chrono::NaiveDate;
use common::{
    ActionRequest, AddTransactionData, CreateFileRequest, CreatedFileDto, DayDto, FileDto,
    FileStatusData, FilesQuery, PaymentRequest, PortfolioDto, ReconciliationDto, ScheduleDto,
    TransactionDto,
};
use compute::Ledger;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::access::AccessPolicy;

pub use common::{ApiResponse, ErrorResponse};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// E-mail allow-lists
    pub access: AccessPolicy,
    /// Pinned evaluation date, if configured
    pub today: Option<NaiveDate>,
}

impl AppState {
    /// A ledger for one request. "Today" is sampled once here and used for the
    /// whole operation.
    pub fn ledger(&self) -> Ledger {
        compute::default_ledger(self.today)
    }
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::files::get_files,
        crate::handlers::files::create_file,
        crate::handlers::files::get_file,
        crate::handlers::files::close_file,
        crate::handlers::files::get_file_schedule,
        crate::handlers::files::reconcile_file,
        crate::handlers::transactions::get_file_transactions,
        crate::handlers::transactions::add_transaction,
        crate::handlers::transactions::update_transaction,
        crate::handlers::transactions::delete_transaction,
        crate::handlers::portfolio::get_portfolio,
        crate::handlers::actions::dispatch_action,
    ),
    components(
        schemas(
            ApiResponse<FileDto>,
            ApiResponse<Vec<FileDto>>,
            ApiResponse<TransactionDto>,
            ApiResponse<Vec<TransactionDto>>,
            ApiResponse<ScheduleDto>,
            ApiResponse<PortfolioDto>,
            ApiResponse<ReconciliationDto>,
            ApiResponse<CreatedFileDto>,
            ErrorResponse,
            HealthResponse,
            FilesQuery,
            CreateFileRequest,
            CreatedFileDto,
            FileDto,
            PaymentRequest,
            TransactionDto,
            DayDto,
            ScheduleDto,
            PortfolioDto,
            ReconciliationDto,
            ActionRequest,
            AddTransactionData,
            FileStatusData,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "files", description = "Loan file endpoints"),
        (name = "transactions", description = "Repayment endpoints"),
        (name = "portfolio", description = "Dashboard figures"),
        (name = "actions", description = "Single endpoint action dispatch"),
    ),
    info(
        title = "Loan Ledger API",
        description = "Daily micro-loan repayment ledger with bounce tracking",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
