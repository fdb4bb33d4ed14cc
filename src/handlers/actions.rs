//! Single-endpoint action dispatch, for clients that post `{ action, fileNumber, data }`
//! instead of using the REST routes.

use axum::{extract::State, http::HeaderMap, response::Json};
use common::{ActionRequest, AddTransactionData, CreateFileRequest, CreatedFileDto, FileStatusData};
use compute::{DatabaseStore, LedgerError, PaymentInput};
use sea_orm::TransactionTrait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::access::Tier;
use crate::error::{ApiError, ApiResult};
use crate::helpers::converters::{create_request_to_input, file_to_dto, parse_status, transaction_to_dto};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    GetFiles,
    GetTransactions,
    CreateFile,
    AddTransaction,
    UpdateFileStatus,
}

impl Action {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "getFiles" => Some(Action::GetFiles),
            "getTransactions" => Some(Action::GetTransactions),
            "createFile" => Some(Action::CreateFile),
            "addTransaction" => Some(Action::AddTransaction),
            "updateFileStatus" => Some(Action::UpdateFileStatus),
            _ => None,
        }
    }

    fn required_tier(self) -> Tier {
        match self {
            Action::GetFiles | Action::GetTransactions => Tier::Read,
            Action::CreateFile | Action::AddTransaction | Action::UpdateFileStatus => Tier::ReadWrite,
        }
    }
}

fn payload<T: DeserializeOwned>(data: Option<Value>) -> Result<T, LedgerError> {
    let data = data.ok_or_else(|| LedgerError::Validation("data is required".to_string()))?;
    serde_json::from_value(data).map_err(|e| LedgerError::Validation(format!("data: {}", e)))
}

fn respond<T: Serialize>(data: T, message: &str) -> ApiResult<Json<ApiResponse<Value>>> {
    Ok(Json(ApiResponse::ok(serde_json::to_value(data)?, message)))
}

/// Dispatch one of the named actions
#[utoipa::path(
    post,
    path = "/api/v1/actions",
    tag = "actions",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Action performed", body = ApiResponse<Object>),
        (status = 400, description = "Missing or invalid action, or invalid data", body = ErrorResponse),
        (status = 403, description = "Caller not allow-listed or write access required", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 409, description = "Date already paid or file closed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers, request), fields(action = ?request.action))]
pub async fn dispatch_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let Some(name) = request.action.as_deref().filter(|a| !a.is_empty()) else {
        return Err(ApiError::bad_request("Action parameter is required"));
    };
    state.access.authorize(&headers, Tier::Read)?;

    let Some(action) = Action::parse(name) else {
        warn!("Unknown action '{}'", name);
        return Err(ApiError::bad_request("Invalid action"));
    };
    state.access.authorize(&headers, action.required_tier())?;
    debug!("Dispatching {:?}", action);

    let ledger = state.ledger();
    match action {
        Action::GetFiles => {
            let files = ledger.list_files(&DatabaseStore::new(&state.db), None).await?;
            let files: Vec<_> = files.into_iter().map(file_to_dto).collect();
            respond(files, "Files retrieved successfully")
        }
        Action::GetTransactions => {
            let file_id = request
                .file_number
                .ok_or_else(|| LedgerError::Validation("fileNumber is required".to_string()))?;
            let transactions = ledger
                .file_transactions(&DatabaseStore::new(&state.db), file_id)
                .await?;
            let transactions: Vec<_> = transactions.into_iter().map(transaction_to_dto).collect();
            respond(transactions, "Transactions retrieved successfully")
        }
        Action::CreateFile => {
            let data: CreateFileRequest = payload(request.data)?;
            let txn = state.db.begin().await?;
            let file_id = ledger
                .create_file(&DatabaseStore::new(&txn), create_request_to_input(data))
                .await?;
            txn.commit().await?;
            info!("File {} created through action dispatch", file_id);
            respond(CreatedFileDto { file_number: file_id }, "File created successfully")
        }
        Action::AddTransaction => {
            let data: AddTransactionData = payload(request.data)?;
            let txn = state.db.begin().await?;
            let store = DatabaseStore::new(&txn);
            let transaction_id = ledger
                .add_transaction(
                    &store,
                    data.file_number,
                    PaymentInput::new(data.date, data.amount, data.mode),
                )
                .await?;
            let transaction = ledger.get_transaction(&store, transaction_id).await?;
            txn.commit().await?;
            respond(transaction_to_dto(transaction), "Transaction recorded successfully")
        }
        Action::UpdateFileStatus => {
            let data: FileStatusData = payload(request.data)?;
            let status = parse_status(&data.status)?;
            let txn = state.db.begin().await?;
            let file = ledger
                .set_file_status(&DatabaseStore::new(&txn), data.file_number, status)
                .await?;
            txn.commit().await?;
            respond(file_to_dto(file), "File status updated successfully")
        }
    }
}
