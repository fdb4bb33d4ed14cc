use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use common::{PaymentRequest, TransactionDto};
use compute::DatabaseStore;
use sea_orm::TransactionTrait;
use tracing::{debug, info, instrument, trace};

use crate::access::Tier;
use crate::error::ApiResult;
use crate::helpers::converters::{payment_request_to_input, transaction_to_dto};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Payments of a file in date order
#[utoipa::path(
    get,
    path = "/api/v1/files/{file_id}/transactions",
    tag = "transactions",
    params(
        ("file_id" = i32, Path, description = "File number"),
    ),
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = ApiResponse<Vec<TransactionDto>>),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn get_file_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<Vec<TransactionDto>>>> {
    state.access.authorize(&headers, Tier::Read)?;
    let transactions = state
        .ledger()
        .file_transactions(&DatabaseStore::new(&state.db), file_id)
        .await?;
    debug!("File {} has {} transactions", file_id, transactions.len());
    Ok(Json(ApiResponse::ok(
        transactions.into_iter().map(transaction_to_dto).collect(),
        "Transactions retrieved successfully",
    )))
}

/// Record a repayment
#[utoipa::path(
    post,
    path = "/api/v1/files/{file_id}/transactions",
    tag = "transactions",
    params(
        ("file_id" = i32, Path, description = "File number"),
    ),
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "Transaction recorded successfully", body = ApiResponse<TransactionDto>),
        (status = 400, description = "Invalid, future or pre-start payment", body = ErrorResponse),
        (status = 403, description = "Write access required", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 409, description = "Date already paid or file closed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers, request))]
pub async fn add_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file_id): Path<i32>,
    Json(request): Json<PaymentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TransactionDto>>)> {
    trace!("Entering add_transaction function for file_id: {}", file_id);
    state.access.authorize(&headers, Tier::ReadWrite)?;
    let ledger = state.ledger();

    let txn = state.db.begin().await?;
    let store = DatabaseStore::new(&txn);
    let transaction_id = ledger
        .add_transaction(&store, file_id, payment_request_to_input(request))
        .await?;
    let transaction = ledger.get_transaction(&store, transaction_id).await?;
    txn.commit().await?;

    info!("Recorded transaction {} for file {}", transaction_id, file_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            transaction_to_dto(transaction),
            "Transaction recorded successfully",
        )),
    ))
}

/// Edit a recorded repayment
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Transaction updated successfully", body = ApiResponse<TransactionDto>),
        (status = 400, description = "Invalid, future or pre-start payment", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 409, description = "Date already paid", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers, request))]
pub async fn update_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(transaction_id): Path<i32>,
    Json(request): Json<PaymentRequest>,
) -> ApiResult<Json<ApiResponse<TransactionDto>>> {
    trace!("Entering update_transaction function for transaction_id: {}", transaction_id);
    state.access.authorize(&headers, Tier::ReadWrite)?;
    let ledger = state.ledger();

    let txn = state.db.begin().await?;
    let transaction = ledger
        .edit_transaction(
            &DatabaseStore::new(&txn),
            transaction_id,
            payment_request_to_input(request),
        )
        .await?;
    txn.commit().await?;

    Ok(Json(ApiResponse::ok(
        transaction_to_dto(transaction),
        "Transaction updated successfully",
    )))
}

/// Delete a recorded repayment
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction deleted successfully", body = ApiResponse<TransactionDto>),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(transaction_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<TransactionDto>>> {
    trace!("Entering delete_transaction function for transaction_id: {}", transaction_id);
    state.access.authorize(&headers, Tier::ReadWrite)?;
    let ledger = state.ledger();

    let txn = state.db.begin().await?;
    let removed = ledger
        .delete_transaction(&DatabaseStore::new(&txn), transaction_id)
        .await?;
    txn.commit().await?;

    Ok(Json(ApiResponse::ok(
        transaction_to_dto(removed),
        "Transaction deleted successfully",
    )))
}
