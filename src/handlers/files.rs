use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use common::{CreateFileRequest, FileDto, FilesQuery, ReconciliationDto, ScheduleDto};
use compute::DatabaseStore;
use sea_orm::TransactionTrait;
use tracing::{debug, info, instrument, trace};

use crate::access::Tier;
use crate::error::ApiResult;
use crate::helpers::converters::{
    create_request_to_input, file_to_dto, parse_status, reconciliation_to_dto, schedule_to_dto,
};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// List loan files
#[utoipa::path(
    get,
    path = "/api/v1/files",
    tag = "files",
    params(
        ("status" = Option<String>, Query, description = "Only files with this status (ACTIVE or CLOSED)"),
    ),
    responses(
        (status = 200, description = "Files retrieved successfully", body = ApiResponse<Vec<FileDto>>),
        (status = 400, description = "Unknown status filter", body = ErrorResponse),
        (status = 403, description = "Caller not allow-listed", body = ErrorResponse),
        (status = 503, description = "Record store unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn get_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FilesQuery>,
) -> ApiResult<Json<ApiResponse<Vec<FileDto>>>> {
    trace!("Entering get_files function");
    state.access.authorize(&headers, Tier::Read)?;

    let status = query.status.as_deref().map(parse_status).transpose()?;
    let files = state
        .ledger()
        .list_files(&DatabaseStore::new(&state.db), status)
        .await?;
    debug!("Retrieved {} files", files.len());

    Ok(Json(ApiResponse::ok(
        files.into_iter().map(file_to_dto).collect(),
        "Files retrieved successfully",
    )))
}

/// Open a new loan file
#[utoipa::path(
    post,
    path = "/api/v1/files",
    tag = "files",
    request_body = CreateFileRequest,
    responses(
        (status = 201, description = "File created successfully", body = ApiResponse<FileDto>),
        (status = 400, description = "Invalid file details", body = ErrorResponse),
        (status = 403, description = "Write access required", body = ErrorResponse),
        (status = 503, description = "Record store unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers, request))]
pub async fn create_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateFileRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<FileDto>>)> {
    trace!("Entering create_file function");
    state.access.authorize(&headers, Tier::ReadWrite)?;
    let ledger = state.ledger();

    let txn = state.db.begin().await?;
    let store = DatabaseStore::new(&txn);
    let file_id = ledger.create_file(&store, create_request_to_input(request)).await?;
    let file = ledger.get_file(&store, file_id).await?;
    txn.commit().await?;

    info!("File {} created for {}", file.id, file.person_name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(file_to_dto(file), "File created successfully")),
    ))
}

/// Get a loan file by number
#[utoipa::path(
    get,
    path = "/api/v1/files/{file_id}",
    tag = "files",
    params(
        ("file_id" = i32, Path, description = "File number"),
    ),
    responses(
        (status = 200, description = "File retrieved successfully", body = ApiResponse<FileDto>),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn get_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<FileDto>>> {
    state.access.authorize(&headers, Tier::Read)?;
    let file = state
        .ledger()
        .get_file(&DatabaseStore::new(&state.db), file_id)
        .await?;
    Ok(Json(ApiResponse::ok(file_to_dto(file), "File retrieved successfully")))
}

/// Close a loan file
#[utoipa::path(
    post,
    path = "/api/v1/files/{file_id}/close",
    tag = "files",
    params(
        ("file_id" = i32, Path, description = "File number"),
    ),
    responses(
        (status = 200, description = "File closed successfully", body = ApiResponse<FileDto>),
        (status = 403, description = "Write access required", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 409, description = "File already closed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn close_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<FileDto>>> {
    trace!("Entering close_file function for file_id: {}", file_id);
    state.access.authorize(&headers, Tier::ReadWrite)?;
    let ledger = state.ledger();

    let txn = state.db.begin().await?;
    let file = ledger.close_file(&DatabaseStore::new(&txn), file_id).await?;
    txn.commit().await?;

    info!("File {} closed with {} bounces", file_id, file.bounce_count);
    Ok(Json(ApiResponse::ok(file_to_dto(file), "File closed successfully")))
}

/// Payments and unpaid days of a file
#[utoipa::path(
    get,
    path = "/api/v1/files/{file_id}/schedule",
    tag = "files",
    params(
        ("file_id" = i32, Path, description = "File number"),
    ),
    responses(
        (status = 200, description = "Schedule retrieved successfully", body = ApiResponse<ScheduleDto>),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn get_file_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<ScheduleDto>>> {
    state.access.authorize(&headers, Tier::Read)?;
    let schedule = state
        .ledger()
        .file_schedule(&DatabaseStore::new(&state.db), file_id)
        .await?;
    debug!(
        "File {} has {} payments and {} unpaid days",
        file_id,
        schedule.transactions.len(),
        schedule.unpaid_days.len()
    );
    Ok(Json(ApiResponse::ok(
        schedule_to_dto(schedule),
        "Schedule retrieved successfully",
    )))
}

/// Recount a file's aggregates from its payments
#[utoipa::path(
    post,
    path = "/api/v1/files/{file_id}/reconcile",
    tag = "files",
    params(
        ("file_id" = i32, Path, description = "File number"),
    ),
    responses(
        (status = 200, description = "File reconciled", body = ApiResponse<ReconciliationDto>),
        (status = 403, description = "Write access required", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn reconcile_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<ReconciliationDto>>> {
    state.access.authorize(&headers, Tier::ReadWrite)?;
    let ledger = state.ledger();

    let txn = state.db.begin().await?;
    let reconciliation = ledger.reconcile_file(&DatabaseStore::new(&txn), file_id).await?;
    txn.commit().await?;

    Ok(Json(ApiResponse::ok(
        reconciliation_to_dto(&reconciliation),
        "File reconciled successfully",
    )))
}
