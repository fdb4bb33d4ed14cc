use axum::{
    extract::State,
    http::HeaderMap,
    response::Json,
};
use common::PortfolioDto;
use compute::DatabaseStore;
use tracing::instrument;

use crate::access::Tier;
use crate::error::ApiResult;
use crate::helpers::converters::portfolio_to_dto;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Dashboard figures across all files
#[utoipa::path(
    get,
    path = "/api/v1/portfolio",
    tag = "portfolio",
    responses(
        (status = 200, description = "Portfolio retrieved successfully", body = ApiResponse<PortfolioDto>),
        (status = 403, description = "Caller not allow-listed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn get_portfolio(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<PortfolioDto>>> {
    state.access.authorize(&headers, Tier::Read)?;
    let portfolio = state
        .ledger()
        .portfolio(&DatabaseStore::new(&state.db))
        .await?;
    Ok(Json(ApiResponse::ok(
        portfolio_to_dto(portfolio),
        "Portfolio retrieved successfully",
    )))
}
