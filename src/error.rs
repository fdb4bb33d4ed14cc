use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::ErrorResponse;
use compute::LedgerError;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Malformed request that never reached the ledger
    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Ledger(err) => match err {
                LedgerError::Validation(_)
                | LedgerError::FutureDate { .. }
                | LedgerError::BeforeFileStart { .. } => StatusCode::BAD_REQUEST,
                LedgerError::DuplicateDate(_) | LedgerError::AlreadyClosed(_) => StatusCode::CONFLICT,
                LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
                LedgerError::AccessDenied(_) => StatusCode::FORBIDDEN,
                LedgerError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::Ledger(err) => err.code(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        ApiError::Ledger(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Access messages are shown to the caller as they are
            ApiError::Ledger(LedgerError::AccessDenied(msg)) => msg.clone(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            error!(code = self.code(), "{}", message);
        } else {
            warn!(code = self.code(), "{}", message);
        }

        let body = ErrorResponse {
            error: message,
            code: self.code().to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}
