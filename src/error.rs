use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, TransactionError};

/// API-wide error type. Every handler returns `Result<_, ApiError>` and the
/// `ResponseError` impl renders the `{"error": "..."}` JSON body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input the caller can correct.
    #[error("{0}")]
    Validation(String),
    /// Token missing or invalid.
    #[error("{0}")]
    Unauthorized(String),
    /// Authenticated but not permitted to act on this resource.
    #[error("{0}")]
    Forbidden(String),
    /// Referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// State-machine violation (gig already assigned, bid no longer pending).
    #[error("{0}")]
    Conflict(String),
    /// Store failure or aborted transaction. No partial state persists, so
    /// the caller may retry.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Database(e) = self {
            tracing::error!("store failure: {e}");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

/// Flatten SeaORM's transaction error wrapper: connection-level failures map
/// to `Database`, application aborts carry their original `ApiError` through.
impl From<TransactionError<ApiError>> for ApiError {
    fn from(e: TransactionError<ApiError>) -> Self {
        match e {
            TransactionError::Connection(db) => ApiError::Database(db),
            TransactionError::Transaction(api) => api,
        }
    }
}
