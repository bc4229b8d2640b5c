use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    RequestValidationError(#[from] garde::Report),
    #[error("{0}")]
    AuthorizationError(String),
    #[error("{0}")]
    ConflictError(String),
    #[error("{0}")]
    AlreadyBookedError(String),
    #[error("cannot move a booking from {from} to {to}")]
    InvalidTransitionError { from: String, to: String },
    #[error("{0}")]
    UpstreamError(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("identity headers are missing or malformed")]
    UnauthenticatedError,
    #[error("transaction failed")]
    TransactionError(#[source] sqlx::Error),
    #[error("database operation failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("{0}")]
    NoRowsAffectedError(String),
    #[error(transparent)]
    ConvertToUuidError(#[from] uuid::Error),
    #[error("{0}")]
    ConversionEntityError(String),
}

impl AppError {
    // 呼び出し側の再試行で解消しうるもの
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::UpstreamError(_) | AppError::AlreadyBookedError(_)
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::RequestValidationError(_) => "validation",
            AppError::AuthorizationError(_) => "authorization",
            AppError::ConflictError(_) => "conflict",
            AppError::AlreadyBookedError(_) => "already_booked",
            AppError::InvalidTransitionError { .. } => "invalid_transition",
            AppError::UpstreamError(_) => "upstream",
            AppError::EntityNotFound(_) => "not_found",
            AppError::UnauthenticatedError => "unauthenticated",
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::ConversionEntityError(_)
            | AppError::ConvertToUuidError(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::RequestValidationError(_)
            | AppError::ConvertToUuidError(_) => StatusCode::BAD_REQUEST,
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) | AppError::AlreadyBookedError(_) => StatusCode::CONFLICT,
            AppError::InvalidTransitionError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::ConversionEntityError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
        }

        let body = serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
            "retryable": self.is_retryable(),
        });
        (status_code, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
