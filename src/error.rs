use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure outcomes of a user resource operation.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Caller-supplied data failed a precondition.
    #[error("{0}")]
    InvalidInput(String),

    /// Well-formed request, but no row matched or was affected.
    #[error("{0}")]
    NotFound(String),

    /// The store raised an error or reported an unexpected outcome.
    #[error("{message}")]
    StoreFailure {
        message: String,
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Store error caught at the operation boundary; `{:#}` keeps the context chain.
    pub fn store(message: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::StoreFailure {
            message: message.into(),
            detail: Some(format!("{err:#}")),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StoreFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::InvalidInput(message) | ApiError::NotFound(message) => ErrorEnvelope {
                success: false,
                message,
                error: None,
            },
            ApiError::StoreFailure { message, detail } => ErrorEnvelope {
                success: false,
                message,
                error: detail,
            },
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
