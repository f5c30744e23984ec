use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use navgraph::{Code, PathError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DeadlineExceeded(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// RPC status code carried in the body
    pub fn code(&self) -> Code {
        match self {
            ApiError::BadRequest(_) => Code::InvalidArgument,
            ApiError::NotFound(_) => Code::NotFound,
            ApiError::DeadlineExceeded(_) => Code::DeadlineExceeded,
            ApiError::Internal(_) => Code::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

// Convert engine errors to ApiError
impl From<PathError> for ApiError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::InvalidArgument(msg) => ApiError::BadRequest(msg),
            PathError::NotFound(msg) => ApiError::NotFound(msg),
            PathError::DeadlineExceeded(msg) => ApiError::DeadlineExceeded(msg),
            PathError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

// Malformed unary bodies share the engine's error shape
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
