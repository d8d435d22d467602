use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    #[error("paste not found")]
    NotFound,
    #[error("bad request, invalid input")]
    InvalidInput,
    #[error("bad request, invalid ttl")]
    InvalidTtl,
    #[error("bad request, ttl must be at least {min} seconds")]
    TtlTooShort { min: i64 },
    #[error("unsupported input")]
    UnsupportedInput,
    #[error("collision detected, is the random id range near exhaust?")]
    IdentifierSpaceExhausted,
    #[error("error reading multipart data")]
    Multipart {
        #[from]
        source: MultipartError,
    },
    #[error("error reading multipart request")]
    MultipartRejection {
        #[from]
        source: MultipartRejection,
    },
    #[error("error reading form data")]
    Form {
        #[from]
        source: FormRejection,
    },
    #[error("serialization error")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    #[error("database error")]
    #[cfg(feature = "sqlite")]
    Database {
        #[from]
        source: sqlx::Error,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidInput => StatusCode::BAD_REQUEST,
            ApiError::InvalidTtl => StatusCode::BAD_REQUEST,
            ApiError::TtlTooShort { .. } => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedInput => StatusCode::BAD_REQUEST,
            ApiError::IdentifierSpaceExhausted => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Multipart { .. } => StatusCode::BAD_REQUEST,
            ApiError::MultipartRejection { .. } => StatusCode::BAD_REQUEST,
            ApiError::Form { .. } => StatusCode::BAD_REQUEST,
            ApiError::Serialization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            #[cfg(feature = "sqlite")]
            ApiError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code.is_server_error() {
            error!("request failed: {self:?}");
        }

        (status_code, format!("{self}")).into_response()
    }
}
