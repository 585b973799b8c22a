use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Handler failure, rendered as `{"err": "..."}` with a matching status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("url {0} is invalid")]
    InvalidUrl(String),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("invalid shorten url")]
    InvalidKey,

    #[error("shorten url {0} not found")]
    NotFound(String),

    #[error("failed to generate id")]
    Generate(#[source] ringflake::Error),

    #[error("{0}")]
    Store(#[from] super::store::StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    err: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl(_) | Self::InvalidBody(_) | Self::InvalidKey => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Generate(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }
        let body = ErrorBody {
            err: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
