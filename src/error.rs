use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The referenced user (or friend) does not exist. Not retryable.
    #[error("user not found")]
    NotFound,

    /// A concurrent writer beat us to the row. The whole
    /// load-reconcile-store sequence must be retried from a fresh read;
    /// reconciliation is idempotent, so the retry always converges.
    #[error("concurrent write detected, retry the request")]
    Conflict,

    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Persistence-layer failure. Always surfaced: swallowing it could
    /// leave the checkpoint out of step with the persisted solved-state.
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Conflict => StatusCode::CONFLICT,
            Error::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("[into_response] {self}");
        }

        (status, Json(serde_json::json!({ "message": self.to_string() }))).into_response()
    }
}
