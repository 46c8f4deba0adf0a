//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error("backend error: {source}")]
    Backend {
        #[source]
        source: wepr::Error,
    },
}

impl From<wepr::Error> for ServerError {
    fn from(source: wepr::Error) -> Self {
        match source {
            wepr::Error::InvalidRequest { message } => Self::BadRequest { message },
            source => Self::Backend { source },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest { message } => {
                warn!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, message.clone())
            }
            // Backend details stay in the log.
            Self::Backend { source } => {
                error!(error = %source, "ollama request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Ollama error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
