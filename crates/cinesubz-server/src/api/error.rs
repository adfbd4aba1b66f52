//! API error handling

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cinesubz_core::CinesubzError;
use serde_json::json;
use thiserror::Error;

/// Errors a handler can answer with
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unusable request parameter
    #[error("{0}")]
    BadRequest(String),

    /// The upstream site could not be fetched
    #[error("{error}: {message}")]
    Upstream { error: String, message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Maps a scraper failure, labelling upstream errors with `context`
    ///
    /// Validation failures from the scraper stay client errors.
    pub fn scrape(context: &str, err: CinesubzError) -> Self {
        if err.is_validation() {
            return Self::BadRequest(err.to_string());
        }
        tracing::error!(error = %err, "{}", context);
        Self::Upstream {
            error: context.to_string(),
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest(error) => json!({
                "success": false,
                "error": error,
            }),
            Self::Upstream { error, message } => json!({
                "success": false,
                "error": error,
                "message": message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
