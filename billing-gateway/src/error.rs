use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::dtos::ErrorResponse;
use crate::services::ProcessorError;

/// Error returned by the mutating billing handlers.
///
/// Rendered as `{"status": "error", "error": "<message>"}`; the message is the
/// `Display` of the underlying error so processor messages pass through as-is.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

impl AppError {
    /// True when the caller sent something the processor (or we) refused.
    pub fn is_client_error(&self) -> bool {
        match self {
            AppError::InvalidRequest(_) => true,
            AppError::Processor(err) => err.is_client_error(),
        }
    }

    /// Every failure is answered with 400, including processor outages and
    /// timeouts; the variants only drive logging.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_client_error() {
            let code = match &self {
                AppError::Processor(ProcessorError::Rejected { code, .. }) => code.as_deref(),
                _ => None,
            };
            tracing::warn!(status = %status, code = ?code, error = %self, "Request rejected");
        } else {
            tracing::error!(status = %status, error = %self, "Payment processor call failed");
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
