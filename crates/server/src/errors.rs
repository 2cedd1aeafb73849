use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use onboard_pdf::DocumentError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// Only the download endpoint can fail as a whole; the page itself degrades section by
/// section and always renders.
pub enum AppError {
    /// The policy document could not be loaded.
    Document(DocumentError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        AppError::Document(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Document(err) => {
                error!("DocumentError: {:?}", err);
                match err {
                    DocumentError::Missing(_) => (
                        StatusCode::NOT_FOUND,
                        "The policy document is not available.".to_string(),
                    ),
                    DocumentError::Read { .. } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "The policy document could not be read.".to_string(),
                    ),
                }
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
