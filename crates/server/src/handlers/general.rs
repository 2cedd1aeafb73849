//! # General Route Handlers
//!
//! Health check, PWA manifest, and the download of the original document.

use super::{AppError, AppState};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use onboard_pdf::{PolicyDocument, POLICY_FILE_NAME};
use serde_json::json;
use tracing::info;

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// The handler for `/manifest.webmanifest`, which lets mobile browsers add the page to
/// the home screen.
pub async fn manifest_handler() -> impl IntoResponse {
    let manifest = json!({
        "name": "HR Onboarding Tool",
        "short_name": "Onboarding",
        "start_url": "/",
        "display": "standalone",
        "background_color": "#ffffff",
        "theme_color": "#007bff",
    });
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        Json(manifest),
    )
}

/// The handler for `/download`: streams the document bytes as an attachment.
///
/// The document is read fresh for every download.
pub async fn download_handler(State(app_state): State<AppState>) -> Result<Response, AppError> {
    let document = PolicyDocument::load(&app_state.document_path)?;
    info!(bytes = document.bytes().len(), "Serving policy document download");

    let disposition = content_disposition(&app_state.config.download_file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.into_bytes(),
    )
        .into_response())
}

/// An `attachment` disposition carrying `file_name` as an RFC 5987 `filename*`, with the
/// plain ASCII file name as fallback for old clients.
pub fn content_disposition(file_name: &str) -> String {
    let fallback = if file_name.is_ascii() && !file_name.contains(['"', '\\']) {
        file_name
    } else {
        POLICY_FILE_NAME
    };
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        percent_encode(file_name)
    )
}

fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-' | b'_' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}
