//! # Application State
//!
//! The shared, read-only state every handler receives: the configuration, the fixed
//! document location, and the answer client built once at startup.

use crate::config::AppConfig;
use onboard::{
    providers::ai::{gemini::GeminiProvider, GenerativeModels},
    AnswerService,
};
use onboard_pdf::default_document_path;
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Where the policy document is read from on every request.
    pub document_path: Arc<PathBuf>,
    pub answer_service: Arc<AnswerService>,
}

impl AppState {
    pub fn new(config: AppConfig, document_path: PathBuf, answer_service: AnswerService) -> Self {
        Self {
            config: Arc::new(config),
            document_path: Arc::new(document_path),
            answer_service: Arc::new(answer_service),
        }
    }
}

/// Builds the answer client from the configuration.
///
/// A missing credential is not an error: Q&A is disabled and the rest of the page works.
pub fn build_answer_service(config: &AppConfig) -> anyhow::Result<AnswerService> {
    let provider: Option<Box<dyn GenerativeModels>> = match &config.gemini_api_key {
        Some(api_key) => Some(Box::new(GeminiProvider::new(
            config.gemini_api_base_url.clone(),
            api_key.clone(),
        )?)),
        None => {
            warn!("GEMINI_API_KEY is not set; Q&A is disabled.");
            None
        }
    };
    if config.model_candidates.is_empty() {
        warn!("No model candidates are configured; Q&A is disabled.");
    }
    Ok(AnswerService::new(provider, config.model_candidates.clone()))
}

/// Builds the shared application state, with the document at its fixed location.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let answer_service = build_answer_service(&config)?;
    let document_path = default_document_path();
    info!(
        document = %document_path.display(),
        candidates = ?config.model_candidates,
        "Application state initialized"
    );
    Ok(AppState::new(config, document_path, answer_service))
}
