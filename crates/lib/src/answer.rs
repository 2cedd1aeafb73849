//! # Answer Client
//!
//! Answers a question from the policy document text by walking an ordered list of model
//! candidates. The first candidate that returns text wins. When every candidate fails,
//! one best-effort listing call gathers the identifiers the provider actually accepts so
//! the error can say which names would have worked.

use crate::{
    errors::{AnswerError, ModelError},
    prompts::policy::build_policy_prompt,
    providers::ai::GenerativeModels,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// A successful answer and the candidate that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub text: String,
    pub model: String,
}

/// The answer client.
///
/// Built once at startup and shared read-only. `provider` is `None` when no credential
/// was configured, in which case every question is refused without a network call.
#[derive(Debug, Clone)]
pub struct AnswerService {
    provider: Option<Box<dyn GenerativeModels>>,
    candidates: Vec<String>,
}

impl AnswerService {
    pub fn new(provider: Option<Box<dyn GenerativeModels>>, candidates: Vec<String>) -> Self {
        Self {
            provider,
            candidates,
        }
    }

    /// An answer client with Q&A disabled.
    pub fn disabled() -> Self {
        Self::new(None, Vec::new())
    }

    /// Whether a question could be sent at all.
    pub fn is_available(&self) -> bool {
        self.provider.is_some() && !self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Answers `question` using `document_text` as the only source of truth.
    #[instrument(skip(self, document_text), fields(candidates = self.candidates.len()))]
    pub async fn answer(&self, question: &str, document_text: &str) -> Result<Answer, AnswerError> {
        let provider = self.provider.as_deref().ok_or_else(|| {
            AnswerError::ServiceUnavailable(
                "no Gemini API key is configured (set GEMINI_API_KEY)".to_string(),
            )
        })?;
        if self.candidates.is_empty() {
            return Err(AnswerError::ServiceUnavailable(
                "no model candidates are configured".to_string(),
            ));
        }

        let prompt = build_policy_prompt(document_text, question);

        let mut last_error: Option<ModelError> = None;
        for model in &self.candidates {
            match provider.generate_content(model, &prompt).await {
                Ok(text) => {
                    info!(%model, "Model candidate answered");
                    return Ok(Answer {
                        text,
                        model: model.clone(),
                    });
                }
                Err(e) => {
                    warn!(%model, error = %e, "Model candidate failed, trying the next one");
                    last_error = Some(e);
                }
            }
        }

        // The candidate list is non-empty, so at least one failure was recorded.
        let last_error = match last_error {
            Some(e) => e,
            None => {
                return Err(AnswerError::ServiceUnavailable(
                    "no model candidates are configured".to_string(),
                ))
            }
        };

        let available_models = match provider.list_models().await {
            Ok(models) => Some(models),
            Err(e) => {
                warn!(error = %e, "Listing available models failed");
                None
            }
        };

        Err(AnswerError::AllCandidatesFailed {
            last_error,
            available_models,
        })
    }
}
