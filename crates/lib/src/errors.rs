use thiserror::Error;

/// Failure of a single call to a hosted model provider.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to model provider: {0}")]
    Request(reqwest::Error),
    #[error("Failed to deserialize model provider response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Model provider returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Model '{0}' returned no text")]
    EmptyResponse(String),
}

/// Outcome of a question that could not be answered.
#[derive(Error, Debug)]
pub enum AnswerError {
    /// Q&A is disabled: no credential was configured, or there is nothing to try.
    #[error("Answer service is unavailable: {0}")]
    ServiceUnavailable(String),
    /// Every model candidate was tried and failed.
    #[error("{}", all_candidates_failed_message(last_error, available_models.as_deref()))]
    AllCandidatesFailed {
        last_error: ModelError,
        /// Identifiers the provider reports as valid, when the listing call succeeded.
        available_models: Option<Vec<String>>,
    },
}

fn all_candidates_failed_message(last_error: &ModelError, available: Option<&[String]>) -> String {
    match available {
        Some(models) if !models.is_empty() => format!(
            "All model candidates failed: {last_error}. Available models: {}",
            models.join(", ")
        ),
        _ => format!("All model candidates failed: {last_error}"),
    }
}
