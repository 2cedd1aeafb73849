pub mod gemini;

use crate::errors::ModelError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a hosted generative model service.
///
/// One implementation is bound to one credential; the model to use is chosen per call so
/// that the answer client can walk an ordered list of candidates.
#[async_trait]
pub trait GenerativeModels: Send + Sync + Debug + DynClone {
    /// Generates a text response for `prompt` with the model identified by `model`.
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<String, ModelError>;

    /// Lists the model identifiers available to this credential.
    async fn list_models(&self) -> Result<Vec<String>, ModelError>;
}

dyn_clone::clone_trait_object!(GenerativeModels);
