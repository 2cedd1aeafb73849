use crate::{errors::ModelError, providers::ai::GenerativeModels};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

// --- Gemini-specific request and response structures ---

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize, Debug)]
struct ModelInfo {
    name: String,
}

// --- Gemini Provider implementation ---

/// A provider for interacting with the Google Gemini API.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: ReqwestClient,
    api_base_url: String,
    api_key: String,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` bound to `api_key`.
    ///
    /// `api_base_url` is the versioned API root, e.g.
    /// `https://generativelanguage.googleapis.com/v1beta`.
    pub fn new(api_base_url: String, api_key: String) -> Result<Self, ModelError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(ModelError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent",
            self.api_base_url,
            qualified_model_name(model)
        )
    }
}

/// Prefixes bare identifiers such as `gemini-1.5-flash` with `models/`.
pub fn qualified_model_name(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

#[async_trait]
impl GenerativeModels for GeminiProvider {
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        let request_body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = self.generate_url(model);
        debug!(%url, "Sending generateContent request");
        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(ModelError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(ModelError::Deserialization)?;

        let text: String = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse(model.to_string()));
        }
        Ok(text)
    }

    async fn list_models(&self) -> Result<Vec<String>, ModelError> {
        let response = self
            .client
            .get(format!("{}/models", self.api_base_url))
            .query(&[("key", &self.api_key)])
            .send()
            .await
            .map_err(ModelError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let listing: ListModelsResponse = response
            .json()
            .await
            .map_err(ModelError::Deserialization)?;
        Ok(listing.models.into_iter().map(|m| m.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::qualified_model_name;

    #[test]
    fn bare_identifiers_get_models_prefix() {
        assert_eq!(qualified_model_name("gemini-1.5-flash"), "models/gemini-1.5-flash");
        assert_eq!(
            qualified_model_name("models/gemini-2.5-pro"),
            "models/gemini-2.5-pro"
        );
    }
}
