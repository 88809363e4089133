//! Hugging Face Inference API provider implementation.
//!
//! This module provides integration with the hosted Hugging Face Inference
//! API for text generation.
//! API: https://huggingface.co/docs/api-inference/

use crate::client::{LlmClient, LlmRequest, LlmResponse};
use farmguru_core::{AppError, AppResult};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Default base URL for hosted models.
const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Fixed request timeout for the hosted endpoint.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Default generation budget when the request does not set one.
const DEFAULT_MAX_NEW_TOKENS: u32 = 256;

/// Hugging Face Inference API request format.
#[derive(Debug, Serialize)]
struct HfRequest {
    inputs: String,
    parameters: HfParameters,
}

#[derive(Debug, Serialize)]
struct HfParameters {
    max_new_tokens: u32,
}

/// Hugging Face Inference API client.
pub struct HuggingFaceClient {
    /// Fully resolved model URL
    url: String,

    /// Model identifier (for response metadata)
    model: String,

    /// Bearer token for the Authorization header
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HuggingFaceClient {
    /// Create a new client for a hosted model.
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            url: format!("{}/{}", DEFAULT_BASE_URL, model),
            model,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a new client pointing at a custom endpoint URL.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            url: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert LlmRequest to the Hugging Face wire format.
    fn to_hf_request(&self, request: &LlmRequest) -> HfRequest {
        HfRequest {
            inputs: request.prompt.clone(),
            parameters: HfParameters {
                max_new_tokens: request.max_new_tokens.unwrap_or(DEFAULT_MAX_NEW_TOKENS),
            },
        }
    }
}

/// Extract the generated text from a Hugging Face Inference response body.
///
/// The hosted API typically returns a list with `{"generated_text": ...}`,
/// but some hosted models return `{"summary_text": ...}` or a bare object.
/// Unknown shapes are re-serialized so the caller can still inspect them.
fn extract_generated_text(body: &Value) -> AppResult<String> {
    match body {
        Value::Array(items) => {
            let first = items.first().ok_or_else(|| {
                AppError::Llm("Empty response array from inference endpoint".to_string())
            })?;

            if let Some(text) = first.get("generated_text").and_then(Value::as_str) {
                return Ok(text.to_string());
            }
            if let Some(text) = first.get("summary_text").and_then(Value::as_str) {
                return Ok(text.to_string());
            }
            serde_json::to_string(body).map_err(|e| AppError::Llm(e.to_string()))
        }
        Value::Object(map) => {
            if let Some(text) = map.get("generated_text").and_then(Value::as_str) {
                return Ok(text.to_string());
            }
            serde_json::to_string(body).map_err(|e| AppError::Llm(e.to_string()))
        }
        _ => Err(AppError::Llm(
            "Unexpected response format from inference endpoint".to_string(),
        )),
    }
}

#[async_trait::async_trait]
impl LlmClient for HuggingFaceClient {
    fn provider_name(&self) -> &str {
        "huggingface"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Hugging Face Inference API");
        tracing::debug!("Model: {}", self.model);

        let hf_request = self.to_hf_request(request);

        let response = self
            .client
            .post(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(&hf_request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send inference request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(AppError::Llm(format!(
                "Inference API error: {} {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to decode inference response: {}", e)))?;

        let content = extract_generated_text(&body)?;

        Ok(LlmResponse {
            content,
            model: self.model.clone(),
        })
    }
}
