//! LLM provider factory.
//!
//! This module provides a factory for creating LLM clients based on
//! application configuration. It handles provider resolution and secret
//! checks.

use crate::client::LlmClient;
use crate::providers::HuggingFaceClient;
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// This function performs the following:
/// 1. Matches the provider string to a known provider type
/// 2. Checks that required secrets are present
/// 3. Creates the appropriate client implementation
///
/// # Arguments
/// * `provider` - Provider identifier ("huggingface" / "hf")
/// * `model` - Hosted model identifier
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (required for hosted providers)
///
/// # Returns
/// A reference-counted trait object implementing `LlmClient`
///
/// # Errors
/// Returns error if the provider is unknown or required secrets are missing.
pub fn create_client(
    provider: &str,
    model: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    match provider.to_lowercase().as_str() {
        "huggingface" | "hf" => {
            let api_key = api_key
                .ok_or_else(|| "Hugging Face provider requires API key".to_string())?;
            let client = match endpoint {
                Some(url) => HuggingFaceClient::with_endpoint(url, model, api_key),
                None => HuggingFaceClient::new(model, api_key),
            };
            Ok(Arc::new(client))
        }
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_huggingface_client() {
        let client = create_client("huggingface", "mistralai/Mixtral-8x7B-Instruct", None, Some("key"));
        assert!(client.is_ok());
        assert_eq!(client.unwrap().provider_name(), "huggingface");
    }

    #[test]
    fn test_create_with_custom_endpoint() {
        let client = create_client(
            "hf",
            "mistralai/Mixtral-8x7B-Instruct",
            Some("http://localhost:8080/generate"),
            Some("key"),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_huggingface_requires_api_key() {
        match create_client("huggingface", "mistralai/Mixtral-8x7B-Instruct", None, None) {
            Err(err) => assert!(err.contains("requires API key")),
            Ok(_) => panic!("Expected error for Hugging Face without API key"),
        }
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", "model", None, None) {
            Err(err) => assert!(err.contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
