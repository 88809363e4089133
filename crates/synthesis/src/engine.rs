//! Answer synthesis orchestration.
//!
//! Ties the pipeline together: prompt construction, the hosted inference
//! call, reply validation, and the deterministic fallback. Model failures of
//! any kind are logged and absorbed; callers always receive an answer.

use crate::agent::AgentHint;
use crate::fallback::deterministic_fallback;
use crate::parse::parse_model_reply;
use crate::prompt;
use crate::types::{RetrievedDoc, Synthesis};
use farmguru_core::{AppConfig, AppResult};
use farmguru_llm::{LlmClient, LlmRequest};
use std::path::PathBuf;
use std::sync::Arc;

/// Synthesizes answers from a question and retrieved documents.
pub struct Synthesizer {
    /// Hosted inference client; `None` when no API key is configured
    client: Option<Arc<dyn LlmClient>>,

    /// Workspace root, used to locate prompt templates
    workspace: PathBuf,

    /// Maximum retrieved documents listed in the prompt
    max_docs: usize,
}

impl Synthesizer {
    /// Create a synthesizer with an explicit (optional) client.
    pub fn new(
        client: Option<Arc<dyn LlmClient>>,
        workspace: impl Into<PathBuf>,
        max_docs: usize,
    ) -> Self {
        Self {
            client,
            workspace: workspace.into(),
            max_docs,
        }
    }

    /// Build a synthesizer from application configuration.
    ///
    /// Without an API key no client is created and every question is answered
    /// by the deterministic responder.
    pub fn from_config(config: &AppConfig) -> Self {
        let client = match config.api_key.as_deref() {
            Some(api_key) => {
                match farmguru_llm::create_client(
                    &config.provider,
                    &config.model,
                    config.endpoint.as_deref(),
                    Some(api_key),
                ) {
                    Ok(client) => Some(client),
                    Err(e) => {
                        tracing::warn!("Could not create inference client: {}", e);
                        None
                    }
                }
            }
            None => {
                tracing::info!("No API key configured; using deterministic responder only");
                None
            }
        };

        Self::new(client, config.workspace.clone(), config.max_docs)
    }

    /// Synthesize an answer for a question from retrieved documents.
    ///
    /// Decision tree:
    /// 1. No documents: fixed don't-know answer.
    /// 2. Client configured: prompt the model and validate its reply.
    /// 3. Anything failed (or no client): deterministic fallback.
    pub async fn synthesize(
        &self,
        question: &str,
        docs: &[RetrievedDoc],
        hint: AgentHint,
    ) -> Synthesis {
        if docs.is_empty() {
            tracing::info!("No documents retrieved; returning don't-know answer");
            return Synthesis::no_information(hint.as_str());
        }

        if let Some(ref client) = self.client {
            match self.try_model(client.as_ref(), question, docs, hint).await {
                Ok(Some(synthesis)) => {
                    tracing::info!(
                        "Model answered (confidence {:.2}, {} sources)",
                        synthesis.confidence,
                        synthesis.sources.len()
                    );
                    return synthesis;
                }
                Ok(None) => {
                    tracing::warn!("Model reply invalid; falling back to deterministic answer");
                }
                Err(e) => {
                    tracing::warn!("Inference call failed: {}; falling back", e);
                }
            }
        }

        deterministic_fallback(question, docs, hint)
    }

    /// Prompt the model and validate its reply.
    async fn try_model(
        &self,
        client: &dyn LlmClient,
        question: &str,
        docs: &[RetrievedDoc],
        hint: AgentHint,
    ) -> AppResult<Option<Synthesis>> {
        let template = prompt::load_template(&self.workspace);
        let full_prompt = prompt::build_prompt(&template, question, docs, self.max_docs)?;

        tracing::debug!("Prompt is {} chars", full_prompt.chars().count());

        let request = LlmRequest::new(full_prompt);
        let response = client.complete(&request).await?;

        Ok(parse_model_reply(&response.content, docs, hint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmguru_core::{AppError, AppResult};
    use farmguru_llm::LlmResponse;
    use tempfile::TempDir;

    /// Test double that returns a canned reply or a transport error.
    struct MockClient {
        reply: Result<String, String>,
    }

    impl MockClient {
        fn replying(reply: &str) -> Arc<dyn LlmClient> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
            })
        }

        fn failing(error: &str) -> Arc<dyn LlmClient> {
            Arc::new(Self {
                reply: Err(error.to_string()),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for MockClient {
        fn provider_name(&self) -> &str {
            "mock"
        }

        async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
            match &self.reply {
                Ok(content) => Ok(LlmResponse {
                    content: content.clone(),
                    model: "mock".to_string(),
                }),
                Err(e) => Err(AppError::Llm(e.clone())),
            }
        }
    }

    fn docs() -> Vec<RetrievedDoc> {
        vec![RetrievedDoc {
            id: Some("doc-1".to_string()),
            title: Some("Guide".to_string()),
            source_url: Some("https://e.x/1".to_string()),
            content: Some("Irrigation basics for wheat.".to_string()),
        }]
    }

    fn synthesizer(client: Option<Arc<dyn LlmClient>>, workspace: &TempDir) -> Synthesizer {
        Synthesizer::new(client, workspace.path(), 3)
    }

    #[tokio::test]
    async fn test_empty_docs_returns_dont_know() {
        let workspace = TempDir::new().unwrap();
        let engine = synthesizer(Some(MockClient::replying("ignored")), &workspace);

        let synthesis = engine.synthesize("any question at all", &[], AgentHint::General).await;

        assert_eq!(
            synthesis.answer,
            "I don't know — please consult a local expert."
        );
        assert_eq!(synthesis.confidence, 0.0);
        assert!(synthesis.sources.is_empty());
    }

    #[tokio::test]
    async fn test_no_client_uses_fallback() {
        let workspace = TempDir::new().unwrap();
        let engine = synthesizer(None, &workspace);

        let synthesis = engine
            .synthesize("when to irrigate?", &docs(), AgentHint::General)
            .await;

        assert_eq!(synthesis.confidence, 0.5);
        assert!(synthesis.answer.contains("soil moisture"));
        assert!(!synthesis.actions.is_empty());
        assert_eq!(synthesis.sources.len(), 1);
        assert_eq!(synthesis.meta.agent, "general");
    }

    #[tokio::test]
    async fn test_valid_model_reply_is_returned() {
        let workspace = TempDir::new().unwrap();
        let reply = r#"```json
{"answer": "Irrigate at dawn.", "confidence": 0.9, "actions": ["Irrigate at dawn"], "sources": []}
```"#;
        let engine = synthesizer(Some(MockClient::replying(reply)), &workspace);

        let synthesis = engine
            .synthesize("when to irrigate?", &docs(), AgentHint::General)
            .await;

        assert_eq!(synthesis.answer, "Irrigate at dawn.");
        assert_eq!(synthesis.confidence, 0.9);
        assert_eq!(synthesis.meta.retrieved_ids, vec!["doc-1"]);
    }

    #[tokio::test]
    async fn test_malformed_model_reply_falls_back() {
        let workspace = TempDir::new().unwrap();
        // Missing the required confidence field
        let reply = r#"{"answer": "a", "actions": [], "sources": []}"#;
        let engine = synthesizer(Some(MockClient::replying(reply)), &workspace);

        let synthesis = engine
            .synthesize("when to irrigate?", &docs(), AgentHint::General)
            .await;

        assert_eq!(synthesis.confidence, 0.5);
        assert!(synthesis.answer.contains("soil moisture"));
    }

    #[tokio::test]
    async fn test_transport_error_falls_back() {
        let workspace = TempDir::new().unwrap();
        let engine = synthesizer(Some(MockClient::failing("503 overloaded")), &workspace);

        let synthesis = engine
            .synthesize("how to treat this pest?", &docs(), AgentHint::ChemReco)
            .await;

        assert_eq!(synthesis.confidence, 0.5);
        assert!(synthesis.answer.contains("Integrated Pest Management"));
        assert_eq!(synthesis.meta.agent, "chem_reco");
    }

    #[tokio::test]
    async fn test_custom_template_is_used() {
        let workspace = TempDir::new().unwrap();
        let prompts_dir = workspace.path().join(".farmguru/prompts");
        std::fs::create_dir_all(&prompts_dir).unwrap();
        std::fs::write(prompts_dir.join("rag.hbs"), "Custom: {{question}}").unwrap();

        // The engine should still run end to end with the custom template
        let reply = r#"{"answer": "ok", "confidence": 0.7, "actions": [], "sources": []}"#;
        let engine = synthesizer(Some(MockClient::replying(reply)), &workspace);

        let synthesis = engine
            .synthesize("custom question", &docs(), AgentHint::General)
            .await;
        assert_eq!(synthesis.answer, "ok");
    }
}
