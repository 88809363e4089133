//! Answer synthesis domain types.

use serde::{Deserialize, Serialize};

/// A ranked passage supplied by the document retriever.
///
/// All fields are optional; upstream sources vary in completeness and the
/// synthesis pipeline substitutes defaults where needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievedDoc {
    /// Stable document identifier, if the retriever provides one
    pub id: Option<String>,

    /// Document title
    pub title: Option<String>,

    /// Where the document came from
    pub source_url: Option<String>,

    /// Passage text
    pub content: Option<String>,
}

impl RetrievedDoc {
    /// Passage text, or empty string when absent.
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// A user-facing source reference attached to an answer.
///
/// When parsed from a model reply, missing fields take the same defaults the
/// fallback responder uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    #[serde(default = "default_source_title")]
    pub title: String,

    #[serde(default = "default_source_url")]
    pub url: String,

    #[serde(default)]
    pub snippet: String,
}

pub(crate) fn default_source_title() -> String {
    "Agricultural Guide".to_string()
}

pub(crate) fn default_source_url() -> String {
    "#".to_string()
}

/// Metadata attached to every synthesized answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisMeta {
    /// Agent label the question was routed under
    pub agent: String,

    /// Ids of the retrieved documents that had one, in input order
    pub retrieved_ids: Vec<String>,
}

impl SynthesisMeta {
    /// Build metadata for an answer from the input documents.
    pub fn new(agent: &str, docs: &[RetrievedDoc]) -> Self {
        Self {
            agent: agent.to_string(),
            retrieved_ids: docs.iter().filter_map(|d| d.id.clone()).collect(),
        }
    }
}

/// A synthesized answer.
///
/// Every code path in the pipeline produces all five fields; callers never
/// see a partial answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synthesis {
    /// Short natural-language answer (1-2 sentences)
    pub answer: String,

    /// Answer confidence in [0, 1]
    pub confidence: f32,

    /// Concise recommended actions
    pub actions: Vec<String>,

    /// Source references backing the answer
    pub sources: Vec<SourceRef>,

    /// Routing and provenance metadata
    pub meta: SynthesisMeta,
}

impl Synthesis {
    /// The fixed answer returned when no documents were retrieved.
    pub fn no_information(agent: &str) -> Self {
        Self {
            answer: "I don't know — please consult a local expert.".to_string(),
            confidence: 0.0,
            actions: vec!["Ask a local agricultural expert".to_string()],
            sources: Vec::new(),
            meta: SynthesisMeta {
                agent: agent.to_string(),
                retrieved_ids: Vec::new(),
            },
        }
    }
}

/// Truncate text to at most `max_chars` characters, on a char boundary.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: Option<&str>) -> RetrievedDoc {
        RetrievedDoc {
            id: id.map(String::from),
            title: Some("Guide".to_string()),
            source_url: None,
            content: Some("text".to_string()),
        }
    }

    #[test]
    fn test_meta_collects_ids_in_order() {
        let docs = vec![doc(Some("a")), doc(None), doc(Some("b"))];
        let meta = SynthesisMeta::new("general", &docs);
        assert_eq!(meta.retrieved_ids, vec!["a", "b"]);
        assert_eq!(meta.agent, "general");
    }

    #[test]
    fn test_no_information_shape() {
        let synthesis = Synthesis::no_information("general");
        assert_eq!(
            synthesis.answer,
            "I don't know — please consult a local expert."
        );
        assert_eq!(synthesis.confidence, 0.0);
        assert_eq!(synthesis.actions.len(), 1);
        assert!(synthesis.sources.is_empty());
        assert!(synthesis.meta.retrieved_ids.is_empty());
    }

    #[test]
    fn test_source_ref_defaults() {
        let source: SourceRef = serde_json::from_str("{}").unwrap();
        assert_eq!(source.title, "Agricultural Guide");
        assert_eq!(source.url, "#");
        assert_eq!(source.snippet, "");
    }

    #[test]
    fn test_retrieved_doc_lenient_deserialization() {
        let doc: RetrievedDoc = serde_json::from_str(r#"{"title": "Only title"}"#).unwrap();
        assert_eq!(doc.title.as_deref(), Some("Only title"));
        assert!(doc.id.is_none());
        assert_eq!(doc.content_or_empty(), "");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        // Must not split inside a multi-byte char
        let text = "Paddy — बासमती rice";
        let truncated = truncate_chars(text, 8);
        assert_eq!(truncated.chars().count(), 8);
    }
}
