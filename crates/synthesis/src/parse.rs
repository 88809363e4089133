//! Model reply parsing and validation.
//!
//! The inference endpoint is asked for strict JSON, but hosted models wrap
//! replies in markdown fences or return junk often enough that parsing is
//! best-effort: any invalid reply yields `None` and the caller falls back.

use crate::agent::AgentHint;
use crate::types::{RetrievedDoc, SourceRef, Synthesis, SynthesisMeta};
use serde::Deserialize;

/// The shape the model is instructed to produce.
///
/// `answer`, `confidence`, `actions` and `sources` are all required; a reply
/// missing any of them is rejected.
#[derive(Debug, Deserialize)]
struct ModelReply {
    answer: String,
    confidence: f32,
    actions: Vec<String>,
    sources: Vec<SourceRef>,
}

/// Parse and validate a raw model reply.
///
/// Returns `None` when the reply is not valid JSON or is missing required
/// fields. On success, routing metadata is attached from the input documents.
pub fn parse_model_reply(
    raw: &str,
    docs: &[RetrievedDoc],
    hint: AgentHint,
) -> Option<Synthesis> {
    let cleaned = strip_code_fences(raw);

    let reply: ModelReply = match serde_json::from_str(cleaned) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Model reply failed validation: {}", e);
            return None;
        }
    };

    Some(Synthesis {
        answer: reply.answer,
        confidence: reply.confidence,
        actions: reply.actions,
        sources: reply.sources,
        meta: SynthesisMeta::new(hint.as_str(), docs),
    })
}

/// Strip a surrounding markdown code fence, if present.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped;
    } else if let Some(stripped) = text.strip_prefix("```") {
        text = stripped;
    }

    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped;
    }

    text.trim()
}
