//! Deterministic rule-based responder.
//!
//! Used whenever the hosted model is unavailable or its reply fails
//! validation. Classifies the question into keyword groups and returns a
//! short, conservative canned answer with fixed 0.5 confidence.

use crate::agent::AgentHint;
use crate::types::{truncate_chars, RetrievedDoc, SourceRef, Synthesis, SynthesisMeta};

/// Fixed confidence for every fallback answer.
const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Maximum actions attached to a fallback answer.
const MAX_ACTIONS: usize = 2;

/// Maximum characters per source snippet.
const MAX_SNIPPET_CHARS: usize = 150;

/// Maximum characters of combined document content in the generic answer.
const MAX_GENERIC_BASE_CHARS: usize = 160;

/// Produce a deterministic answer from the question and retrieved documents.
pub fn deterministic_fallback(
    question: &str,
    docs: &[RetrievedDoc],
    hint: AgentHint,
) -> Synthesis {
    let q = question.to_lowercase();

    let (answer, actions) = if contains_any(&q, &["water", "irrigat", "rain"]) {
        (
            "Check soil moisture at 2–3 inch depth and consider current rainfall before irrigating."
                .to_string(),
            vec![
                "Check soil moisture".to_string(),
                "Review local forecast".to_string(),
            ],
        )
    } else if contains_any(&q, &["pest", "disease", "bug"]) {
        (
            "Use Integrated Pest Management (IPM) practices and consult local experts for specific guidance."
                .to_string(),
            vec![
                "Remove affected parts".to_string(),
                "Consult KVK expert".to_string(),
            ],
        )
    } else if contains_any(&q, &["fertilizer", "nutrient"]) {
        (
            "Do a soil test first and apply a balanced fertilizer as recommended by local guidelines."
                .to_string(),
            vec![
                "Get soil test".to_string(),
                "Follow local guidance".to_string(),
            ],
        )
    } else {
        (
            generic_answer(docs),
            vec!["Consult agricultural officer".to_string()],
        )
    };

    let sources = docs
        .iter()
        .map(|doc| SourceRef {
            title: doc
                .title
                .clone()
                .unwrap_or_else(crate::types::default_source_title),
            url: doc
                .source_url
                .clone()
                .unwrap_or_else(crate::types::default_source_url),
            snippet: truncate_chars(doc.content_or_empty(), MAX_SNIPPET_CHARS),
        })
        .collect();

    Synthesis {
        answer,
        confidence: FALLBACK_CONFIDENCE,
        actions: actions.into_iter().take(MAX_ACTIONS).collect(),
        sources,
        meta: SynthesisMeta::new(hint.as_str(), docs),
    }
}

/// Content-based answer for questions outside the keyword groups.
///
/// Leads with a short excerpt from the top two passages so the answer stays
/// grounded in what was actually retrieved.
fn generic_answer(docs: &[RetrievedDoc]) -> String {
    let snippets: Vec<String> = docs
        .iter()
        .take(2)
        .map(|doc| truncate_chars(doc.content_or_empty(), MAX_SNIPPET_CHARS))
        .collect();
    let combined = snippets.join(" ").trim().to_string();

    let base = if combined.is_empty() {
        "Information is limited.".to_string()
    } else {
        truncate_chars(&combined, MAX_GENERIC_BASE_CHARS)
    };

    format!("{} Please consult local experts for specific advice.", base)
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}
