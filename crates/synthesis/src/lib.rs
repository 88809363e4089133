//! Answer synthesis crate for the FarmGuru CLI.
//!
//! This crate turns a user question plus retrieved reference passages into a
//! structured, source-backed answer. It builds a grounded prompt, calls a
//! hosted inference endpoint when one is configured, validates the model's
//! JSON reply, and falls back to a deterministic rule-based responder when
//! the model is unavailable or its reply is invalid.
//!
//! Retrieval itself is an external collaborator; callers supply the ranked
//! passages.

pub mod agent;
pub mod engine;
pub mod fallback;
pub mod parse;
pub mod prompt;
pub mod types;

// Re-export main types
pub use agent::AgentHint;
pub use engine::Synthesizer;
pub use types::{RetrievedDoc, SourceRef, Synthesis, SynthesisMeta};
