//! Agent-hint classification.
//!
//! Routes a question to one of the assistant's specialist agents by keyword
//! matching. The label rides along in answer metadata so downstream consumers
//! know which agent the question was handled under.

use serde::{Deserialize, Serialize};

/// Specialist agent a question is routed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentHint {
    Weather,
    Market,
    Policy,
    ChemReco,
    Vision,
    General,
}

impl AgentHint {
    /// Classify a question by keyword groups. First match wins.
    pub fn classify(question: &str) -> Self {
        let q = question.to_lowercase();

        if contains_any(&q, &["weather", "rain", "forecast", "temperature"]) {
            Self::Weather
        } else if contains_any(&q, &["price", "market", "sell", "buy", "mandi"]) {
            Self::Market
        } else if contains_any(&q, &["scheme", "policy", "pmkisan", "pmfby", "insurance"]) {
            Self::Policy
        } else if contains_any(&q, &["pest", "disease", "chemical", "pesticide", "treatment"]) {
            Self::ChemReco
        } else if q.contains("image shows:") {
            Self::Vision
        } else {
            Self::General
        }
    }

    /// Parse an agent label (e.g., from a CLI flag).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weather" => Some(Self::Weather),
            "market" => Some(Self::Market),
            "policy" => Some(Self::Policy),
            "chem_reco" | "chem-reco" => Some(Self::ChemReco),
            "vision" => Some(Self::Vision),
            "general" => Some(Self::General),
            _ => None,
        }
    }

    /// Lowercase label used in answer metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Market => "market",
            Self::Policy => "policy",
            Self::ChemReco => "chem_reco",
            Self::Vision => "vision",
            Self::General => "general",
        }
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

impl std::fmt::Display for AgentHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
