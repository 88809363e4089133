//! Ask command handler.
//!
//! Answers a question against retrieved documents supplied as a JSON file.
//! Retrieval is an external collaborator; this command only does synthesis.

use clap::Args;
use farmguru_core::{config::AppConfig, AppError, AppResult};
use farmguru_synthesis::{AgentHint, RetrievedDoc, Synthesizer};
use std::path::PathBuf;

/// Ask an agricultural question against retrieved documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// JSON file with the retrieved documents (array of passages)
    #[arg(short, long)]
    pub docs: Option<PathBuf>,

    /// Agent label override (weather, market, policy, chem_reco, vision, general)
    #[arg(short, long)]
    pub agent: Option<String>,

    /// Compact single-line JSON output
    #[arg(long)]
    pub compact: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self
            .get_question()?
            .ok_or_else(|| AppError::Config("No question provided".to_string()))?;

        let docs = self.load_docs()?;
        tracing::debug!("Loaded {} retrieved documents", docs.len());

        let hint = match &self.agent {
            Some(label) => AgentHint::parse(label).ok_or_else(|| {
                AppError::Config(format!("Unknown agent label: {}", label))
            })?,
            None => AgentHint::classify(&question),
        };
        tracing::debug!("Routing question under agent '{}'", hint);

        let synthesizer = Synthesizer::from_config(config);
        let synthesis = synthesizer.synthesize(&question, &docs, hint).await;

        let json = if self.compact {
            serde_json::to_string(&synthesis)
        } else {
            serde_json::to_string_pretty(&synthesis)
        }
        .map_err(|e| AppError::Serialization(e.to_string()))?;

        println!("{}", json);

        Ok(())
    }

    /// Take the question from the positional argument or a file.
    fn get_question(&self) -> AppResult<Option<String>> {
        if let Some(ref question) = self.question {
            return Ok(Some(question.clone()));
        }

        if let Some(ref path) = self.file {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("Failed to read question file {:?}: {}", path, e))
            })?;
            return Ok(Some(contents.trim().to_string()));
        }

        Ok(None)
    }

    /// Load the retrieved documents, if a file was given.
    fn load_docs(&self) -> AppResult<Vec<RetrievedDoc>> {
        let Some(ref path) = self.docs else {
            return Ok(Vec::new());
        };

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read docs file {:?}: {}", path, e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            AppError::Serialization(format!("Failed to parse docs file {:?}: {}", path, e))
        })
    }
}
