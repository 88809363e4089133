//! Prompts command handler.

use clap::Args;
use farmguru_core::{config::AppConfig, AppResult};
use farmguru_synthesis::prompt::list_templates;

/// List available prompt templates in the workspace
#[derive(Args, Debug)]
pub struct PromptsCommand {}

impl PromptsCommand {
    /// Execute the prompts command.
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let names = list_templates(&config.workspace)?;

        if names.is_empty() {
            println!("No prompt templates found; the built-in default will be used.");
            return Ok(());
        }

        for name in names {
            println!("{}", name);
        }

        Ok(())
    }
}
