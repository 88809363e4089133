//! CLI command handlers.

mod ask;
mod prompts;

pub use ask::AskCommand;
pub use prompts::PromptsCommand;
