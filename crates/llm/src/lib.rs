//! LLM integration crate for the FarmGuru CLI.
//!
//! This crate provides a provider-agnostic abstraction for calling hosted
//! text-generation endpoints. It supports providers through a unified
//! trait-based interface.
//!
//! # Providers
//! - **Hugging Face Inference API**: hosted text generation (default)
//!
//! # Example
//! ```no_run
//! use farmguru_llm::{LlmClient, LlmRequest, providers::HuggingFaceClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HuggingFaceClient::new("mistralai/Mixtral-8x7B-Instruct", "hf_token");
//! let request = LlmRequest::new("Hello, world!");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse};
pub use factory::create_client;
pub use providers::HuggingFaceClient;
pub use types::ProviderType;
