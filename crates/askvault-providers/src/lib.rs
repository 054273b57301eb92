//! # AskVault Providers
//!
//! LLM collaborators for AskVault: the Gemini REST API behind the
//! `Embedder` and `Answerer` traits, with bounded retry on rate limits.

pub mod gemini;
pub mod retry;

use askvault_core::config::AskVaultConfig;
use askvault_core::error::Result;

pub use gemini::GeminiClient;

/// Create the Gemini client from configuration.
pub fn create_client(config: &AskVaultConfig) -> Result<GeminiClient> {
    GeminiClient::new(config)
}
