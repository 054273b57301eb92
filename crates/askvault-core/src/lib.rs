//! # AskVault Core
//!
//! Shared foundation for the AskVault workspace:
//! - **Configuration**: TOML config with env-var API key resolution
//! - **Error taxonomy**: one `AskVaultError` enum for all crates
//! - **Types**: chunk records, search hits, citations, summaries
//! - **Traits**: `Embedder` / `Answerer` collaborator contracts

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{AskVaultError, Result};
