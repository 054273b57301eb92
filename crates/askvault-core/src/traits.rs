//! Collaborator traits implemented by LLM providers.
//!
//! Both traits are object-safe so services can hold `Arc<dyn Embedder>` /
//! `Arc<dyn Answerer>` and tests can substitute mocks.

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into a fixed-dimension embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Lightweight connectivity probe for health reporting.
    async fn check_connection(&self) -> bool {
        true
    }
}

/// Generates an answer grounded in the supplied context chunks.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, question: &str, context_chunks: &[String]) -> Result<String>;
}
