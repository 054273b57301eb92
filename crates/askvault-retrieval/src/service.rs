//! Upload and question-answering orchestration.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use askvault_core::config::RetrievalConfig;
use askvault_core::error::{AskVaultError, Result};
use askvault_core::traits::{Answerer, Embedder};
use askvault_core::types::{Citation, DocumentSummary, QueryOutcome, UploadReceipt};
use askvault_store::ChunkStore;
use askvault_store::chunker;

/// Fixed answer when retrieval finds nothing for the session.
pub const NO_RESULTS_ANSWER: &str = "No relevant documents found.";

/// Fixed answer when generation fails after a successful retrieval.
pub const DEGRADED_ANSWER: &str = "I encountered an error generating the answer.";

const SNIPPET_CHARS: usize = 200;

/// Health report for the service and its collaborators.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthStatus {
    pub storage: String,
    pub llm: String,
}

/// Composes the chunk store with the embedding and answering collaborators.
///
/// The store lock is held only for store operations — never across an
/// embedding or generation call, which are slow network requests.
pub struct RetrievalService {
    store: Arc<Mutex<ChunkStore>>,
    embedder: Arc<dyn Embedder>,
    answerer: Arc<dyn Answerer>,
    config: RetrievalConfig,
}

impl RetrievalService {
    pub fn new(
        store: Arc<Mutex<ChunkStore>>,
        embedder: Arc<dyn Embedder>,
        answerer: Arc<dyn Answerer>,
        config: RetrievalConfig,
    ) -> Self {
        Self { store, embedder, answerer, config }
    }

    /// Default `k` for queries that do not specify one.
    pub fn default_top_k(&self) -> usize {
        self.config.top_k
    }

    /// Clean, chunk, embed, and store one document for a session.
    ///
    /// Every chunk of the upload carries the same freshly minted document
    /// id. A failed embed or persist aborts the upload with the error;
    /// chunks stored before the failure remain (the caller re-uploads after
    /// deleting, there is no partial-upload recovery).
    pub async fn upload_document(
        &self,
        filename: &str,
        content: &str,
        session_id: &str,
    ) -> Result<UploadReceipt> {
        let cleaned = chunker::clean_text(content);
        if cleaned.is_empty() {
            return Err(AskVaultError::InvalidInput("File is empty".into()));
        }

        let chunks = chunker::chunk_text(&cleaned, self.config.chunk_size, self.config.chunk_overlap);
        let document_id = Uuid::new_v4().to_string();
        let mut uploaded_at = None;

        for chunk in &chunks {
            let vector = self.embedder.embed(chunk).await?;
            let record = {
                let mut store = self.store.lock().await;
                store.add(chunk, vector, filename, session_id, &document_id)?
            };
            uploaded_at.get_or_insert(record.uploaded_at);
        }

        tracing::info!(
            "📄 Stored '{}' as {} chunk(s) (document {})",
            filename,
            chunks.len(),
            document_id
        );
        Ok(UploadReceipt {
            document_id,
            source: filename.to_string(),
            chunk_count: chunks.len(),
            uploaded_at: uploaded_at.unwrap_or_else(Utc::now),
        })
    }

    /// Answer a question from the session's documents.
    ///
    /// Empty retrieval yields the fixed no-results answer with no citations.
    /// A generation failure is recovered into the fixed degraded answer;
    /// citations from the already-successful retrieval are kept.
    pub async fn answer_question(
        &self,
        question: &str,
        session_id: &str,
        k: usize,
    ) -> Result<QueryOutcome> {
        let query_vector = self.embedder.embed(question).await?;

        let hits = {
            let store = self.store.lock().await;
            store.search(&query_vector, session_id, k)?
        };
        if hits.is_empty() {
            return Ok(QueryOutcome { answer: NO_RESULTS_ANSWER.into(), citations: Vec::new() });
        }

        let context: Vec<String> = hits.iter().map(|h| h.chunk.text.clone()).collect();
        let answer = match self.answerer.answer(question, &context).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("❌ Answer generation failed: {e}");
                DEGRADED_ANSWER.to_string()
            }
        };

        let citations = hits
            .iter()
            .map(|h| Citation {
                source: h.chunk.source.clone(),
                snippet: snippet(&h.chunk.text),
                chunk_id: h.chunk.id,
                score: h.score,
            })
            .collect();

        Ok(QueryOutcome { answer, citations })
    }

    /// The session's documents, in upload order.
    pub async fn list_documents(&self, session_id: &str) -> Vec<DocumentSummary> {
        self.store.lock().await.list(session_id)
    }

    /// Delete one document for a session; `false` when nothing matched.
    pub async fn delete_document(&self, document_id: &str, session_id: &str) -> Result<bool> {
        self.store.lock().await.delete_document(document_id, session_id)
    }

    /// Storage and LLM connectivity status.
    pub async fn health(&self) -> HealthStatus {
        let chunk_count = self.store.lock().await.len();
        tracing::debug!("Health probe: {chunk_count} chunk(s) stored");
        let llm = if self.embedder.check_connection().await { "ok" } else { "error" };
        HealthStatus { storage: "ok".into(), llm: llm.into() }
    }
}

/// Bounded citation preview: first 200 chars, marked only when truncated.
fn snippet(text: &str) -> String {
    let mut chars = text.chars();
    let preview: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{preview}...")
    } else {
        preview
    }
}
