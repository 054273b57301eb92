//! Shared data types for the AskVault workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One embedded unit of text, as stored and persisted.
///
/// `id` is assigned once at insertion time (the collection size at that
/// moment) and never reassigned. `document_id` groups all chunks of one
/// upload and is the key for deletion and listing. `session_id` scopes
/// visibility: a record is only ever returned to callers presenting the
/// exact same session id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkRecord {
    pub id: u64,
    pub document_id: String,
    pub text: String,
    pub vector: Vec<f32>,
    pub source: String,
    pub session_id: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub chunk: ChunkRecord,
    pub score: f32,
}

/// One uploaded document as seen by the listing API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub document_id: String,
    pub source: String,
    pub chunk_count: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// Receipt returned after a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub document_id: String,
    pub source: String,
    pub chunk_count: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// A source reference attached to an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    /// First 200 chars of the chunk, `…`-marked when truncated.
    pub snippet: String,
    pub chunk_id: u64,
    pub score: f32,
}

/// Answer to a question plus the citations it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub answer: String,
    pub citations: Vec<Citation>,
}
