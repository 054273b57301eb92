//! The session-partitioned chunk store.

use std::path::PathBuf;

use chrono::Utc;

use askvault_core::error::{AskVaultError, Result};
use askvault_core::types::{ChunkRecord, DocumentSummary, SearchHit};

use crate::ranker;
use crate::snapshot::Snapshot;

/// Authoritative collection of chunk records with write-through persistence.
///
/// Every mutating operation persists the full snapshot before returning;
/// when the save fails, the in-memory mutation is rolled back so memory and
/// disk never silently diverge. Reads and mutations are expected to run
/// under one exclusive lock held by the owner (see crate docs).
pub struct ChunkStore {
    chunks: Vec<ChunkRecord>,
    snapshot: Snapshot,
}

impl ChunkStore {
    /// Open a store backed by the snapshot at `path`, loading any existing
    /// collection. A missing or corrupt snapshot starts the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let snapshot = Snapshot::new(path);
        let chunks = snapshot.load();
        if !chunks.is_empty() {
            tracing::info!(
                "📚 Loaded {} chunk(s) from {}",
                chunks.len(),
                snapshot.path().display()
            );
        }
        Self { chunks, snapshot }
    }

    /// Number of chunks across all sessions.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The store's vector dimensionality, fixed by its first record.
    pub fn dimension(&self) -> Option<usize> {
        self.chunks.first().map(|c| c.vector.len())
    }

    /// The id the next record will receive. Equals the collection size
    /// while the store is append-only; after deletions it keeps counting
    /// upward so ids stay unique and are never reused.
    fn next_id(&self) -> u64 {
        self.chunks.iter().map(|c| c.id + 1).max().unwrap_or(0)
    }

    /// Append one chunk, persist, and return the created record.
    ///
    /// Record ids are monotonic, assigned once, never reassigned or reused.
    /// Rejects empty text and vectors whose dimension differs from the
    /// store's.
    pub fn add(
        &mut self,
        text: &str,
        vector: Vec<f32>,
        source: &str,
        session_id: &str,
        document_id: &str,
    ) -> Result<ChunkRecord> {
        if text.trim().is_empty() {
            return Err(AskVaultError::InvalidInput("chunk text must not be empty".into()));
        }
        if let Some(expected) = self.dimension() {
            if vector.len() != expected {
                return Err(AskVaultError::DimensionMismatch { expected, found: vector.len() });
            }
        }

        let record = ChunkRecord {
            id: self.next_id(),
            document_id: document_id.to_string(),
            text: text.to_string(),
            vector,
            source: source.to_string(),
            session_id: session_id.to_string(),
            uploaded_at: Utc::now(),
        };

        self.chunks.push(record.clone());
        if let Err(e) = self.snapshot.save(&self.chunks) {
            self.chunks.pop();
            tracing::error!("❌ Snapshot save failed, rolled back add: {e}");
            return Err(e);
        }
        Ok(record)
    }

    /// Top-k most similar chunks to `query` within one session.
    ///
    /// Empty result (never an error) when the session has no chunks, `k` is
    /// zero, or the query vector has zero norm. A query whose dimension does
    /// not match the store's is rejected.
    pub fn search(&self, query: &[f32], session_id: &str, k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let candidates: Vec<&ChunkRecord> = self
            .chunks
            .iter()
            .filter(|c| c.session_id == session_id)
            .collect();
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(expected) = self.dimension() {
            if query.len() != expected {
                return Err(AskVaultError::DimensionMismatch { expected, found: query.len() });
            }
        }

        let vectors: Vec<&[f32]> = candidates.iter().map(|c| c.vector.as_slice()).collect();
        let hits = ranker::rank_top_k(query, &vectors, k)
            .into_iter()
            .map(|(i, score)| SearchHit { chunk: candidates[i].clone(), score })
            .collect();
        Ok(hits)
    }

    /// Remove every chunk of one document within one session, persist, and
    /// report whether anything was removed.
    pub fn delete_document(&mut self, document_id: &str, session_id: &str) -> Result<bool> {
        let retained: Vec<ChunkRecord> = self
            .chunks
            .iter()
            .filter(|c| !(c.document_id == document_id && c.session_id == session_id))
            .cloned()
            .collect();
        if retained.len() == self.chunks.len() {
            return Ok(false);
        }

        let previous = std::mem::replace(&mut self.chunks, retained);
        if let Err(e) = self.snapshot.save(&self.chunks) {
            self.chunks = previous;
            tracing::error!("❌ Snapshot save failed, rolled back delete: {e}");
            return Err(e);
        }
        Ok(true)
    }

    /// One summary per document in the session, in insertion order of each
    /// document's first chunk.
    pub fn list(&self, session_id: &str) -> Vec<DocumentSummary> {
        let mut summaries: Vec<DocumentSummary> = Vec::new();
        for chunk in self.chunks.iter().filter(|c| c.session_id == session_id) {
            match summaries.iter_mut().find(|s| s.document_id == chunk.document_id) {
                Some(summary) => summary.chunk_count += 1,
                None => summaries.push(DocumentSummary {
                    document_id: chunk.document_id.clone(),
                    source: chunk.source.clone(),
                    chunk_count: 1,
                    uploaded_at: chunk.uploaded_at,
                }),
            }
        }
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("askvault-store-tests").join(name);
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).ok();
        dir
    }

    fn open_store(dir: &PathBuf) -> ChunkStore {
        ChunkStore::open(dir.join("storage.json"))
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let dir = scratch("ids");
        let mut store = open_store(&dir);

        let a = store.add("one", vec![1.0, 0.0], "f.txt", "s", "d0").unwrap();
        let b = store.add("two", vec![0.0, 1.0], "f.txt", "s", "d0").unwrap();
        assert_eq!(a.id, 0);
        assert_eq!(b.id, 1);
        assert_eq!(store.len(), 2);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_add_rejects_empty_text() {
        let dir = scratch("empty-text");
        let mut store = open_store(&dir);
        assert!(store.add("   ", vec![1.0], "f.txt", "s", "d").is_err());
        assert_eq!(store.len(), 0);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_add_rejects_dimension_mismatch() {
        let dir = scratch("add-dim");
        let mut store = open_store(&dir);
        store.add("one", vec![1.0, 0.0], "f.txt", "s", "d").unwrap();

        let err = store.add("two", vec![1.0, 0.0, 0.0], "f.txt", "s", "d").unwrap_err();
        assert!(matches!(err, AskVaultError::DimensionMismatch { expected: 2, found: 3 }));
        assert_eq!(store.len(), 1);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_search_empty_store_returns_empty() {
        let dir = scratch("empty-search");
        let store = open_store(&dir);
        assert!(store.search(&[1.0, 0.0], "a", 3).unwrap().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_search_session_isolation() {
        let dir = scratch("isolation");
        let mut store = open_store(&dir);
        store.add("a0", vec![1.0, 0.0], "f.txt", "a", "d0").unwrap();
        store.add("a1", vec![0.0, 1.0], "f.txt", "a", "d1").unwrap();
        store.add("b0", vec![1.0, 0.0], "f.txt", "b", "d2").unwrap();

        let hits = store.search(&[1.0, 0.0], "a", 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk.id, 0);
        assert!((hits[0].score - 1.0).abs() < 1e-6);

        let hits = store.search(&[1.0, 0.0], "b", 5).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk.id, 2);
        assert!((hits[0].score - 1.0).abs() < 1e-6);

        assert!(store.search(&[1.0, 0.0], "nobody", 5).unwrap().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_search_top_k_bound() {
        let dir = scratch("topk");
        let mut store = open_store(&dir);
        for i in 0..5 {
            let v = vec![1.0, i as f32 * 0.1];
            store.add(&format!("c{i}"), v, "f.txt", "s", "d").unwrap();
        }

        assert_eq!(store.search(&[1.0, 0.0], "s", 3).unwrap().len(), 3);
        assert_eq!(store.search(&[1.0, 0.0], "s", 100).unwrap().len(), 5);
        assert!(store.search(&[1.0, 0.0], "s", 0).unwrap().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_search_deterministic_with_ties() {
        let dir = scratch("determinism");
        let mut store = open_store(&dir);
        store.add("c0", vec![2.0, 0.0], "f.txt", "s", "d").unwrap();
        store.add("c1", vec![3.0, 0.0], "f.txt", "s", "d").unwrap();
        store.add("c2", vec![1.0, 0.0], "f.txt", "s", "d").unwrap();

        let first = store.search(&[1.0, 0.0], "s", 3).unwrap();
        let second = store.search(&[1.0, 0.0], "s", 3).unwrap();
        let ids = |hits: &[SearchHit]| hits.iter().map(|h| h.chunk.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), vec![0, 1, 2]);
        assert_eq!(ids(&first), ids(&second));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_query_returns_empty() {
        let dir = scratch("zero-query");
        let mut store = open_store(&dir);
        store.add("c0", vec![1.0, 0.0], "f.txt", "s", "d").unwrap();

        assert!(store.search(&[0.0, 0.0], "s", 3).unwrap().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_candidate_scores_zero_and_ranks() {
        let dir = scratch("zero-candidate");
        let mut store = open_store(&dir);
        store.add("c0", vec![0.0, 0.0], "f.txt", "s", "d").unwrap();
        store.add("c1", vec![1.0, 0.0], "f.txt", "s", "d").unwrap();

        let hits = store.search(&[1.0, 0.0], "s", 5).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.id, 1);
        assert_eq!(hits[1].chunk.id, 0);
        assert_eq!(hits[1].score, 0.0);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_search_rejects_query_dimension_mismatch() {
        let dir = scratch("query-dim");
        let mut store = open_store(&dir);
        store.add("c0", vec![1.0, 0.0], "f.txt", "s", "d").unwrap();

        assert!(store.search(&[1.0, 0.0, 0.0], "s", 3).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = scratch("roundtrip");
        let path = dir.join("storage.json");
        {
            let mut store = ChunkStore::open(&path);
            store.add("one", vec![1.0, 0.0], "a.txt", "s1", "d0").unwrap();
            store.add("two", vec![0.0, 1.0], "a.txt", "s1", "d0").unwrap();
            store.add("three", vec![0.5, 0.5], "b.txt", "s2", "d1").unwrap();
        }

        let reopened = ChunkStore::open(&path);
        assert_eq!(reopened.len(), 3);
        let hits = reopened.search(&[1.0, 0.0], "s1", 5).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.id, 0);
        assert_eq!(hits[0].chunk.text, "one");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_delete_document_removes_only_matching() {
        let dir = scratch("delete");
        let path = dir.join("storage.json");
        let mut store = ChunkStore::open(&path);
        store.add("one", vec![1.0, 0.0], "a.txt", "s", "d0").unwrap();
        store.add("two", vec![0.0, 1.0], "b.txt", "s", "d1").unwrap();
        store.add("three", vec![0.5, 0.5], "c.txt", "s", "d2").unwrap();

        assert!(store.delete_document("d1", "s").unwrap());
        assert_eq!(store.len(), 2);
        assert!(store.chunks.iter().all(|c| c.document_id != "d1"));
        // Surviving ids are untouched.
        let ids: Vec<u64> = store.chunks.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 2]);

        // Deletion is reflected on disk.
        let reopened = ChunkStore::open(&path);
        assert_eq!(reopened.len(), 2);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_delete_wrong_session_is_noop() {
        let dir = scratch("delete-session");
        let mut store = open_store(&dir);
        store.add("one", vec![1.0, 0.0], "a.txt", "s1", "d0").unwrap();

        assert!(!store.delete_document("d0", "s2").unwrap());
        assert_eq!(store.len(), 1);
        assert!(!store.delete_document("unknown", "s1").unwrap());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let dir = scratch("id-reuse");
        let mut store = open_store(&dir);
        store.add("one", vec![1.0, 0.0], "a.txt", "s", "d0").unwrap();
        store.add("two", vec![0.0, 1.0], "a.txt", "s", "d1").unwrap();
        store.delete_document("d0", "s").unwrap();

        let next = store.add("three", vec![1.0, 1.0], "a.txt", "s", "d2").unwrap();
        assert_eq!(next.id, 2);
        let ids: Vec<u64> = store.chunks.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_list_groups_by_document_in_first_seen_order() {
        let dir = scratch("list");
        let mut store = open_store(&dir);
        store.add("a0", vec![1.0, 0.0], "a.txt", "s", "d0").unwrap();
        store.add("b0", vec![0.0, 1.0], "b.txt", "s", "d1").unwrap();
        store.add("a1", vec![0.5, 0.5], "a.txt", "s", "d0").unwrap();
        store.add("x0", vec![1.0, 1.0], "x.txt", "other", "d2").unwrap();

        let summaries = store.list("s");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].document_id, "d0");
        assert_eq!(summaries[0].source, "a.txt");
        assert_eq!(summaries[0].chunk_count, 2);
        assert_eq!(summaries[1].document_id, "d1");
        assert_eq!(summaries[1].chunk_count, 1);

        assert!(store.list("nobody").is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_save_rolls_back_add() {
        let dir = scratch("rollback-add");
        let path = dir.join("storage.json");
        let mut store = ChunkStore::open(&path);
        store.add("one", vec![1.0, 0.0], "a.txt", "s", "d0").unwrap();

        // Make the snapshot path unwritable: rename onto a directory fails.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(store.add("two", vec![0.0, 1.0], "a.txt", "s", "d1").is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.chunks[0].text, "one");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_save_rolls_back_delete() {
        let dir = scratch("rollback-delete");
        let path = dir.join("storage.json");
        let mut store = ChunkStore::open(&path);
        store.add("one", vec![1.0, 0.0], "a.txt", "s", "d0").unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(store.delete_document("d0", "s").is_err());
        assert_eq!(store.len(), 1);
        std::fs::remove_dir_all(&dir).ok();
    }
}
