//! Whole-collection JSON snapshot — lightweight persistence.
//!
//! The snapshot is a single JSON array of chunk records, fully replaced on
//! every mutation. Writes go to a temp file in the same directory and are
//! moved into place with `rename`, so a crash mid-write leaves the previous
//! snapshot intact.

use std::path::{Path, PathBuf};

use askvault_core::error::{AskVaultError, Result};
use askvault_core::types::ChunkRecord;

/// File-backed snapshot of the chunk collection.
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    /// Create a snapshot handle at the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        Self { path }
    }

    /// The snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the full collection to disk, replacing any prior snapshot.
    pub fn save(&self, chunks: &[ChunkRecord]) -> Result<()> {
        let json = serde_json::to_string(chunks)
            .map_err(|e| AskVaultError::Snapshot(format!("Serialize error: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!("💾 Saved {} chunk(s) to {}", chunks.len(), self.path.display());
        Ok(())
    }

    /// Load the collection from disk.
    ///
    /// A missing file is an empty collection. An unreadable or unparsable
    /// file is recoverable: the failure is logged and an empty collection
    /// returned.
    pub fn load(&self) -> Vec<ChunkRecord> {
        if !self.path.exists() {
            return Vec::new();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("⚠️ Failed to parse {}: {e}", self.path.display());
                Vec::new()
            }),
            Err(e) => {
                tracing::warn!("⚠️ Failed to read {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("askvault-snapshot-tests").join(name);
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).ok();
        dir
    }

    fn record(id: u64) -> ChunkRecord {
        ChunkRecord {
            id,
            document_id: format!("doc-{id}"),
            text: format!("chunk {id}"),
            vector: vec![id as f32, 1.0],
            source: "notes.txt".into(),
            session_id: "s1".into(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = scratch("missing");
        let snap = Snapshot::new(dir.join("storage.json"));
        assert!(snap.load().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = scratch("roundtrip");
        let snap = Snapshot::new(dir.join("storage.json"));

        let chunks = vec![record(0), record(1), record(2)];
        snap.save(&chunks).unwrap();

        let loaded = snap.load();
        assert_eq!(loaded, chunks);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = scratch("corrupt");
        let path = dir.join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let snap = Snapshot::new(&path);
        assert!(snap.load().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_replaces_prior_snapshot() {
        let dir = scratch("replace");
        let snap = Snapshot::new(dir.join("storage.json"));

        snap.save(&[record(0), record(1)]).unwrap();
        snap.save(&[record(0)]).unwrap();

        assert_eq!(snap.load().len(), 1);
        // No temp file left behind after a successful save.
        assert!(!dir.join("storage.json.tmp").exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
