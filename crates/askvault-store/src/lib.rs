//! # AskVault Store
//!
//! The chunk store and similarity-retrieval engine:
//! - **Chunking** — whitespace cleanup + sliding-window splitting
//! - **Ranking** — exact cosine top-k over the session's chunks
//! - **Persistence** — whole-collection JSON snapshot, replaced atomically
//!   on every mutation
//! - **Session isolation** — every read and delete is scoped to an opaque
//!   session id, exact equality only
//!
//! The store is synchronous and single-owner; callers that serve concurrent
//! requests wrap it in one `tokio::sync::Mutex` and hold the lock for the
//! duration of each operation (read-modify-persist as one unit). Embedding
//! and answer generation happen outside that lock.

pub mod chunker;
pub mod ranker;
pub mod snapshot;
pub mod store;

pub use snapshot::Snapshot;
pub use store::ChunkStore;
