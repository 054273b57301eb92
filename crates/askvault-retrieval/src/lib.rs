//! # AskVault Retrieval
//!
//! The consumer-facing orchestration layer: composes the chunk store with
//! the `Embedder` and `Answerer` collaborators. Uploads are cleaned,
//! chunked, embedded, and appended to the store; questions are embedded,
//! matched against the session's chunks, and answered by the LLM using only
//! the retrieved context.

pub mod service;

pub use service::{DEGRADED_ANSWER, HealthStatus, NO_RESULTS_ANSWER, RetrievalService};
