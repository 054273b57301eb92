//! # AskVault Gateway
//!
//! HTTP API over the retrieval service: upload, query, list, delete, and
//! health, with CORS and request tracing. Tenant identity is the opaque
//! `X-Session-Id` header; there is no cryptographic session handling.

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
