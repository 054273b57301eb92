//! API route handlers for the gateway.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use askvault_core::error::AskVaultError;

use super::server::AppState;

/// 10 MiB upload ceiling, matching the original file-size limit.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    #[serde(default)]
    pub k: Option<i64>,
}

/// Pull the opaque tenant id off the `X-Session-Id` header.
fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-Session-Id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn bad_request(msg: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({"ok": false, "error": msg})))
}

fn internal_error(e: AskVaultError) -> (StatusCode, Json<Value>) {
    tracing::error!("❌ Request failed: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"ok": false, "error": e.to_string()})))
}

/// Upload one text document for the caller's session.
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UploadRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(session) = session_id(&headers) else {
        return bad_request("Missing X-Session-Id header");
    };
    if !body.filename.ends_with(".txt") {
        return bad_request("Only .txt files are allowed");
    }
    if body.content.len() > MAX_UPLOAD_BYTES {
        return bad_request("File too large (Max 10MB)");
    }
    if body.content.contains('\0') {
        return bad_request("File contains null bytes (binary file?)");
    }

    match state.service.upload_document(&body.filename, &body.content, &session).await {
        Ok(receipt) => (StatusCode::OK, Json(json!({"ok": true, "document": receipt}))),
        Err(AskVaultError::InvalidInput(msg)) => bad_request(&msg),
        Err(e) => internal_error(e),
    }
}

/// Answer a question from the session's documents.
pub async fn query_documents(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<QueryRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(session) = session_id(&headers) else {
        return bad_request("Missing X-Session-Id header");
    };

    // Negative k floors to zero, which retrieves nothing.
    let k = body
        .k
        .map(|k| k.max(0) as usize)
        .unwrap_or_else(|| state.service.default_top_k());

    match state.service.answer_question(&body.question, &session, k).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({"ok": true, "answer": outcome.answer, "citations": outcome.citations})),
        ),
        Err(e) => internal_error(e),
    }
}

/// List the session's documents.
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let Some(session) = session_id(&headers) else {
        return bad_request("Missing X-Session-Id header");
    };

    let documents = state.service.list_documents(&session).await;
    (
        StatusCode::OK,
        Json(json!({"ok": true, "total": documents.len(), "documents": documents})),
    )
}

/// Delete one document for the caller's session.
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let Some(session) = session_id(&headers) else {
        return bad_request("Missing X-Session-Id header");
    };

    match state.service.delete_document(&id, &session).await {
        Ok(true) => (StatusCode::OK, Json(json!({"ok": true, "message": "Document deleted successfully"}))),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({"ok": false, "error": "Document not found"})),
        ),
        Err(e) => internal_error(e),
    }
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let health = state.service.health().await;
    Json(json!({
        "backend": "ok",
        "storage": health.storage,
        "llm": health.llm,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
