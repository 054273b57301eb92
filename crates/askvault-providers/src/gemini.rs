//! Gemini REST client implementing both collaborator traits.
//!
//! One client handles embedding (`models/{m}:embedContent`) and grounded
//! answer generation (`models/{m}:generateContent`). Rate-limit responses
//! (HTTP 429) surface as `RateLimited` and are retried with linear backoff:
//! 3 attempts at a 2s base for embedding, 5s base for generation.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use askvault_core::config::AskVaultConfig;
use askvault_core::error::{AskVaultError, Result};
use askvault_core::traits::{Answerer, Embedder};

use crate::retry;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant for a Private Knowledge Q&A system.
Answer the user question based ONLY on the provided context below.
If the answer cannot be found in the context, state that you cannot find the answer in the documents.
Do not hallucinate or use outside knowledge.
";

/// Gemini API client.
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    embedding_model: String,
    chat_model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create from configuration. The API key resolves from the config file
    /// first, then `GEMINI_API_KEY` / `GOOGLE_API_KEY`.
    pub fn new(config: &AskVaultConfig) -> Result<Self> {
        let api_key = config.resolve_api_key();
        if api_key.is_empty() {
            return Err(AskVaultError::ApiKeyMissing("gemini".into()));
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: config.embedding_model.clone(),
            chat_model: config.chat_model.clone(),
            client: reqwest::Client::new(),
        })
    }

    /// POST a JSON body and return the parsed response.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let resp = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AskVaultError::Http(format!("gemini connection failed ({url}): {e}")))?;

        let status = resp.status();
        if status.as_u16() == 429 {
            let text = resp.text().await.unwrap_or_default();
            return Err(AskVaultError::RateLimited(format!("gemini 429: {text}")));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AskVaultError::Provider(format!("gemini API error {status}: {text}")));
        }

        resp.json().await.map_err(|e| AskVaultError::Http(e.to_string()))
    }

    async fn embed_once(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/models/{}:embedContent", self.base_url, self.embedding_model);
        let body = json!({
            "content": { "parts": [{ "text": text }] }
        });
        let response = self.post_json(&url, &body).await?;
        parse_embedding(&response)
    }

    async fn generate_once(&self, user_message: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.chat_model);
        let body = json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": user_message }] }],
            "generationConfig": { "temperature": 0.0 }
        });
        let response = self.post_json(&url, &body).await?;
        parse_answer(&response)
    }
}

/// Extract `embedding.values` from an embedContent response.
fn parse_embedding(response: &Value) -> Result<Vec<f32>> {
    let values = response["embedding"]["values"]
        .as_array()
        .ok_or_else(|| AskVaultError::Provider("No embedding values in response".into()))?;
    Ok(values.iter().filter_map(|v| v.as_f64()).map(|v| v as f32).collect())
}

/// Extract the first candidate's text from a generateContent response.
fn parse_answer(response: &Value) -> Result<String> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| AskVaultError::Provider("No candidates in response".into()))
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        // The embedding endpoint scores newlines as content; flatten them.
        let text = text.replace('\n', " ");
        retry::with_backoff("Embedding", 3, Duration::from_secs(2), || async {
            self.embed_once(&text).await
        })
        .await
    }

    async fn check_connection(&self) -> bool {
        let url = format!("{}/models", self.base_url);
        match self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl Answerer for GeminiClient {
    async fn answer(&self, question: &str, context_chunks: &[String]) -> Result<String> {
        let context_text = context_chunks.join("\n\n---\n\n");
        let user_message = format!("Context:\n{context_text}\n\nQuestion: {question}\n");

        retry::with_backoff("Chat", 3, Duration::from_secs(5), || async {
            self.generate_once(&user_message).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_rejected() {
        let config = AskVaultConfig::default();
        if config.resolve_api_key().is_empty() {
            assert!(matches!(
                GeminiClient::new(&config),
                Err(AskVaultError::ApiKeyMissing(_))
            ));
        }
    }

    #[test]
    fn test_parse_embedding() {
        let response = json!({ "embedding": { "values": [0.1, 0.2, 0.3] } });
        let vector = parse_embedding(&response).unwrap();
        assert_eq!(vector.len(), 3);
        assert!((vector[0] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_parse_embedding_missing_values() {
        assert!(parse_embedding(&json!({})).is_err());
    }

    #[test]
    fn test_parse_answer() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "The answer." }] } }]
        });
        assert_eq!(parse_answer(&response).unwrap(), "The answer.");
    }

    #[test]
    fn test_parse_answer_no_candidates() {
        assert!(parse_answer(&json!({ "candidates": [] })).is_err());
    }
}
