//! AskVault error taxonomy.

/// Convenience alias used across all AskVault crates.
pub type Result<T> = std::result::Result<T, AskVaultError>;

/// All failure classes in the system.
///
/// Retrieval misses are not errors — an empty result set flows through `Ok`.
/// Deleting a document that does not exist is the boolean `false`, not an
/// error. Generation failures are recovered by the retrieval service into a
/// degraded answer and never reach callers as `Err`.
#[derive(Debug, thiserror::Error)]
pub enum AskVaultError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Provider error: {0}")]
    Provider(String),

    /// Rate-limit-class provider failure — the only retryable class.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API key missing for provider '{0}'")]
    ApiKeyMissing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A vector's dimensionality does not match the store's.
    #[error("Vector dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

impl AskVaultError {
    /// Whether this failure should be retried with backoff.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, AskVaultError::RateLimited(_))
    }
}
