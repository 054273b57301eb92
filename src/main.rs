//! # AskVault — Private Knowledge Q&A Server
//!
//! Upload `.txt` documents, ask questions, get answers grounded in the most
//! similar stored chunks, with citations.
//!
//! Usage:
//!   askvault                          # Start server (default 127.0.0.1:8000)
//!   askvault --port 8080              # Custom port
//!   askvault --config ./askvault.toml # Custom config file

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use askvault_core::config::AskVaultConfig;
use askvault_retrieval::RetrievalService;
use askvault_store::ChunkStore;

#[derive(Parser)]
#[command(name = "askvault", version, about = "🔐 AskVault — Private Knowledge Q&A")]
struct Cli {
    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to config file (default: ~/.askvault/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "askvault=debug,askvault_store=debug,askvault_retrieval=debug,askvault_gateway=debug,tower_http=debug"
    } else {
        "askvault=info,askvault_store=info,askvault_retrieval=info,askvault_gateway=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Load config
    let mut config = match &cli.config {
        Some(path) => {
            let expanded = shellexpand::tilde(path).to_string();
            AskVaultConfig::load_from(Path::new(&expanded))?
        }
        None => AskVaultConfig::load()?,
    };
    if let Some(host) = cli.host {
        config.gateway.host = host;
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    // Providers — one Gemini client serves both embedding and answering.
    let client = Arc::new(askvault_providers::create_client(&config)?);
    tracing::info!(
        "✅ Gemini client ready (embedding={}, chat={})",
        config.embedding_model,
        config.chat_model
    );

    // Chunk store, loaded from its snapshot.
    let snapshot_path = config.storage.snapshot_path();
    let store = ChunkStore::open(&snapshot_path);
    tracing::info!(
        "📚 Chunk store ready: {} chunk(s) at {}",
        store.len(),
        snapshot_path.display()
    );

    let service = Arc::new(RetrievalService::new(
        Arc::new(tokio::sync::Mutex::new(store)),
        client.clone(),
        client,
        config.retrieval.clone(),
    ));

    askvault_gateway::start(&config.gateway, service).await
}
