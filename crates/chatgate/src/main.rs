use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatgate::config::Config;
use chatgate::llm::{ChatService, PROVIDER_ENV, Provider, ProviderRegistry};
use chatgate::server::{self, AppState};

#[derive(Parser)]
#[command(name = "chatgate", version, about = "Chat gateway for interchangeable LLM backends")]
struct Args {
    /// Path to the config file
    #[arg(short, long, default_value = "chatgate.yaml")]
    config: PathBuf,

    /// Address to bind (overrides config and HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Active provider (overrides LLM_PROVIDER)
    #[arg(long)]
    provider: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .await
        .with_context(|| format!("loading {}", args.config.display()))?;
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let registry = Arc::new(ProviderRegistry::from_env(args.provider));
    let chat = ChatService::new(
        registry.clone(),
        Duration::from_secs(config.server.upstream_timeout_seconds),
    )?;

    let app = server::build_app(AppState { chat }, config.server.request_timeout_seconds);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    log_startup(&addr, &registry);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn log_startup(addr: &str, registry: &ProviderRegistry) {
    let active = registry.active();
    info!(
        %addr,
        provider = active.as_ref().map_or("none", |d| d.provider.as_str()),
        model = active.as_ref().map_or("none", |d| d.model.as_str()),
        "chatgate API server running"
    );
    info!("{} = {}", PROVIDER_ENV, registry.selected());
    for provider in Provider::ALL {
        info!(
            "  {:<10}: {}",
            provider.as_str(),
            provider.spec().env_keys().join(", ")
        );
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
