//! Parley server binary — entry point for the voice-agent web demo.
//!
//! Starts an axum HTTP server with structured logging, the tenant store,
//! the provider client, and graceful shutdown on SIGTERM/SIGINT.

use parley_server::config::{self, Config};
use parley_server::{app, AppState};
use parley_tenants::{TenantDirectory, TenantStore};
use parley_voice::{ProviderConfig, ProviderService};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("PARLEY_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn build_state(config: &Config) -> AppState {
    let store = TenantStore::new(config.tenants.source(), config.tenants.ttl());
    let directory = TenantDirectory::new(store, config.tenants.defaults.to_tenant_config());
    let provider = ProviderService::new(ProviderConfig::new(
        config.provider.base_url.clone(),
        config.provider.api_key.clone(),
    ));

    AppState {
        directory,
        provider,
        client_dir: config.client_dir.clone(),
    }
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    // Load configuration
    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the server cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    if config.provider.api_key.is_empty() {
        tracing::warn!(
            "no provider API key configured — web-call creation will fail; \
             set provider.api_key in config.toml or PARLEY_PROVIDER_API_KEY"
        );
    }

    // Build application
    let addr = SocketAddr::new(config.server.host, config.server.port);
    let app = app(build_state(&config));

    tracing::info!(%addr, "starting parley server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address — is another process using this port?");

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("parley server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
