//! CLI entrypoint for testhub-assistant
//!
//! This is the main binary that wires together all layers using
//! dependency injection and serves the HTTP endpoint.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use testhub_application::{LlmGateway, RunChatUseCase};
use testhub_infrastructure::{
    ConfigLoader, FileConfig, GeminiGateway, InMemoryTestStore, JsonSchemaToolConverter,
    StoreToolExecutor,
};
use testhub_presentation::{AppState, Cli, router};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(&cli);

    let config = load_config(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
        print!("{}", config.to_masked_toml()?);
        return Ok(());
    }

    info!("Starting testhub-assistant");

    // === Dependency Injection ===
    let store = Arc::new(InMemoryTestStore::new());
    if config.store.seed_demo_data {
        let project_id = store.seed_demo_data().await?;
        info!("Demo data loaded (project {})", project_id);
    }
    let executor = Arc::new(StoreToolExecutor::new(store));

    let gateway = Arc::new(GeminiGateway::new(config.model.to_gemini_config())?);
    if let Err(e) = gateway.ensure_ready() {
        warn!("{}: chat requests will be rejected until GEMINI_API_KEY is set", e);
    }

    let chat = RunChatUseCase::new(gateway, executor, Arc::new(JsonSchemaToolConverter));
    info!(
        model = chat.model_name(),
        tools = chat.tool_count(),
        max_tool_turns = config.agent.max_tool_turns,
        "Assistant ready"
    );
    let state = AppState::new(chat, config.agent.to_execution_params());

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failure")?;

    info!("Server stopped");
    Ok(())
}

/// Console logging from the verbosity flag (or `RUST_LOG`), plus a daily
/// rotated file when `--log-dir` is given. The guard must outlive `main`.
fn init_tracing(cli: &Cli) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    let (file_layer, guard) = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "testhub-assistant.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
