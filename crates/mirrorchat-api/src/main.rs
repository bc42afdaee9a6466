//! Mirrorchat server entry point.
//!
//! Binary name: `mirrorchat`
//!
//! Parses CLI arguments, resolves configuration, wires services and serves
//! the HTTP API until Ctrl+C or SIGTERM.

mod cli;
mod http;
mod state;

use clap::Parser;

use cli::{Cli, Commands};
use mirrorchat_infra::config::{load_server_config, resolve_data_dir};
use mirrorchat_observe::tracing_setup::{init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "info,mirrorchat_api=debug,mirrorchat_core=debug,mirrorchat_infra=debug",
        _ => "trace",
    };
    init_tracing(cli.otel, filter).map_err(|e| anyhow::anyhow!(e))?;

    let data_dir = resolve_data_dir();
    let mut config = load_server_config(&data_dir).await;

    match cli.command.unwrap_or_default() {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let state = AppState::init(&config).await;
            let addr = format!("{}:{}", config.host, config.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "Mirrorchat listening");

            let router = http::router::build_router(state);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("Server stopped");
        }
    }

    shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
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
        () = ctrl_c => {},
        () = terminate => {},
    }
}
