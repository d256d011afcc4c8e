//! Price oracle service
//!
//! Main entry point for the gRPC server

use std::env;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use oracle_core::AppConfig;
use oracle_engine::PriceOracle;
use oracle_grpc_server::{GrpcServer, GrpcServerConfig, OracleServiceImpl};
use oracle_price_feed::{HttpPriceProxy, StaticDirectory};

const DEFAULT_CONFIG_PATH: &str = "config/oracle.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting price oracle v{}", env!("CARGO_PKG_VERSION"));

    let config_path = env::var("ORACLE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("loading configuration from {config_path}"))?;

    let mut directory = StaticDirectory::new();
    for endpoint in &config.oracle.proxies {
        let client = HttpPriceProxy::from_config(endpoint)
            .with_context(|| format!("building client for price proxy {}", endpoint.address))?;
        info!("Price proxy {} -> {}", endpoint.address, client.url());
        directory.insert(endpoint.address, Arc::new(client));
    }

    let oracle = PriceOracle::from_config(&config.oracle, Arc::new(directory))
        .context("bootstrapping oracle state")?;

    let server = GrpcServer::new(
        GrpcServerConfig::from(&config.server),
        OracleServiceImpl::new(oracle),
    );

    info!("gRPC server listening on {}", server.address());
    info!("Press Ctrl+C to shutdown");

    if let Err(e) = server.start_with_shutdown(shutdown_signal()).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        }
        _ = terminate => {
            info!("Received termination signal");
        }
    }
}
