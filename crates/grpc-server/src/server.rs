//! gRPC server configuration and startup

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tonic::transport::Server;
use tracing::info;

use oracle_core::ServerConfig;

use crate::proto::price_oracle_service_server::PriceOracleServiceServer;
use crate::service::OracleServiceImpl;

/// Server configuration
#[derive(Debug, Clone)]
pub struct GrpcServerConfig {
    pub host: String,
    pub port: u16,
    pub keep_alive_interval: Duration,
    pub keep_alive_timeout: Duration,
}

impl Default for GrpcServerConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for GrpcServerConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            keep_alive_interval: Duration::from_secs(config.keep_alive_interval_secs),
            keep_alive_timeout: Duration::from_secs(config.keep_alive_timeout_secs),
        }
    }
}

/// gRPC server wrapper
pub struct GrpcServer {
    config: GrpcServerConfig,
    service: OracleServiceImpl,
}

impl GrpcServer {
    pub fn new(config: GrpcServerConfig, service: OracleServiceImpl) -> Self {
        Self { config, service }
    }

    /// Serve until `shutdown` resolves
    pub async fn start_with_shutdown<F>(&self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let addr: SocketAddr = self.address().parse()?;

        info!("Starting gRPC server on {}", addr);

        Server::builder()
            .concurrency_limit_per_connection(256)
            .tcp_keepalive(Some(self.config.keep_alive_interval))
            .http2_keepalive_interval(Some(self.config.keep_alive_interval))
            .http2_keepalive_timeout(Some(self.config.keep_alive_timeout))
            .add_service(PriceOracleServiceServer::new(self.service.clone()))
            .serve_with_shutdown(addr, async {
                shutdown.await;
                info!("Shutdown signal received");
            })
            .await?;

        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }
}

/// Builder for server configuration
pub struct GrpcServerBuilder {
    config: GrpcServerConfig,
}

impl GrpcServerBuilder {
    pub fn new() -> Self {
        Self {
            config: GrpcServerConfig::default(),
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn build(self, service: OracleServiceImpl) -> GrpcServer {
        GrpcServer::new(self.config, service)
    }
}

impl Default for GrpcServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
