//! gRPC server for the price oracle
//!
//! Exposes the registries, administration and conversion over `PriceOracleService`

pub mod server;
pub mod service;
pub mod conversions;

// Generated from proto/oracle.proto
pub mod proto {
    tonic::include_proto!("oracle");
}

pub use server::{GrpcServer, GrpcServerBuilder, GrpcServerConfig};
pub use service::OracleServiceImpl;
