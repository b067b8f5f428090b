//! Core types and traits for lambda-bridge
//!
//! This crate provides the configuration snapshot, the per-request context and the
//! transport seam shared by the adapter crates.

pub mod config;
pub mod context;
pub mod error;
pub mod transport;

pub use config::{ConfigOverrides, LambdaConfig};
pub use context::{
    Auth, ExecutionContext, GatewayResult, PendingResponse, RequestContext, RequestSlot,
    ResponseCallback,
};
pub use error::{Error, Result};
pub use transport::{
    ClientFactory, InvocationType, InvokeOutput, InvokeRequest, LambdaTransport, LogType,
};
