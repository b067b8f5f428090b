//! Test utilities for lambda-bridge
//!
//! Provides in-memory stand-ins for the AWS side of the adapter:
//! - A recording transport with scripted responses
//! - A client factory that counts how many clients it built
//! - A log capture for asserting on diagnostic output
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lambda_bridge_core::InvokeOutput;
//! use lambda_bridge_test::RecordingTransport;
//!
//! let transport = RecordingTransport::new();
//! transport.push_ok(InvokeOutput::success(r#"{"ok":true}"#));
//! ```

pub mod logs;
pub mod transport;

pub use logs::LogCapture;
pub use transport::{CountingFactory, RecordingTransport};
