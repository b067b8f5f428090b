//! Lambda adapters for lambda-bridge
//!
//! Invokes other functions through the AWS SDK and binds inbound trigger events to a
//! [`RequestContext`](lambda_bridge_core::RequestContext).

pub mod adapter;
pub mod client;
pub mod event;
pub mod response;
pub mod runtime;

pub use adapter::LambdaAdapter;
pub use client::{AwsClientFactory, AwsLambdaTransport};
pub use event::{bind_event, AuthorizerContext, EventRequestContext, TriggerEvent};
pub use response::{dispatch, fail, is_bound_instance};
pub use runtime::handle_event;
