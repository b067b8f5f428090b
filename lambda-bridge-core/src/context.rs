//! Per-request context
//!
//! A [`RequestContext`] is created by the caller for every request it handles. The
//! event-binding adapter fills its auth/request/response parts, the invocation adapter
//! caches its Lambda client on it, and the response dispatcher consumes its one-shot
//! gateway callback.

use crate::error::{Error, Result};
use crate::transport::LambdaTransport;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;
use uuid::Uuid;

/// What the gateway callback receives
pub type GatewayResult = Result<Option<Value>>;

pub type ResponseCallback = Box<dyn FnOnce(GatewayResult) + Send>;

/// Authorization data extracted from the trigger event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Auth {
    /// Authorization token (authorizer invocations only)
    pub token: Option<String>,
    /// Method ARN the authorization is performed for
    pub method_id: Option<String>,
    /// Data cached by the API Gateway authorizer, already parsed
    pub custom_data: Option<Value>,
}

/// Request data slot
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestSlot {
    /// Not bound yet
    #[default]
    Unset,
    /// Deliberately not event-bound, e.g. running outside Lambda
    Disabled,
    Bound(Map<String, Value>),
}

/// Lambda execution metadata for the current invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub aws_request_id: String,
    pub invoked_function_arn: String,
    pub function_name: String,
    pub deadline_ms: i64,
}

impl From<&lambda_runtime::Context> for ExecutionContext {
    fn from(context: &lambda_runtime::Context) -> Self {
        Self {
            aws_request_id: context.request_id.clone(),
            invoked_function_arn: context.invoked_function_arn.clone(),
            function_name: context.env_config.function_name.clone(),
            deadline_ms: i64::try_from(context.deadline).unwrap_or(i64::MAX),
        }
    }
}

impl ExecutionContext {
    /// Get remaining time in milliseconds
    pub fn remaining_time_millis(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        (self.deadline_ms - now).max(0)
    }
}

/// One-shot gateway response slot
pub enum PendingResponse {
    Pending(ResponseCallback),
    Sent,
}

impl PendingResponse {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(GatewayResult) + Send + 'static,
    {
        Self::Pending(Box::new(callback))
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }

    /// Hand `result` to the callback; fails if it was already consumed
    pub fn send(&mut self, result: GatewayResult) -> Result<()> {
        match std::mem::replace(self, Self::Sent) {
            Self::Pending(callback) => {
                callback(result);
                Ok(())
            }
            Self::Sent => Err(Error::ResponseAlreadySent),
        }
    }
}

impl fmt::Debug for PendingResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending(_) => f.write_str("Pending"),
            Self::Sent => f.write_str("Sent"),
        }
    }
}

/// Mutable state threaded through a single request
pub struct RequestContext {
    pub request_id: String,
    pub started: Instant,
    pub auth: Auth,
    pub request: RequestSlot,
    pub response: Map<String, Value>,
    pub execution: Option<ExecutionContext>,
    /// Lambda client, created on first invocation
    pub lambda: Option<Arc<dyn LambdaTransport>>,
    cleanup_locked: bool,
    gateway: Option<PendingResponse>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            started: Instant::now(),
            auth: Auth::default(),
            request: RequestSlot::Unset,
            response: Map::new(),
            execution: None,
            lambda: None,
            cleanup_locked: false,
            gateway: None,
        }
    }

    /// Context for code running outside a trigger environment
    pub fn disabled() -> Self {
        Self {
            request: RequestSlot::Disabled,
            ..Self::new()
        }
    }

    /// Milliseconds since the context was created
    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    /// True while a bound response has not been sent
    pub fn cleanup_locked(&self) -> bool {
        self.cleanup_locked
    }

    pub fn response_sent(&self) -> bool {
        self.gateway.as_ref().is_some_and(PendingResponse::is_sent)
    }

    /// Install a fresh gateway callback and lock cleanup until it runs
    ///
    /// A callback still pending from an earlier binding receives
    /// [`Error::ResponseSuperseded`] instead of being dropped.
    pub fn install_responder<F>(&mut self, callback: F)
    where
        F: FnOnce(GatewayResult) + Send + 'static,
    {
        let previous = self.gateway.replace(PendingResponse::new(callback));
        self.cleanup_locked = true;

        if let Some(mut previous) = previous.filter(|p| !p.is_sent()) {
            warn!(
                request_id = %self.request_id,
                "Rebinding context with an unsent gateway response"
            );
            let _ = previous.send(Err(Error::ResponseSuperseded));
        }
    }

    /// Consume the gateway callback and unlock cleanup
    pub fn send_response(&mut self, result: GatewayResult) -> Result<()> {
        let gateway = self.gateway.as_mut().ok_or(Error::ResponderMissing)?;
        gateway.send(result)?;
        self.cleanup_locked = false;
        Ok(())
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("auth", &self.auth)
            .field("request", &self.request)
            .field("response", &self.response)
            .field("execution", &self.execution)
            .field("lambda", &self.lambda.as_ref().map(|_| "initialized"))
            .field("cleanup_locked", &self.cleanup_locked)
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}
