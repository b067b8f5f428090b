//! Transport seam between the invocation adapter and the Lambda service

use crate::config::LambdaConfig;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;

/// Invocation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InvocationType {
    /// Synchronous invocation (wait for response)
    RequestResponse,
    /// Asynchronous invocation (fire and forget)
    Event,
}

impl InvocationType {
    pub fn from_synchronous(synchronous: bool) -> Self {
        if synchronous {
            Self::RequestResponse
        } else {
            Self::Event
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestResponse => "RequestResponse",
            Self::Event => "Event",
        }
    }
}

/// Execution log returned with the response; the adapter never asks for one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LogType {
    #[default]
    None,
}

/// Outbound `Invoke` request, serialized with the service's field names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvokeRequest {
    /// Name, partial ARN or full ARN of the target function
    pub function_name: String,
    /// JSON document handed to the function as its event
    pub payload: String,
    pub log_type: LogType,
    pub invocation_type: InvocationType,
}

impl InvokeRequest {
    pub fn new(
        function_name: impl Into<String>,
        payload: impl Into<String>,
        invocation_type: InvocationType,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            payload: payload.into(),
            log_type: LogType::None,
            invocation_type,
        }
    }
}

/// Service response to an `Invoke` call
#[derive(Debug, Clone, Default)]
pub struct InvokeOutput {
    pub status_code: i32,
    pub payload: Option<Bytes>,
    /// `Handled` or `Unhandled` when the function itself failed
    pub function_error: Option<String>,
    pub executed_version: Option<String>,
}

impl InvokeOutput {
    /// 202 Accepted, as returned for `Event` invocations
    pub fn accepted() -> Self {
        Self {
            status_code: 202,
            ..Default::default()
        }
    }

    /// 200 with a payload, as returned for `RequestResponse` invocations
    pub fn success(payload: impl Into<Bytes>) -> Self {
        Self {
            status_code: 200,
            payload: Some(payload.into()),
            executed_version: Some("$LATEST".to_string()),
            ..Default::default()
        }
    }
}

/// Sends invocation requests to the Lambda service
#[async_trait]
pub trait LambdaTransport: Send + Sync {
    async fn invoke(&self, request: &InvokeRequest) -> Result<InvokeOutput>;
}

/// Builds a transport from a configuration snapshot
pub trait ClientFactory: Send + Sync {
    fn build(&self, config: &LambdaConfig) -> Arc<dyn LambdaTransport>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_with_service_names() {
        let request = InvokeRequest::new("my-function", "{}", InvocationType::Event);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["FunctionName"], "my-function");
        assert_eq!(json["Payload"], "{}");
        assert_eq!(json["LogType"], "None");
        assert_eq!(json["InvocationType"], "Event");
    }

    #[test]
    fn test_invocation_type_from_flag() {
        assert_eq!(InvocationType::from_synchronous(false), InvocationType::Event);
        assert_eq!(
            InvocationType::from_synchronous(true),
            InvocationType::RequestResponse
        );
        assert_eq!(InvocationType::Event.as_str(), "Event");
        assert_eq!(InvocationType::RequestResponse.as_str(), "RequestResponse");
    }
}
