//! Trigger event binding
//!
//! Normalizes an inbound API Gateway / authorizer event into a [`RequestContext`].

use lambda_bridge_core::{
    Auth, ExecutionContext, GatewayResult, RequestContext, RequestSlot, Result,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Fields of the trigger event the adapter reads; everything else is ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerEvent {
    /// Token presented to a custom authorizer
    pub authorization_token: Option<String>,
    /// ARN of the method being authorized
    pub method_arn: Option<String>,
    pub request_context: Option<EventRequestContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequestContext {
    pub authorizer: Option<AuthorizerContext>,
}

/// Context returned by the upstream authorizer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerContext {
    /// JSON document the authorizer flattened to a string
    pub string_key: Option<String>,
}

impl TriggerEvent {
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    fn custom_data(&self) -> Option<&str> {
        self.request_context
            .as_ref()?
            .authorizer
            .as_ref()?
            .string_key
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

/// Bind a trigger event to `ctx`
///
/// Always resets auth, request and response, locks cleanup and installs `callback` as
/// the gateway response. Auth fields are only filled when `event` is present and
/// carries them.
pub fn bind_event<F>(
    ctx: &mut RequestContext,
    event: Option<&TriggerEvent>,
    execution: Option<ExecutionContext>,
    callback: F,
) where
    F: FnOnce(GatewayResult) + Send + 'static,
{
    ctx.auth = Auth::default();
    ctx.request = RequestSlot::Bound(Map::new());
    ctx.response = Map::new();
    ctx.execution = execution;
    ctx.install_responder(callback);

    let Some(event) = event else {
        debug!(request_id = %ctx.request_id, "Bound context without trigger event");
        return;
    };

    if let Some(token) = non_empty(event.authorization_token.as_deref()) {
        ctx.auth.token = Some(token.to_string());
    }
    if let Some(method_arn) = non_empty(event.method_arn.as_deref()) {
        ctx.auth.method_id = Some(method_arn.to_string());
    }

    if let Some(raw) = event.custom_data() {
        match serde_json::from_str::<Value>(raw) {
            Ok(data) => ctx.auth.custom_data = Some(data),
            Err(err) => {
                warn!(
                    request_id = %ctx.request_id,
                    error = %err,
                    "Ignoring authorizer context that is not valid JSON"
                );
            }
        }
    }

    debug!(
        request_id = %ctx.request_id,
        has_token = ctx.auth.token.is_some(),
        has_method = ctx.auth.method_id.is_some(),
        has_custom_data = ctx.auth.custom_data.is_some(),
        "Bound trigger event"
    );
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noop(_: GatewayResult) {}

    #[test]
    fn test_bind_without_event() {
        let mut ctx = RequestContext::new();
        ctx.auth.token = Some("stale".to_string());
        ctx.response.insert("stale".to_string(), json!(true));

        bind_event(&mut ctx, None, None, noop);

        assert_eq!(ctx.auth, Auth::default());
        assert_eq!(ctx.request, RequestSlot::Bound(Map::new()));
        assert!(ctx.response.is_empty());
        assert!(ctx.cleanup_locked());
    }

    #[test]
    fn test_bind_copies_token_and_method() {
        let event = TriggerEvent {
            authorization_token: Some("abc".to_string()),
            method_arn: Some("arn:1".to_string()),
            ..Default::default()
        };
        let mut ctx = RequestContext::new();

        bind_event(&mut ctx, Some(&event), None, noop);

        assert_eq!(ctx.auth.token.as_deref(), Some("abc"));
        assert_eq!(ctx.auth.method_id.as_deref(), Some("arn:1"));
        assert!(ctx.auth.custom_data.is_none());
    }

    #[test]
    fn test_empty_fields_are_left_unset() {
        let event = TriggerEvent::from_value(json!({
            "authorizationToken": "",
            "methodArn": "",
            "requestContext": { "authorizer": { "stringKey": "" } }
        }))
        .unwrap();
        let mut ctx = RequestContext::new();

        bind_event(&mut ctx, Some(&event), None, noop);

        assert_eq!(ctx.auth, Auth::default());
    }

    #[test]
    fn test_custom_data_is_parsed() {
        let event = TriggerEvent::from_value(json!({
            "authorizationToken": "T",
            "requestContext": { "authorizer": { "stringKey": "{\"k\":1}" } }
        }))
        .unwrap();
        let mut ctx = RequestContext::new();

        bind_event(&mut ctx, Some(&event), None, noop);

        assert_eq!(ctx.auth.token.as_deref(), Some("T"));
        assert_eq!(ctx.auth.custom_data, Some(json!({ "k": 1 })));
    }

    #[test]
    fn test_invalid_custom_data_is_ignored() {
        let event = TriggerEvent::from_value(json!({
            "requestContext": { "authorizer": { "stringKey": "{not json" } }
        }))
        .unwrap();
        let mut ctx = RequestContext::new();

        bind_event(&mut ctx, Some(&event), None, noop);

        assert!(ctx.auth.custom_data.is_none());
    }

    #[test]
    fn test_unknown_event_fields_are_ignored() {
        let event = TriggerEvent::from_value(json!({
            "type": "TOKEN",
            "methodArn": "arn:aws:execute-api:us-east-1:123456789012:abc/prod/GET/",
            "requestContext": { "stage": "prod", "authorizer": { "principalId": "user" } }
        }))
        .unwrap();

        assert_eq!(
            event.method_arn.as_deref(),
            Some("arn:aws:execute-api:us-east-1:123456789012:abc/prod/GET/")
        );
        assert!(event.custom_data().is_none());
    }

    #[test]
    fn test_execution_context_is_stored() {
        let execution = ExecutionContext {
            aws_request_id: "req-1".to_string(),
            function_name: "api".to_string(),
            ..Default::default()
        };
        let mut ctx = RequestContext::new();

        bind_event(&mut ctx, None, Some(execution.clone()), noop);

        assert_eq!(ctx.execution, Some(execution));
    }
}
