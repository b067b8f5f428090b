//! End-to-end tests for the Lambda adapters
//!
//! These tests drive a full request lifecycle against an in-memory transport:
//! bind a trigger event, invoke other functions, then dispatch the response.

use std::sync::Arc;

use lambda_bridge_core::{
    ConfigOverrides, Error, InvocationType, InvokeOutput, LambdaConfig, RequestContext,
};
use lambda_bridge_lambda::{bind_event, dispatch, is_bound_instance, LambdaAdapter, TriggerEvent};
use lambda_bridge_test::{CountingFactory, LogCapture, RecordingTransport};
use serde_json::{json, Value};
use tokio::sync::oneshot;

fn test_adapter() -> (LambdaAdapter, Arc<RecordingTransport>, Arc<CountingFactory>) {
    let transport = Arc::new(RecordingTransport::new());
    let factory = Arc::new(CountingFactory::new(transport.clone()));
    let config = LambdaConfig::default().merge(ConfigOverrides {
        region: Some("us-east-2".to_string()),
        max_retries: Some(2),
        ..Default::default()
    });
    (
        LambdaAdapter::with_factory(config, factory.clone()),
        transport,
        factory,
    )
}

#[tokio::test]
async fn test_authorizer_request_lifecycle() {
    let (adapter, transport, factory) = test_adapter();
    transport.push_ok(InvokeOutput::success(r#"{"allowed":true}"#));

    let event = TriggerEvent::from_value(json!({
        "authorizationToken": "T",
        "methodArn": "arn:aws:execute-api:us-east-2:123456789012:api/prod/GET/items",
        "requestContext": { "authorizer": { "stringKey": "{\"k\":1}" } }
    }))
    .unwrap();

    let (tx, rx) = oneshot::channel();
    let mut ctx = RequestContext::new();
    bind_event(&mut ctx, Some(&event), None, move |result| {
        let _ = tx.send(result);
    });

    assert!(is_bound_instance(&ctx));
    assert_eq!(ctx.auth.custom_data, Some(json!({ "k": 1 })));

    // Application logic: ask a policy function, then a fire-and-forget audit.
    let policy_args = json!({ "token": ctx.auth.token.clone() });
    let verdict = adapter
        .invoke(&mut ctx, "policy-check", &policy_args, true)
        .await
        .unwrap();
    adapter
        .invoke(&mut ctx, "audit-log", &json!({ "verdict": verdict.clone() }), false)
        .await
        .unwrap();

    assert_eq!(factory.builds(), 1);
    assert_eq!(factory.last_config().unwrap().region, "us-east-2");

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].invocation_type, InvocationType::RequestResponse);
    assert_eq!(requests[1].invocation_type, InvocationType::Event);
    let sent: Value = serde_json::from_str(&requests[0].payload).unwrap();
    assert_eq!(sent, json!({ "token": "T" }));

    dispatch(&mut ctx, verdict).unwrap();
    assert!(!ctx.cleanup_locked());

    let returned = rx.await.unwrap().unwrap();
    assert_eq!(returned, Some(json!({ "allowed": true })));
}

#[tokio::test]
async fn test_failed_invocation_does_not_touch_response() {
    let (adapter, transport, _) = test_adapter();
    transport.push_err(Error::transport(
        Some("ResourceNotFoundException"),
        "Function not found: missing",
    ));
    let logs = LogCapture::new();
    let _guard = logs.set_default();

    let (tx, rx) = oneshot::channel();
    let mut ctx = RequestContext::new();
    bind_event(&mut ctx, None, None, move |result| {
        let _ = tx.send(result);
    });

    let err = adapter
        .invoke(&mut ctx, "missing", &json!({ "id": 7 }), true)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert!(ctx.cleanup_locked());

    let reports = logs.lines_containing("Lambda invocation failed");
    assert_eq!(reports.len(), 1);
    assert!(reports[0].contains("missing"));
    assert!(reports[0].contains("ResourceNotFoundException"));

    dispatch(&mut ctx, Some(json!({ "error": err.to_string() }))).unwrap();
    let returned = rx.await.unwrap().unwrap().unwrap();
    assert_eq!(returned["error"], "ResourceNotFoundException: Function not found: missing");
}

#[tokio::test]
async fn test_disabled_context_still_invokes() {
    let (adapter, transport, _) = test_adapter();
    let mut ctx = RequestContext::disabled();

    let result = adapter
        .invoke(&mut ctx, "nightly-job", &json!({}), false)
        .await
        .unwrap();

    assert_eq!(result, None);
    assert!(!is_bound_instance(&ctx));
    assert_eq!(transport.requests().len(), 1);
    assert!(matches!(
        dispatch(&mut ctx, None),
        Err(Error::ResponderMissing)
    ));
}
