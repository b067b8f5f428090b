//! Glue between `lambda_runtime` handlers and the binding lifecycle

use crate::event::{bind_event, TriggerEvent};
use lambda_bridge_core::{Error, ExecutionContext, RequestContext, Result};
use lambda_runtime::LambdaEvent;
use serde_json::Value;
use std::future::Future;
use tokio::sync::oneshot;
use tracing::debug;

/// Run `handler` on a context bound to a runtime event
///
/// The handler owns the context and is expected to [`dispatch`](crate::dispatch) (or
/// [`fail`](crate::fail)) it. Whatever reaches the gateway callback becomes the
/// return value: a dispatched `None` is returned as `null`. A handler error that
/// occurs before anything was dispatched is returned as is.
pub async fn handle_event<F, Fut>(event: LambdaEvent<Value>, handler: F) -> Result<Value>
where
    F: FnOnce(RequestContext) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let (payload, context) = event.into_parts();
    let execution = ExecutionContext::from(&context);

    let trigger = if payload.is_null() {
        None
    } else {
        Some(TriggerEvent::from_value(payload)?)
    };

    let (tx, rx) = oneshot::channel();
    let mut ctx = RequestContext::new();
    bind_event(&mut ctx, trigger.as_ref(), Some(execution), move |result| {
        let _ = tx.send(result);
    });
    debug!(
        request_id = %ctx.request_id,
        aws_request_id = %context.request_id,
        "Handling runtime event"
    );

    let outcome = handler(ctx).await;

    match rx.await {
        Ok(result) => result.map(|response| response.unwrap_or(Value::Null)),
        Err(_) => Err(outcome.err().unwrap_or(Error::ResponseDropped)),
    }
}
