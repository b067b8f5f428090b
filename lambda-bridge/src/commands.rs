//! Subcommand implementations

use anyhow::Context;
use lambda_bridge_core::{LambdaConfig, RequestContext};
use lambda_bridge_lambda::{
    bind_event, dispatch, handle_event, is_bound_instance, LambdaAdapter, TriggerEvent,
};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::{json, Value};
use tokio::io::AsyncReadExt;
use tokio::sync::oneshot;
use tracing::info;

/// Invoke `function_name` from a context that is not event-bound
pub async fn invoke(
    config: LambdaConfig,
    function_name: &str,
    payload: &str,
    sync: bool,
) -> anyhow::Result<Value> {
    let args: Value = serde_json::from_str(payload).context("--payload is not valid JSON")?;

    let adapter = LambdaAdapter::from_env(config).await;
    let mut ctx = RequestContext::disabled();

    let response = adapter.invoke(&mut ctx, function_name, &args, sync).await?;
    info!(
        function_name,
        sync,
        has_payload = response.is_some(),
        elapsed_ms = ctx.elapsed_ms(),
        "Invocation finished"
    );

    Ok(response.unwrap_or(Value::Null))
}

/// Bind the event read from `source` and return what the gateway callback receives
pub async fn bind(source: &str) -> anyhow::Result<Value> {
    let raw = if source == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read event from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("failed to read event file {source}"))?
    };

    let value: Value = serde_json::from_str(&raw).context("event is not valid JSON")?;
    let event = if value.is_null() {
        None
    } else {
        Some(TriggerEvent::from_value(value)?)
    };

    let (tx, rx) = oneshot::channel();
    let mut ctx = RequestContext::new();
    bind_event(&mut ctx, event.as_ref(), None, move |result| {
        let _ = tx.send(result);
    });

    let response = auth_summary(&ctx)?;
    dispatch(&mut ctx, Some(response))?;

    let returned = rx.await.context("gateway callback dropped")??;
    Ok(returned.unwrap_or(Value::Null))
}

/// Answer runtime events with the same summary `bind` prints
pub async fn serve() -> anyhow::Result<()> {
    info!("Serving Lambda runtime events");
    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| async move {
        handle_event(event, |mut ctx| async move {
            let response = auth_summary(&ctx)?;
            dispatch(&mut ctx, Some(response))
        })
        .await
        .map_err(lambda_runtime::Error::from)
    }))
    .await
    .map_err(|err| anyhow::anyhow!(err))
}

fn auth_summary(ctx: &RequestContext) -> serde_json::Result<Value> {
    Ok(json!({
        "request_id": ctx.request_id,
        "bound": is_bound_instance(ctx),
        "auth": serde_json::to_value(&ctx.auth)?,
    }))
}
