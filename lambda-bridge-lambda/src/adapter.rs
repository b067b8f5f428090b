//! Lambda invocation adapter

use crate::client::AwsClientFactory;
use bytes::Bytes;
use lambda_bridge_core::{
    ClientFactory, Error, InvocationType, InvokeRequest, LambdaConfig, LambdaTransport,
    RequestContext, Result,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

const INVOKE_LABEL: &str = "AWS invoke lambda";
const LOADER_LABEL: &str = "AWS Lambda Loader";

/// Invokes Lambda functions on behalf of a request context
///
/// Holds the configuration snapshot and the factory used to create the per-context
/// client. Cheap to clone; clones share both.
#[derive(Clone)]
pub struct LambdaAdapter {
    config: Arc<LambdaConfig>,
    factory: Arc<dyn ClientFactory>,
}

impl LambdaAdapter {
    /// Adapter building SDK clients without a shared AWS config
    ///
    /// Requires static credentials (`key` and `secret`) in `config`; use
    /// [`from_env`](Self::from_env) to fall back to the default credential chain.
    pub fn new(config: LambdaConfig) -> Self {
        Self::with_factory(config, Arc::new(AwsClientFactory::new()))
    }

    /// Adapter whose clients fall back to the default AWS credential chain
    pub async fn from_env(config: LambdaConfig) -> Self {
        Self::with_factory(config, Arc::new(AwsClientFactory::from_env().await))
    }

    pub fn with_factory(config: LambdaConfig, factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            config: Arc::new(config),
            factory,
        }
    }

    /// Return the context's client, creating it on first use
    pub fn ensure_client(&self, ctx: &mut RequestContext) -> Arc<dyn LambdaTransport> {
        if let Some(client) = &ctx.lambda {
            return client.clone();
        }

        audit_timing(ctx, "Init-Start", LOADER_LABEL);
        let client = self.factory.build(&self.config);
        ctx.lambda = Some(client.clone());
        audit_timing(ctx, "Init-End", LOADER_LABEL);

        client
    }

    /// Invoke `function_name` with `args` as its event
    ///
    /// Fire-and-forget unless `synchronous` is set. A synchronous call resolves to the
    /// parsed response payload, or `None` when the function returned nothing usable.
    /// Failures are reported on the diagnostic channel before being returned.
    pub async fn invoke<T>(
        &self,
        ctx: &mut RequestContext,
        function_name: &str,
        args: &T,
        synchronous: bool,
    ) -> Result<Option<Value>>
    where
        T: Serialize + ?Sized,
    {
        let client = self.ensure_client(ctx);

        let payload = serde_json::to_string_pretty(args)?;
        let request = InvokeRequest::new(
            function_name,
            payload,
            InvocationType::from_synchronous(synchronous),
        );

        audit_timing(ctx, "Start", INVOKE_LABEL);
        let output = match client.invoke(&request).await {
            Ok(output) => output,
            Err(err) => {
                report_failure(&err, &request);
                return Err(err);
            }
        };
        audit_timing(ctx, "End", INVOKE_LABEL);

        if let Some(kind) = output.function_error {
            let err = Error::FunctionError {
                function_name: function_name.to_string(),
                kind,
                message: error_message(output.payload.as_ref()),
            };
            report_failure(&err, &request);
            return Err(err);
        }

        Ok(parse_payload(function_name, output.payload))
    }

    /// [`invoke`](Self::invoke), handing the outcome to `callback`
    pub async fn invoke_then<T, F, R>(
        &self,
        ctx: &mut RequestContext,
        callback: F,
        function_name: &str,
        args: &T,
        synchronous: bool,
    ) -> R
    where
        T: Serialize + ?Sized,
        F: FnOnce(Result<Option<Value>>) -> R,
    {
        callback(self.invoke(ctx, function_name, args, synchronous).await)
    }
}

fn audit_timing(ctx: &RequestContext, stage: &str, label: &str) {
    debug!(
        request_id = %ctx.request_id,
        stage,
        label,
        elapsed_ms = ctx.elapsed_ms(),
        "Timing audit"
    );
}

/// Structured report of a failed invocation, with the params needed to replay it
fn report_failure(err: &Error, request: &InvokeRequest) {
    let params = serde_json::to_string(request).unwrap_or_default();
    error!(
        error = %err,
        kind = err.kind(),
        cause = "AWS Lambda",
        cmd = "Invoke Lambda",
        function_name = %request.function_name,
        params = %params,
        "Lambda invocation failed"
    );
}

/// Empty, `null` and non-JSON payloads all mean "no response"
fn parse_payload(function_name: &str, payload: Option<Bytes>) -> Option<Value> {
    let payload = payload.filter(|p| !p.is_empty())?;

    match serde_json::from_slice::<Value>(&payload) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                function_name = %function_name,
                error = %err,
                "Discarding non-JSON response payload"
            );
            None
        }
    }
}

fn error_message(payload: Option<&Bytes>) -> Option<String> {
    let value: Value = serde_json::from_slice(payload?).ok()?;
    value
        .get("errorMessage")
        .and_then(Value::as_str)
        .map(str::to_string)
}
