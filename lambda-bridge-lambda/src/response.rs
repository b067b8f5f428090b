//! Gateway response dispatch

use lambda_bridge_core::{Error, GatewayResult, RequestContext, RequestSlot, Result};
use serde_json::Value;
use tracing::{debug, error};

/// Return `response` to the caller that triggered this context
///
/// Must follow [`bind_event`](crate::bind_event) on the same context, and may run only
/// once per binding. Misuse is logged and returned as an error.
pub fn dispatch(ctx: &mut RequestContext, response: Option<Value>) -> Result<()> {
    send(ctx, Ok(response))
}

/// Return an error to the caller instead of a response
pub fn fail(ctx: &mut RequestContext, err: Error) -> Result<()> {
    send(ctx, Err(err))
}

/// Whether `ctx` was bound to a trigger event
pub fn is_bound_instance(ctx: &RequestContext) -> bool {
    matches!(ctx.request, RequestSlot::Bound(_))
}

fn send(ctx: &mut RequestContext, result: GatewayResult) -> Result<()> {
    let is_error = result.is_err();
    match ctx.send_response(result) {
        Ok(()) => {
            debug!(
                request_id = %ctx.request_id,
                is_error,
                elapsed_ms = ctx.elapsed_ms(),
                "Returned gateway response"
            );
            Ok(())
        }
        Err(err) => {
            error!(
                request_id = %ctx.request_id,
                error = %err,
                "Gateway response could not be returned"
            );
            Err(err)
        }
    }
}
