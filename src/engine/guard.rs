//! Cancellation guard around host round-trips.

use crate::model::{EngineError, HostError};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Issue a host call unless disposal already happened, and abandon it if disposal happens
/// while it is in flight.
///
/// Results that resolve after disposal are returned as-is: callers that receive a handle must
/// check for disposal themselves and tear the orphan down.
pub async fn guarded_call<T, F>(
    cancel: &CancellationToken,
    what: &'static str,
    call: F,
) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, HostError>>,
{
    if cancel.is_cancelled() {
        debug!(call = what, "skipping host call: engine disposed");
        return Err(EngineError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(call = what, "host call abandoned: engine disposed");
            Err(EngineError::Cancelled)
        }
        result = call => result.map_err(EngineError::from),
    }
}

/// [`guarded_call`] for plain values: a result that arrives after disposal is discarded.
pub async fn guarded_value<T, F>(
    cancel: &CancellationToken,
    what: &'static str,
    call: F,
) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, HostError>>,
{
    let value = guarded_call(cancel, what, call).await?;
    if cancel.is_cancelled() {
        debug!(call = what, "discarding host result: engine disposed");
        return Err(EngineError::Cancelled);
    }
    Ok(value)
}
