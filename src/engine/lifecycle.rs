//! Disposal coordination.
//!
//! Teardown order: flip the disposed flag and cancel in-flight calls, revoke the callback
//! token, then dispose the observer, the animation-event subscription and the drag handler,
//! and finally release the module. Each slot is cleared before its handle's own teardown runs,
//! and every step is attempted even if an earlier one failed.
//!
//! The per-call bound is measured by a short-lived watchdog thread rather than the runtime's
//! timer, so teardown works on runtimes built without `enable_time`.

use super::Inner;
use crate::model::HostError;
use std::future::Future;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Upper bound on a single teardown call; a host that stopped answering must not block
/// disposal.
pub(crate) const TEARDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Fires once its bound elapses, unless dropped first.
struct Deadline {
    expired: CancellationToken,
    // Dropping the sender wakes the watchdog, which then exits without firing.
    _finished: mpsc::Sender<()>,
}

impl Deadline {
    fn start(bound: Duration) -> Option<Self> {
        let expired = CancellationToken::new();
        let fire = expired.clone();
        let (finished, wait) = mpsc::channel::<()>();
        let spawned = thread::Builder::new()
            .name("marquee-teardown".to_string())
            .spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = wait.recv_timeout(bound) {
                    fire.cancel();
                }
            });
        match spawned {
            Ok(_) => Some(Self {
                expired,
                _finished: finished,
            }),
            Err(err) => {
                warn!(error = %err, "no teardown watchdog; call is unbounded");
                None
            }
        }
    }
}

/// Run one teardown call, logging instead of propagating its failure.
pub(super) async fn teardown<F>(what: &'static str, call: F)
where
    F: Future<Output = Result<(), HostError>>,
{
    teardown_within(what, call, TEARDOWN_TIMEOUT).await;
}

async fn teardown_within<F>(what: &'static str, call: F, bound: Duration)
where
    F: Future<Output = Result<(), HostError>>,
{
    let outcome = match Deadline::start(bound) {
        Some(deadline) => tokio::select! {
            biased;
            result = call => Some(result),
            _ = deadline.expired.cancelled() => None,
        },
        None => Some(call.await),
    };
    match outcome {
        Some(Ok(())) => trace!(handle = what, "disposed"),
        Some(Err(HostError::Disconnected | HostError::Disposed)) => {
            debug!(handle = what, "host already gone during teardown")
        }
        Some(Err(err)) => warn!(handle = what, error = %err, "teardown failed"),
        None => warn!(handle = what, "teardown timed out"),
    }
}

impl Inner {
    pub(super) async fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        info!("disposing marquee");
        self.cancel.cancel();
        self.callback.revoke();
        self.release_handles().await;
        debug!("marquee disposed");
    }

    /// Tear down every handle and then the module, clearing each slot first.
    ///
    /// Also used when the host connection is lost: the handles belong to the lost module and
    /// are recreated against the next one.
    pub(super) async fn release_handles(&self) {
        let observer = self.observer.borrow_mut().take();
        if let Some(slot) = observer {
            teardown("observer", slot.handle.dispose()).await;
        }

        let animation = self.animation.borrow_mut().take();
        if let Some(slot) = animation {
            slot.bridge.dispose();
            teardown("animation events", slot.handle.dispose()).await;
        }

        {
            // Waits for an in-flight drag setup to observe the cancellation.
            let _guard = self.drag_guard.lock().await;
            let drag = self.drag.borrow_mut().take();
            if let Some(slot) = drag {
                teardown("drag handler", slot.handle.dispose()).await;
            }
        }

        let module = self.module.borrow_mut().take();
        if let Some(module) = module {
            teardown("module", module.release()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Instant;

    fn timerless_runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
    }

    #[test]
    fn silent_call_is_abandoned_without_runtime_timer() {
        let started = Instant::now();
        timerless_runtime().block_on(teardown_within(
            "observer",
            std::future::pending::<Result<(), HostError>>(),
            Duration::from_millis(50),
        ));
        assert!(started.elapsed() < TEARDOWN_TIMEOUT);
    }

    #[test]
    fn prompt_call_finishes_without_waiting_for_bound() {
        let ran = Cell::new(false);
        let started = Instant::now();
        timerless_runtime().block_on(teardown_within(
            "module",
            async {
                ran.set(true);
                Err(HostError::Disconnected)
            },
            Duration::from_secs(30),
        ));
        assert!(ran.get());
        assert!(started.elapsed() < Duration::from_secs(30));
    }
}
