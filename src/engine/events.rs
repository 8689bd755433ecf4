//! User callbacks and the animation event bridge.

use crate::model::{CallbackError, EngineError, IterationCount};
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use tracing::{trace, warn};

/// A user-registered callback. Errors and panics are caught and discarded.
pub type UserHandler = Rc<dyn Fn() -> Result<(), CallbackError>>;

/// Callbacks the embedding component may register.
#[derive(Clone, Default)]
pub struct MarqueeCallbacks {
    /// Called after every completed animation cycle.
    pub on_cycle_complete: Option<UserHandler>,
    /// Called when a finite loop count has been played out.
    pub on_finish: Option<UserHandler>,
    /// Called once after the first successful layout setup.
    pub on_mount: Option<UserHandler>,
}

impl fmt::Debug for MarqueeCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarqueeCallbacks")
            .field("on_cycle_complete", &self.on_cycle_complete.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .field("on_mount", &self.on_mount.is_some())
            .finish()
    }
}

impl MarqueeCallbacks {
    /// Register the cycle-complete callback.
    pub fn on_cycle_complete(
        mut self,
        handler: impl Fn() -> Result<(), CallbackError> + 'static,
    ) -> Self {
        self.on_cycle_complete = Some(Rc::new(handler));
        self
    }

    /// Register the finish callback.
    pub fn on_finish(mut self, handler: impl Fn() -> Result<(), CallbackError> + 'static) -> Self {
        self.on_finish = Some(Rc::new(handler));
        self
    }

    /// Register the mount callback.
    pub fn on_mount(mut self, handler: impl Fn() -> Result<(), CallbackError> + 'static) -> Self {
        self.on_mount = Some(Rc::new(handler));
        self
    }

    /// Whether animation signals need to be forwarded at all.
    pub fn wants_animation_events(&self) -> bool {
        self.on_cycle_complete.is_some() || self.on_finish.is_some()
    }
}

/// Run a user handler, converting errors and panics into a logged [`EngineError`].
pub fn invoke_user_handler(name: &'static str, handler: &UserHandler) -> Result<(), EngineError> {
    let outcome = catch_unwind(AssertUnwindSafe(|| handler()));
    let reason = match outcome {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(err)) => err.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };
    let err = EngineError::CallbackFault {
        callback: name,
        reason,
    };
    warn!(error = %err, "user callback failed; ignoring");
    Err(err)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

/// Forwards host animation signals to user callbacks.
///
/// Pure forwarding: apart from the disposed flag it keeps no state. A finished signal is
/// forwarded only for a finite loop count; an infinite animation never finishes.
#[derive(Debug)]
pub struct AnimationEventBridge {
    callbacks: MarqueeCallbacks,
    disposed: Cell<bool>,
}

impl AnimationEventBridge {
    /// Bridge to the given callbacks.
    pub fn new(callbacks: MarqueeCallbacks) -> Self {
        Self {
            callbacks,
            disposed: Cell::new(false),
        }
    }

    /// One animation iteration completed.
    pub fn on_iteration(&self) {
        if self.disposed.get() {
            return;
        }
        if let Some(handler) = &self.callbacks.on_cycle_complete {
            trace!("forwarding animation iteration");
            let _ = invoke_user_handler("on_cycle_complete", handler);
        }
    }

    /// The animation ended.
    pub fn on_end(&self, iteration_count: IterationCount) {
        if self.disposed.get() || !iteration_count.is_finite() {
            return;
        }
        if let Some(handler) = &self.callbacks.on_finish {
            trace!("forwarding animation end");
            let _ = invoke_user_handler("on_finish", handler);
        }
    }

    /// Stop forwarding. Idempotent.
    pub fn dispose(&self) {
        self.disposed.set(true);
    }

    /// Whether [`AnimationEventBridge::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(counter: &Rc<Cell<u32>>) -> impl Fn() -> Result<(), CallbackError> + 'static {
        let counter = Rc::clone(counter);
        move || {
            counter.set(counter.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn iteration_is_forwarded() {
        let cycles = Rc::new(Cell::new(0));
        let bridge = AnimationEventBridge::new(
            MarqueeCallbacks::default().on_cycle_complete(counting(&cycles)),
        );
        bridge.on_iteration();
        bridge.on_iteration();
        assert_eq!(cycles.get(), 2);
    }

    #[test]
    fn finite_loop_end_is_forwarded() {
        let finished = Rc::new(Cell::new(0));
        let bridge =
            AnimationEventBridge::new(MarqueeCallbacks::default().on_finish(counting(&finished)));
        bridge.on_end(IterationCount::from_loop_count(2));
        assert_eq!(finished.get(), 1);
    }

    #[test]
    fn infinite_loop_never_finishes() {
        let cycles = Rc::new(Cell::new(0));
        let finished = Rc::new(Cell::new(0));
        let bridge = AnimationEventBridge::new(
            MarqueeCallbacks::default()
                .on_cycle_complete(counting(&cycles))
                .on_finish(counting(&finished)),
        );
        for _ in 0..50 {
            bridge.on_iteration();
        }
        // Even a stray end signal is not forwarded for an infinite loop.
        bridge.on_end(IterationCount::Infinite);
        assert_eq!(cycles.get(), 50);
        assert_eq!(finished.get(), 0);
    }

    #[test]
    fn failing_handler_is_swallowed() {
        let bridge = AnimationEventBridge::new(
            MarqueeCallbacks::default().on_cycle_complete(|| Err("handler broke".into())),
        );
        bridge.on_iteration();
        bridge.on_iteration();
    }

    #[test]
    fn panicking_handler_is_swallowed() {
        let handler: UserHandler =
            Rc::new(|| -> Result<(), CallbackError> { panic!("user code panicked") });
        let err = invoke_user_handler("on_finish", &handler).unwrap_err();
        assert!(matches!(
            err,
            EngineError::CallbackFault {
                callback: "on_finish",
                ..
            }
        ));
        assert!(err.to_string().contains("user code panicked"));
    }

    #[test]
    fn disposed_bridge_forwards_nothing() {
        let cycles = Rc::new(Cell::new(0));
        let bridge = AnimationEventBridge::new(
            MarqueeCallbacks::default().on_cycle_complete(counting(&cycles)),
        );
        bridge.dispose();
        bridge.dispose();
        bridge.on_iteration();
        assert!(bridge.is_disposed());
        assert_eq!(cycles.get(), 0);
    }

    #[test]
    fn wants_animation_events_only_with_handlers() {
        assert!(!MarqueeCallbacks::default().wants_animation_events());
        assert!(!MarqueeCallbacks::default()
            .on_mount(|| Ok(()))
            .wants_animation_events());
        assert!(MarqueeCallbacks::default()
            .on_finish(|| Ok(()))
            .wants_animation_events());
    }
}
