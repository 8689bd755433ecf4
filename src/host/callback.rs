//! Back-reference token the host calls into the engine through.
//!
//! The host never holds the engine itself: it holds an [`EngineCallback`], which pairs a weak
//! pointer with a revocation flag shared by every clone. Disposal revokes the flag, and
//! dropping the engine breaks the weak pointer; either way later calls are dropped silently.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Receiver of host callbacks. Implemented by the engine.
pub trait CallbackTarget {
    /// Container or content changed size.
    fn on_layout_changed(&self, container_span: f64, marquee_span: f64);

    /// The CSS animation completed one iteration.
    fn on_animation_iteration(&self);

    /// The CSS animation finished.
    fn on_animation_end(&self);
}

/// Opaque, revocable back-reference handed to the host.
#[derive(Clone)]
pub struct EngineCallback {
    target: Weak<dyn CallbackTarget>,
    revoked: Rc<Cell<bool>>,
}

impl fmt::Debug for EngineCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineCallback")
            .field("live", &self.is_live())
            .finish()
    }
}

impl EngineCallback {
    /// Create a token for `target`.
    pub fn new(target: Weak<dyn CallbackTarget>) -> Self {
        Self {
            target,
            revoked: Rc::new(Cell::new(false)),
        }
    }

    /// Invalidate this token and every clone of it.
    pub fn revoke(&self) {
        self.revoked.set(true);
    }

    /// Whether calls still reach the engine.
    pub fn is_live(&self) -> bool {
        !self.revoked.get() && self.target.strong_count() > 0
    }

    fn target(&self) -> Option<Rc<dyn CallbackTarget>> {
        if self.revoked.get() {
            trace!("callback dropped: token revoked");
            return None;
        }
        self.target.upgrade()
    }

    /// Forward a layout change.
    pub fn on_layout_changed(&self, container_span: f64, marquee_span: f64) {
        if let Some(target) = self.target() {
            target.on_layout_changed(container_span, marquee_span);
        }
    }

    /// Forward an animation iteration.
    pub fn on_animation_iteration(&self) {
        if let Some(target) = self.target() {
            target.on_animation_iteration();
        }
    }

    /// Forward an animation end.
    pub fn on_animation_end(&self) {
        if let Some(target) = self.target() {
            target.on_animation_end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        layouts: Cell<u32>,
        iterations: Cell<u32>,
        ends: Cell<u32>,
    }

    impl CallbackTarget for Recorder {
        fn on_layout_changed(&self, _container_span: f64, _marquee_span: f64) {
            self.layouts.set(self.layouts.get() + 1);
        }
        fn on_animation_iteration(&self) {
            self.iterations.set(self.iterations.get() + 1);
        }
        fn on_animation_end(&self) {
            self.ends.set(self.ends.get() + 1);
        }
    }

    fn token_for(recorder: &Rc<Recorder>) -> EngineCallback {
        let weak: Weak<dyn CallbackTarget> = Rc::downgrade(recorder) as Weak<dyn CallbackTarget>;
        EngineCallback::new(weak)
    }

    #[test]
    fn live_token_forwards_calls() {
        let recorder = Rc::new(Recorder::default());
        let token = token_for(&recorder);
        token.on_layout_changed(1.0, 2.0);
        token.on_animation_iteration();
        token.on_animation_end();
        assert_eq!(recorder.layouts.get(), 1);
        assert_eq!(recorder.iterations.get(), 1);
        assert_eq!(recorder.ends.get(), 1);
    }

    #[test]
    fn revoking_one_clone_revokes_all() {
        let recorder = Rc::new(Recorder::default());
        let token = token_for(&recorder);
        let host_copy = token.clone();
        token.revoke();
        assert!(!host_copy.is_live());
        host_copy.on_layout_changed(1.0, 2.0);
        assert_eq!(recorder.layouts.get(), 0);
    }

    #[test]
    fn dropped_target_drops_calls() {
        let recorder = Rc::new(Recorder::default());
        let token = token_for(&recorder);
        drop(recorder);
        assert!(!token.is_live());
        token.on_animation_iteration();
    }
}
