//! The marquee component shell.
//!
//! [`Marquee`] ties the synchronous [`MeasurementCoordinator`] to the asynchronous host. The
//! embedding component calls [`Marquee::set_parameters`] when its inputs change,
//! [`Marquee::render`] to obtain the style strings, [`Marquee::after_render`] once the markup is
//! on screen, and [`Marquee::dispose`] when it is torn down.
//!
//! All state lives on one thread. Borrows of the interior cells are never held across an
//! `.await`: host handles are reference-counted and cloned out before a call is issued.

pub mod events;
pub mod guard;
mod lifecycle;
mod setup;

use crate::host::{
    CallbackTarget, DragHandle, EngineCallback, HostEnvironment, HostHandle, HostModule,
    MarqueeElements, ObserverHandle, RenderScheduler,
};
use crate::layout::{MeasurementCoordinator, ParameterUpdate, RenderedMarquee};
use crate::model::{IterationCount, MarqueeParams, MeasuredSpans, Multiplier, Orientation};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub use events::{AnimationEventBridge, MarqueeCallbacks, UserHandler};

/// Live layout observer and the axis it measures.
#[derive(Clone)]
struct ObserverSlot {
    handle: Rc<dyn ObserverHandle>,
    vertical: bool,
}

/// Live animation-event subscription and the bridge it feeds.
#[derive(Clone)]
struct AnimationSlot {
    handle: Rc<dyn HostHandle>,
    bridge: Rc<AnimationEventBridge>,
}

/// Installed drag handler and the orientation it was last given.
#[derive(Clone)]
struct DragSlot {
    handle: Rc<dyn DragHandle>,
    orientation: Orientation,
}

struct Inner {
    env: Rc<dyn HostEnvironment>,
    elements: MarqueeElements,
    scheduler: Rc<dyn RenderScheduler>,
    callbacks: MarqueeCallbacks,
    coordinator: RefCell<MeasurementCoordinator>,

    module: RefCell<Option<Rc<dyn HostModule>>>,
    observer: RefCell<Option<ObserverSlot>>,
    animation: RefCell<Option<AnimationSlot>>,
    drag: RefCell<Option<DragSlot>>,
    /// Serializes drag-handler setup, update and teardown.
    drag_guard: tokio::sync::Mutex<()>,

    callback: EngineCallback,
    cancel: CancellationToken,
    disposed: Cell<bool>,
    render_pending: Cell<bool>,
    mounted: Cell<bool>,
}

/// A marquee instance bound to one host and one pair of elements.
pub struct Marquee {
    inner: Rc<Inner>,
}

impl fmt::Debug for Marquee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = &self.inner;
        f.debug_struct("Marquee")
            .field("elements", &inner.elements)
            .field("params", inner.coordinator.borrow().params())
            .field("module", &inner.module.borrow().is_some())
            .field("observer", &inner.observer.borrow().is_some())
            .field("animation_events", &inner.animation.borrow().is_some())
            .field("drag", &inner.drag.borrow().is_some())
            .field("disposed", &inner.disposed.get())
            .finish()
    }
}

impl Marquee {
    /// Create an instance without user callbacks.
    pub fn new(
        env: Rc<dyn HostEnvironment>,
        elements: MarqueeElements,
        scheduler: Rc<dyn RenderScheduler>,
        params: MarqueeParams,
    ) -> Self {
        Self::with_callbacks(env, elements, scheduler, params, MarqueeCallbacks::default())
    }

    /// Create an instance with user callbacks.
    pub fn with_callbacks(
        env: Rc<dyn HostEnvironment>,
        elements: MarqueeElements,
        scheduler: Rc<dyn RenderScheduler>,
        params: MarqueeParams,
        callbacks: MarqueeCallbacks,
    ) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let target: Weak<dyn CallbackTarget> = weak.clone();
            Inner {
                env,
                elements,
                scheduler,
                callbacks,
                coordinator: RefCell::new(MeasurementCoordinator::new(params)),
                module: RefCell::new(None),
                observer: RefCell::new(None),
                animation: RefCell::new(None),
                drag: RefCell::new(None),
                drag_guard: tokio::sync::Mutex::new(()),
                callback: EngineCallback::new(target),
                cancel: CancellationToken::new(),
                disposed: Cell::new(false),
                render_pending: Cell::new(false),
                mounted: Cell::new(false),
            }
        });
        Self { inner }
    }

    /// Current parameters.
    pub fn params(&self) -> MarqueeParams {
        self.inner.coordinator.borrow().params().clone()
    }

    /// Apply a new parameter set.
    ///
    /// Runs the style diff pass and recomputes the multiplier if auto-fill was toggled. Host-side
    /// consequences (observer axis, drag handler) are applied by the next
    /// [`Marquee::after_render`].
    pub fn set_parameters(&self, params: MarqueeParams) -> ParameterUpdate {
        let update = self.inner.coordinator.borrow_mut().update_parameters(params);
        debug!(
            aspects = ?update.aspects,
            orientation_changed = update.orientation_changed,
            draggable_changed = update.draggable_changed,
            multiplier_changed = update.multiplier_changed,
            "parameters updated"
        );
        update
    }

    /// Produce the render output and clear the pending-render flag.
    pub fn render(&self) -> RenderedMarquee {
        self.inner.render_pending.set(false);
        self.inner.coordinator.borrow_mut().render()
    }

    /// Whether a render has been requested and not yet performed.
    pub fn render_pending(&self) -> bool {
        self.inner.render_pending.get()
    }

    /// Current multiplier.
    pub fn multiplier(&self) -> Multiplier {
        self.inner.coordinator.borrow().multiplier()
    }

    /// Current cycle duration in seconds.
    pub fn duration(&self) -> f64 {
        self.inner.coordinator.borrow().duration()
    }

    /// Whether [`Marquee::dispose`] has started.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Whether the first layout setup has completed.
    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    /// Whether a host module handle is held.
    pub fn has_module(&self) -> bool {
        self.inner.module.borrow().is_some()
    }

    /// Whether a layout observer is live.
    pub fn has_observer(&self) -> bool {
        self.inner.observer.borrow().is_some()
    }

    /// Whether animation signals are being forwarded.
    pub fn has_animation_events(&self) -> bool {
        self.inner.animation.borrow().is_some()
    }

    /// Whether a drag handler is installed.
    pub fn has_drag_handler(&self) -> bool {
        self.inner.drag.borrow().is_some()
    }

    /// The token the host calls back through.
    pub fn callback(&self) -> EngineCallback {
        self.inner.callback.clone()
    }

    /// Host-side work after the markup has been rendered.
    ///
    /// Imports the module, measures, and sets up or updates the observer, the animation-event
    /// subscription and the drag handler. Every failure is logged and retried on the next call.
    pub async fn after_render(&self, first_render: bool) {
        self.inner.after_render(first_render).await;
    }

    /// Tear everything down. Idempotent.
    ///
    /// Each host call is abandoned after two seconds. The bound does not use the runtime's
    /// timer, so any tokio runtime will do.
    pub async fn dispose(&self) {
        self.inner.dispose().await;
    }
}

impl Inner {
    /// Ask the host for a render unless one is already pending.
    fn request_render(&self) {
        if self.render_pending.replace(true) {
            return;
        }
        self.scheduler.request_render();
    }

    fn iteration_count(&self) -> IterationCount {
        IterationCount::from_loop_count(self.coordinator.borrow().params().loop_count)
    }

    fn bridge(&self) -> Option<Rc<AnimationEventBridge>> {
        self.animation
            .borrow()
            .as_ref()
            .map(|slot| Rc::clone(&slot.bridge))
    }
}

impl CallbackTarget for Inner {
    fn on_layout_changed(&self, container_span: f64, marquee_span: f64) {
        if self.disposed.get() {
            return;
        }
        let changed = self
            .coordinator
            .borrow_mut()
            .apply_measurement(MeasuredSpans::new(container_span, marquee_span));
        if changed {
            self.request_render();
        }
    }

    fn on_animation_iteration(&self) {
        if let Some(bridge) = self.bridge() {
            bridge.on_iteration();
        }
    }

    fn on_animation_end(&self) {
        let count = self.iteration_count();
        if let Some(bridge) = self.bridge() {
            bridge.on_end(count);
        }
    }
}
