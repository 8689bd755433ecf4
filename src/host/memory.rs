//! In-process host.
//!
//! A complete [`HostEnvironment`] backed by a table of simulated elements. Used by the
//! `marquee` binary and by tests: sizes are set directly, observers fire when sizes change
//! (or on a simulated window resize when native resize detection is switched off), animation
//! signals and pointer input are injected by the caller, and the connection can be dropped at
//! any point to exercise the engine's recovery paths.

use super::{
    DragHandle, ElementRef, EngineCallback, HostEnvironment, HostHandle, HostModule,
    MarqueeElements, ObserverHandle,
};
use crate::drag::{
    wrap_time, DragController, DragPhase, DragSurface, EventResponse, PointerEvent, PointerId,
    ScrubbableAnimation,
};
use crate::model::{HostError, MeasuredSpans, Orientation};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// Counts of every host call, for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostStats {
    /// `import_module` calls that succeeded.
    pub imports: u32,
    /// One-shot measurements served.
    pub measures: u32,
    /// Observers created.
    pub observers_created: u32,
    /// Observer axis updates.
    pub observer_updates: u32,
    /// Observer disposals (first disposal of each handle only).
    pub observers_disposed: u32,
    /// Animation-event subscriptions created.
    pub animation_setups: u32,
    /// Animation-event subscriptions disposed.
    pub animation_disposals: u32,
    /// Drag handlers installed.
    pub drag_setups: u32,
    /// Drag handler updates.
    pub drag_updates: u32,
    /// Drag handlers removed.
    pub drag_disposals: u32,
    /// Module releases.
    pub releases: u32,
    /// Layout callbacks delivered to the engine.
    pub layout_deliveries: u32,
}

/// Playback state of one simulated content block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockAnimation {
    /// Playback position in milliseconds.
    pub current_time: f64,
    /// Cycle length in milliseconds.
    pub cycle: f64,
    /// Whether the CSS animation is paused.
    pub paused: bool,
}

/// Shared handle to one block's animation.
#[derive(Debug, Clone)]
pub struct MemoryAnimation(Rc<RefCell<BlockAnimation>>);

impl ScrubbableAnimation for MemoryAnimation {
    fn current_time(&self) -> f64 {
        self.0.borrow().current_time
    }

    fn set_current_time(&mut self, time: f64) {
        self.0.borrow_mut().current_time = time;
    }

    fn cycle_duration(&self) -> f64 {
        self.0.borrow().cycle
    }
}

struct ObserverRecord {
    container: ElementRef,
    content: ElementRef,
    vertical: Rc<Cell<bool>>,
    callback: EngineCallback,
    disposed: Rc<Cell<bool>>,
}

struct AnimationSubscription {
    element: ElementRef,
    callback: EngineCallback,
    disposed: Rc<Cell<bool>>,
}

type SharedController = Rc<RefCell<DragController<MemorySurface>>>;

#[derive(Default)]
struct HostState {
    connected: Cell<bool>,
    native_resize: Cell<bool>,
    stall: Cell<bool>,
    next_id: Cell<u64>,
    sizes: RefCell<HashMap<ElementRef, (f64, f64)>>,
    observers: RefCell<Vec<ObserverRecord>>,
    subscriptions: RefCell<Vec<AnimationSubscription>>,
    blocks: RefCell<Vec<MemoryAnimation>>,
    drag: RefCell<Option<SharedController>>,
    captured: Cell<Option<PointerId>>,
    stats: RefCell<HostStats>,
}

impl HostState {
    fn check(&self) -> Result<(), HostError> {
        if self.connected.get() {
            Ok(())
        } else {
            Err(HostError::Disconnected)
        }
    }

    async fn round_trip(&self) -> Result<(), HostError> {
        self.check()?;
        if self.stall.get() {
            // Simulates a host that stopped answering.
            std::future::pending::<()>().await;
        }
        tokio::task::yield_now().await;
        self.check()
    }

    fn span(&self, element: ElementRef, vertical: bool) -> f64 {
        let sizes = self.sizes.borrow();
        let (width, height) = sizes.get(&element).copied().unwrap_or_default();
        if vertical {
            height
        } else {
            width
        }
    }

    fn bump(&self, update: impl FnOnce(&mut HostStats)) {
        update(&mut self.stats.borrow_mut());
    }

    /// Deliver current spans to every live observer matching `filter`.
    fn deliver(&self, filter: impl Fn(&ObserverRecord) -> bool) {
        let pending: Vec<(EngineCallback, MeasuredSpans)> = self
            .observers
            .borrow()
            .iter()
            .filter(|record| !record.disposed.get() && filter(record))
            .map(|record| {
                let vertical = record.vertical.get();
                (
                    record.callback.clone(),
                    MeasuredSpans::new(
                        self.span(record.container, vertical),
                        self.span(record.content, vertical),
                    ),
                )
            })
            .collect();

        for (callback, spans) in pending {
            trace!(
                container = spans.container.get(),
                content = spans.content.get(),
                "delivering layout change"
            );
            self.bump(|s| s.layout_deliveries += 1);
            callback.on_layout_changed(spans.container.get(), spans.content.get());
        }
    }
}

/// In-process host environment.
#[derive(Clone)]
pub struct MemoryHost {
    state: Rc<HostState>,
}

impl std::fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHost")
            .field("connected", &self.state.connected.get())
            .field("stats", &*self.state.stats.borrow())
            .finish()
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Connected host with native resize detection.
    pub fn new() -> Self {
        let state = HostState::default();
        state.connected.set(true);
        state.native_resize.set(true);
        Self {
            state: Rc::new(state),
        }
    }

    /// Host without native resize detection: observers only fire on
    /// [`MemoryHost::window_resize`].
    pub fn without_resize_observer() -> Self {
        let host = Self::new();
        host.state.native_resize.set(false);
        host
    }

    /// Create a container and a content element with the given sizes.
    pub fn create_marquee(&self, container: (f64, f64), content: (f64, f64)) -> MarqueeElements {
        MarqueeElements {
            container: self.create_element(container.0, container.1),
            content: self.create_element(content.0, content.1),
        }
    }

    /// Create an element.
    pub fn create_element(&self, width: f64, height: f64) -> ElementRef {
        let id = self.state.next_id.get() + 1;
        self.state.next_id.set(id);
        let element = ElementRef::new(id);
        self.state
            .sizes
            .borrow_mut()
            .insert(element, (width, height));
        element
    }

    /// Resize an element. With native resize detection, observers watching it fire.
    pub fn set_size(&self, element: ElementRef, width: f64, height: f64) {
        self.state
            .sizes
            .borrow_mut()
            .insert(element, (width, height));
        if self.state.native_resize.get() {
            self.state
                .deliver(|record| record.container == element || record.content == element);
        }
    }

    /// Simulate a window resize: every observer re-measures.
    pub fn window_resize(&self) {
        self.state.deliver(|_| true);
    }

    /// Drop the connection. Every later call fails with [`HostError::Disconnected`].
    pub fn disconnect(&self) {
        debug!("memory host disconnected");
        self.state.connected.set(false);
    }

    /// Restore the connection.
    pub fn reconnect(&self) {
        self.state.connected.set(true);
    }

    /// Make every later call hang until [`MemoryHost::resume`].
    pub fn stall(&self) {
        self.state.stall.set(true);
    }

    /// Undo [`MemoryHost::stall`] for calls issued afterwards.
    pub fn resume(&self) {
        self.state.stall.set(false);
    }

    /// Call counters.
    pub fn stats(&self) -> HostStats {
        *self.state.stats.borrow()
    }

    /// Number of observers not yet disposed.
    pub fn live_observers(&self) -> usize {
        self.state
            .observers
            .borrow()
            .iter()
            .filter(|r| !r.disposed.get())
            .count()
    }

    /// Axis of the most recent live observer.
    pub fn observer_vertical(&self) -> Option<bool> {
        self.state
            .observers
            .borrow()
            .iter()
            .rev()
            .find(|r| !r.disposed.get())
            .map(|r| r.vertical.get())
    }

    // ===== Animation simulation =====

    /// Replace the animated blocks: `count` blocks with the given cycle (ms), all at time 0.
    pub fn set_blocks(&self, count: usize, cycle_ms: f64) {
        *self.state.blocks.borrow_mut() = (0..count)
            .map(|_| {
                MemoryAnimation(Rc::new(RefCell::new(BlockAnimation {
                    current_time: 0.0,
                    cycle: cycle_ms,
                    paused: false,
                })))
            })
            .collect();
    }

    /// Snapshot of every block's playback state.
    pub fn blocks(&self) -> Vec<BlockAnimation> {
        self.state
            .blocks
            .borrow()
            .iter()
            .map(|b| *b.0.borrow())
            .collect()
    }

    /// Advance every running block by `ms`, wrapping at the cycle.
    pub fn advance(&self, ms: f64) {
        for block in self.state.blocks.borrow().iter() {
            let mut block = block.0.borrow_mut();
            if !block.paused && block.cycle > 0.0 {
                block.current_time = wrap_time(block.current_time + ms, block.cycle);
            }
        }
    }

    /// Fire the animation-iteration signal on `element`.
    pub fn fire_iteration(&self, element: ElementRef) {
        for callback in self.subscribers(element) {
            callback.on_animation_iteration();
        }
    }

    /// Fire the animation-end signal on `element`.
    pub fn fire_end(&self, element: ElementRef) {
        for callback in self.subscribers(element) {
            callback.on_animation_end();
        }
    }

    fn subscribers(&self, element: ElementRef) -> Vec<EngineCallback> {
        self.state
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.element == element && !s.disposed.get())
            .map(|s| s.callback.clone())
            .collect()
    }

    // ===== Pointer input =====

    /// Whether a drag handler is installed.
    pub fn has_drag_handler(&self) -> bool {
        self.state.drag.borrow().is_some()
    }

    /// Phase of the installed drag handler.
    pub fn drag_phase(&self) -> Option<DragPhase> {
        self.controller().map(|c| c.borrow().phase())
    }

    /// Orientation of the installed drag handler.
    pub fn drag_orientation(&self) -> Option<Orientation> {
        self.controller().map(|c| c.borrow().orientation())
    }

    /// Pointer currently captured by the container.
    pub fn captured_pointer(&self) -> Option<PointerId> {
        self.state.captured.get()
    }

    /// Dispatch a pointer-down.
    pub fn pointer_down(&self, event: PointerEvent) -> EventResponse {
        self.with_controller(|c| c.pointer_down(event))
    }

    /// Dispatch a pointer-move.
    pub fn pointer_move(&self, event: PointerEvent) -> EventResponse {
        self.with_controller(|c| c.pointer_move(event))
    }

    /// Dispatch a pointer-up.
    pub fn pointer_up(&self, event: PointerEvent) -> EventResponse {
        self.with_controller(|c| c.pointer_up(event))
    }

    /// Dispatch a pointer-cancel.
    pub fn pointer_cancel(&self, event: PointerEvent) -> EventResponse {
        self.with_controller(|c| c.pointer_cancel(event))
    }

    /// Dispatch a click. Returns whether it reached the content.
    pub fn click(&self) -> bool {
        self.with_controller(|c| c.click_capture()) != EventResponse::Cancel
    }

    fn controller(&self) -> Option<SharedController> {
        self.state.drag.borrow().clone()
    }

    fn with_controller(
        &self,
        f: impl FnOnce(&mut DragController<MemorySurface>) -> EventResponse,
    ) -> EventResponse {
        match self.controller() {
            Some(controller) => f(&mut controller.borrow_mut()),
            None => EventResponse::Continue,
        }
    }
}

#[async_trait(?Send)]
impl HostEnvironment for MemoryHost {
    async fn import_module(&self) -> Result<Rc<dyn HostModule>, HostError> {
        self.state.round_trip().await?;
        self.state.bump(|s| s.imports += 1);
        Ok(Rc::new(MemoryModule {
            state: Rc::clone(&self.state),
        }))
    }
}

/// Module handle served by [`MemoryHost`].
struct MemoryModule {
    state: Rc<HostState>,
}

#[async_trait(?Send)]
impl HostModule for MemoryModule {
    async fn measure(
        &self,
        container: ElementRef,
        content: ElementRef,
        vertical: bool,
    ) -> Result<MeasuredSpans, HostError> {
        self.state.round_trip().await?;
        self.state.bump(|s| s.measures += 1);
        Ok(MeasuredSpans::new(
            self.state.span(container, vertical),
            self.state.span(content, vertical),
        ))
    }

    async fn observe(
        &self,
        container: ElementRef,
        content: ElementRef,
        vertical: bool,
        callback: EngineCallback,
    ) -> Result<Box<dyn ObserverHandle>, HostError> {
        self.state.round_trip().await?;
        let vertical = Rc::new(Cell::new(vertical));
        let disposed = Rc::new(Cell::new(false));
        self.state.observers.borrow_mut().push(ObserverRecord {
            container,
            content,
            vertical: Rc::clone(&vertical),
            callback,
            disposed: Rc::clone(&disposed),
        });
        self.state.bump(|s| s.observers_created += 1);
        Ok(Box::new(MemoryObserver {
            state: Rc::clone(&self.state),
            vertical,
            disposed,
        }))
    }

    async fn setup_animation_events(
        &self,
        element: ElementRef,
        callback: EngineCallback,
    ) -> Result<Box<dyn HostHandle>, HostError> {
        self.state.round_trip().await?;
        let disposed = Rc::new(Cell::new(false));
        self.state
            .subscriptions
            .borrow_mut()
            .push(AnimationSubscription {
                element,
                callback,
                disposed: Rc::clone(&disposed),
            });
        self.state.bump(|s| s.animation_setups += 1);
        Ok(Box::new(MemorySubscription {
            state: Rc::clone(&self.state),
            disposed,
        }))
    }

    async fn setup_drag_handler(
        &self,
        _container: ElementRef,
        element: ElementRef,
        vertical: bool,
        reversed: bool,
    ) -> Result<Box<dyn DragHandle>, HostError> {
        self.state.round_trip().await?;
        let surface = MemorySurface {
            state: Rc::clone(&self.state),
            content: element,
        };
        let controller = Rc::new(RefCell::new(DragController::new(
            surface,
            Orientation { vertical, reversed },
        )));
        *self.state.drag.borrow_mut() = Some(Rc::clone(&controller));
        self.state.bump(|s| s.drag_setups += 1);
        Ok(Box::new(MemoryDragHandle {
            state: Rc::clone(&self.state),
            controller,
        }))
    }

    async fn release(&self) -> Result<(), HostError> {
        self.state.bump(|s| s.releases += 1);
        self.state.check()
    }
}

struct MemoryObserver {
    state: Rc<HostState>,
    vertical: Rc<Cell<bool>>,
    disposed: Rc<Cell<bool>>,
}

#[async_trait(?Send)]
impl ObserverHandle for MemoryObserver {
    async fn update(&self, vertical: bool) -> Result<(), HostError> {
        if self.disposed.get() {
            return Err(HostError::Disposed);
        }
        self.state.round_trip().await?;
        self.vertical.set(vertical);
        self.state.bump(|s| s.observer_updates += 1);
        Ok(())
    }

    async fn dispose(&self) -> Result<(), HostError> {
        if self.disposed.replace(true) {
            return Ok(());
        }
        self.state
            .observers
            .borrow_mut()
            .retain(|record| !Rc::ptr_eq(&record.disposed, &self.disposed));
        self.state.bump(|s| s.observers_disposed += 1);
        self.state.check()
    }
}

struct MemorySubscription {
    state: Rc<HostState>,
    disposed: Rc<Cell<bool>>,
}

#[async_trait(?Send)]
impl HostHandle for MemorySubscription {
    async fn dispose(&self) -> Result<(), HostError> {
        if self.disposed.replace(true) {
            return Ok(());
        }
        self.state
            .subscriptions
            .borrow_mut()
            .retain(|subscription| !Rc::ptr_eq(&subscription.disposed, &self.disposed));
        self.state.bump(|s| s.animation_disposals += 1);
        self.state.check()
    }
}

struct MemoryDragHandle {
    state: Rc<HostState>,
    controller: SharedController,
}

#[async_trait(?Send)]
impl DragHandle for MemoryDragHandle {
    async fn update(&self, vertical: bool, reversed: bool) -> Result<(), HostError> {
        if self.controller.borrow().is_disposed() {
            return Err(HostError::Disposed);
        }
        self.state.round_trip().await?;
        self.controller
            .borrow_mut()
            .update(Orientation { vertical, reversed });
        self.state.bump(|s| s.drag_updates += 1);
        Ok(())
    }

    async fn dispose(&self) -> Result<(), HostError> {
        if self.controller.borrow().is_disposed() {
            return Ok(());
        }
        self.controller.borrow_mut().dispose();
        let mut installed = self.state.drag.borrow_mut();
        if installed
            .as_ref()
            .is_some_and(|c| Rc::ptr_eq(c, &self.controller))
        {
            *installed = None;
        }
        drop(installed);
        self.state.bump(|s| s.drag_disposals += 1);
        self.state.check()
    }
}

/// [`DragSurface`] over the simulated blocks.
pub struct MemorySurface {
    state: Rc<HostState>,
    content: ElementRef,
}

impl DragSurface for MemorySurface {
    type Animation = MemoryAnimation;

    fn capture_pointer(&mut self, pointer: PointerId) {
        self.state.captured.set(Some(pointer));
    }

    fn release_pointer(&mut self, pointer: PointerId) {
        if self.state.captured.get() == Some(pointer) {
            self.state.captured.set(None);
        }
    }

    fn set_paused(&mut self, paused: bool) {
        for block in self.state.blocks.borrow().iter() {
            block.0.borrow_mut().paused = paused;
        }
    }

    fn block_animations(&mut self) -> Vec<MemoryAnimation> {
        self.state.blocks.borrow().clone()
    }

    fn content_span(&self, vertical: bool) -> f64 {
        self.state.span(self.content, vertical)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
