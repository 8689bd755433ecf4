//! Host environment contract.
//!
//! The host is the external runtime that owns the real elements: it measures them, watches
//! them for size changes, reports animation signals, and routes pointer input. Every call into
//! it is an asynchronous round-trip that may fail or never resolve if the host disconnects.
//!
//! The engine imports a [`HostModule`] once per instance through [`HostEnvironment`] and keeps
//! the handles it hands out. The host calls back into the engine only through the opaque
//! [`EngineCallback`] token.

pub mod callback;
pub mod memory;

use crate::model::{HostError, MeasuredSpans};
use async_trait::async_trait;
use std::rc::Rc;

pub use callback::{CallbackTarget, EngineCallback};
pub use memory::MemoryHost;

/// Opaque reference to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(u64);

impl ElementRef {
    /// Wrap a host-assigned id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Host-assigned id.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// The two elements the engine works with, supplied by the template layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarqueeElements {
    /// The fixed-size viewport.
    pub container: ElementRef,
    /// The first scrolling content block.
    pub content: ElementRef,
}

/// Entry point into the host: imports the module the engine talks to.
#[async_trait(?Send)]
pub trait HostEnvironment {
    /// Import the marquee host module.
    async fn import_module(&self) -> Result<Rc<dyn HostModule>, HostError>;
}

/// Host-side operations, one instance per engine.
#[async_trait(?Send)]
pub trait HostModule {
    /// Measure both elements once along the given axis.
    async fn measure(
        &self,
        container: ElementRef,
        content: ElementRef,
        vertical: bool,
    ) -> Result<MeasuredSpans, HostError>;

    /// Start watching both elements for size changes.
    ///
    /// Changes are reported through [`EngineCallback::on_layout_changed`].
    async fn observe(
        &self,
        container: ElementRef,
        content: ElementRef,
        vertical: bool,
        callback: EngineCallback,
    ) -> Result<Box<dyn ObserverHandle>, HostError>;

    /// Forward animation iteration/end signals of `element` to the callback.
    async fn setup_animation_events(
        &self,
        element: ElementRef,
        callback: EngineCallback,
    ) -> Result<Box<dyn HostHandle>, HostError>;

    /// Install pointer handling that scrubs the animation of `element`'s blocks.
    async fn setup_drag_handler(
        &self,
        container: ElementRef,
        element: ElementRef,
        vertical: bool,
        reversed: bool,
    ) -> Result<Box<dyn DragHandle>, HostError>;

    /// Release the module handle itself.
    async fn release(&self) -> Result<(), HostError>;
}

/// Handle with only a teardown.
#[async_trait(?Send)]
pub trait HostHandle {
    /// Tear down. Safe to call more than once.
    async fn dispose(&self) -> Result<(), HostError>;
}

/// Handle of a layout observer.
#[async_trait(?Send)]
pub trait ObserverHandle {
    /// Switch the measurement axis without recreating the observer.
    async fn update(&self, vertical: bool) -> Result<(), HostError>;

    /// Stop observing. Safe to call more than once.
    async fn dispose(&self) -> Result<(), HostError>;
}

/// Handle of an installed drag handler.
#[async_trait(?Send)]
pub trait DragHandle {
    /// Change axis or polarity.
    async fn update(&self, vertical: bool, reversed: bool) -> Result<(), HostError>;

    /// Remove the pointer handling. Safe to call more than once.
    async fn dispose(&self) -> Result<(), HostError>;
}

/// The host's "schedule a render" primitive.
///
/// Requests made before the render runs collapse into one.
pub trait RenderScheduler {
    /// Ask the host to render the component on its next tick.
    fn request_render(&self);
}
