//! Pointer input types and the surface the drag controller drives.

/// Platform pointer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub i32);

/// A pointer event in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Which pointer.
    pub pointer: PointerId,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl PointerEvent {
    /// Build an event.
    pub fn new(pointer: PointerId, x: f64, y: f64) -> Self {
        Self { pointer, x, y }
    }

    /// Coordinate along the scroll axis.
    pub fn along(&self, vertical: bool) -> f64 {
        if vertical {
            self.y
        } else {
            self.x
        }
    }
}

/// What the platform should do with the event after the controller saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// Let default behavior run.
    Continue,
    /// Prevent default scrolling and text selection.
    PreventDefault,
    /// Cancel the event outright: prevent default and stop propagation.
    Cancel,
}

/// A live animation on one duplicated content block.
///
/// Times are in milliseconds, as the platform animation API reports them.
pub trait ScrubbableAnimation {
    /// Current playback position.
    fn current_time(&self) -> f64;

    /// Jump to a playback position.
    fn set_current_time(&mut self, time: f64);

    /// Length of one cycle.
    fn cycle_duration(&self) -> f64;
}

/// The elements the drag controller manipulates.
///
/// Implemented by the host around its real container and content blocks. The controller never
/// queries it on every move event: animation handles and the content span are captured once
/// when a drag starts.
pub trait DragSurface {
    /// Animation handle type of one block.
    type Animation: ScrubbableAnimation;

    /// Route all further events of `pointer` to the container.
    fn capture_pointer(&mut self, pointer: PointerId);

    /// Undo [`DragSurface::capture_pointer`].
    fn release_pointer(&mut self, pointer: PointerId);

    /// Pause or resume the CSS animation on every content block.
    fn set_paused(&mut self, paused: bool);

    /// Current animation handle of every content block.
    fn block_animations(&mut self) -> Vec<Self::Animation>;

    /// Span of one content block along the given axis.
    fn content_span(&self, vertical: bool) -> f64;
}
