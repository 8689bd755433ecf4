//! Pointer-gesture state machine that scrubs the marquee animation.
//!
//! `Idle -> Armed` on pointer down, `Armed -> Dragging` once the pointer has moved more than
//! [`DRAG_THRESHOLD`] along the scroll axis, back to `Idle` on pointer up or cancel. A gesture
//! that never leaves `Armed` is a plain click and is left alone.

use super::pointer::{DragSurface, EventResponse, PointerEvent, PointerId, ScrubbableAnimation};
use crate::model::Orientation;
use std::fmt;
use tracing::{debug, trace};

/// Movement (in pixels, along the scroll axis) that turns a press into a drag.
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Observable phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// No pointer tracked.
    Idle,
    /// Pointer down, threshold not yet exceeded.
    Armed,
    /// Scrubbing.
    Dragging,
}

struct BlockSnapshot<A> {
    animation: A,
    cycle: f64,
}

enum Gesture<A> {
    Idle,
    Armed {
        pointer: PointerId,
        start: f64,
    },
    Dragging {
        pointer: PointerId,
        last: f64,
        content_span: f64,
        blocks: Vec<BlockSnapshot<A>>,
    },
}

/// Drag-to-scrub controller over a [`DragSurface`].
pub struct DragController<S: DragSurface> {
    surface: S,
    orientation: Orientation,
    gesture: Gesture<S::Animation>,
    suppress_click: bool,
    disposed: bool,
}

impl<S: DragSurface> fmt::Debug for DragController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragController")
            .field("phase", &self.phase())
            .field("orientation", &self.orientation)
            .field("suppress_click", &self.suppress_click)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl<S: DragSurface> DragController<S> {
    /// Create an idle controller.
    pub fn new(surface: S, orientation: Orientation) -> Self {
        Self {
            surface,
            orientation,
            gesture: Gesture::Idle,
            suppress_click: false,
            disposed: false,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        match self.gesture {
            Gesture::Idle => DragPhase::Idle,
            Gesture::Armed { .. } => DragPhase::Armed,
            Gesture::Dragging { .. } => DragPhase::Dragging,
        }
    }

    /// Whether the next click will be cancelled.
    pub fn suppresses_next_click(&self) -> bool {
        self.suppress_click
    }

    /// Current axis/polarity.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The surface being driven.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether [`DragController::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Pointer pressed on the container.
    pub fn pointer_down(&mut self, event: PointerEvent) -> EventResponse {
        if self.disposed || !matches!(self.gesture, Gesture::Idle) {
            return EventResponse::Continue;
        }
        // A new press starts fresh; a stale flag must not eat a genuine click.
        self.suppress_click = false;
        self.surface.capture_pointer(event.pointer);
        self.gesture = Gesture::Armed {
            pointer: event.pointer,
            start: event.along(self.orientation.vertical),
        };
        EventResponse::Continue
    }

    /// Pointer moved.
    pub fn pointer_move(&mut self, event: PointerEvent) -> EventResponse {
        if self.disposed {
            return EventResponse::Continue;
        }
        let position = event.along(self.orientation.vertical);

        match &mut self.gesture {
            Gesture::Idle => EventResponse::Continue,
            Gesture::Armed { pointer, start } => {
                if *pointer != event.pointer {
                    return EventResponse::Continue;
                }
                if (position - *start).abs() <= DRAG_THRESHOLD {
                    return EventResponse::Continue;
                }
                let pointer = *pointer;
                self.begin_drag(pointer, position);
                EventResponse::PreventDefault
            }
            Gesture::Dragging {
                pointer,
                last,
                content_span,
                blocks,
            } => {
                if *pointer != event.pointer {
                    return EventResponse::Continue;
                }
                let mut delta = position - *last;
                *last = position;
                if self.orientation.reversed {
                    delta = -delta;
                }
                scrub(blocks, delta, *content_span);
                EventResponse::PreventDefault
            }
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self, event: PointerEvent) -> EventResponse {
        self.finish(event.pointer)
    }

    /// Pointer cancelled by the platform.
    pub fn pointer_cancel(&mut self, event: PointerEvent) -> EventResponse {
        self.finish(event.pointer)
    }

    /// Capture-phase click handler.
    ///
    /// Cancels exactly one click after a drag, so content under the pointer does not also
    /// receive a click when the drag ends.
    pub fn click_capture(&mut self) -> EventResponse {
        if self.suppress_click {
            self.suppress_click = false;
            trace!("click suppressed after drag");
            EventResponse::Cancel
        } else {
            EventResponse::Continue
        }
    }

    /// Change axis or polarity.
    ///
    /// An active gesture is force-ended first, so no move event mixes the two axes.
    pub fn update(&mut self, orientation: Orientation) {
        if orientation == self.orientation {
            return;
        }
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Armed { pointer, .. } => {
                self.surface.release_pointer(pointer);
                self.gesture = Gesture::Idle;
            }
            Gesture::Dragging { pointer, .. } => {
                debug!("orientation changed mid-drag; ending gesture");
                self.end_drag(pointer);
            }
        }
        self.orientation = orientation;
    }

    /// Detach: resume any paused animation and stop reacting to input. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Armed { pointer, .. } => self.surface.release_pointer(pointer),
            Gesture::Dragging { pointer, .. } => self.end_drag(pointer),
        }
        self.gesture = Gesture::Idle;
        self.suppress_click = false;
        self.disposed = true;
    }

    fn begin_drag(&mut self, pointer: PointerId, position: f64) {
        self.surface.set_paused(true);
        self.suppress_click = true;
        let content_span = self.surface.content_span(self.orientation.vertical);
        let blocks = self
            .surface
            .block_animations()
            .into_iter()
            .map(|animation| {
                let cycle = animation.cycle_duration();
                BlockSnapshot { animation, cycle }
            })
            .collect::<Vec<_>>();
        debug!(
            blocks = blocks.len(),
            content_span, "drag threshold exceeded; scrubbing"
        );
        self.gesture = Gesture::Dragging {
            pointer,
            last: position,
            content_span,
            blocks,
        };
    }

    fn finish(&mut self, released: PointerId) -> EventResponse {
        match self.gesture {
            Gesture::Armed { pointer, .. } if pointer == released => {
                self.surface.release_pointer(pointer);
                self.gesture = Gesture::Idle;
            }
            Gesture::Dragging { pointer, .. } if pointer == released => {
                self.end_drag(pointer);
            }
            _ => {}
        }
        EventResponse::Continue
    }

    fn end_drag(&mut self, pointer: PointerId) {
        self.surface.set_paused(false);
        self.surface.release_pointer(pointer);
        self.gesture = Gesture::Idle;
    }
}

/// Move every block's playback time back by `delta / content_span` of its cycle, wrapped into
/// `[0, cycle)`.
fn scrub<A: ScrubbableAnimation>(blocks: &mut [BlockSnapshot<A>], delta: f64, content_span: f64) {
    if !(content_span.is_finite() && content_span > 0.0) || !delta.is_finite() {
        return;
    }
    let fraction = delta / content_span;
    for block in blocks {
        if !(block.cycle.is_finite() && block.cycle > 0.0) {
            continue;
        }
        let current = block.animation.current_time();
        if !current.is_finite() {
            continue;
        }
        block
            .animation
            .set_current_time(wrap_time(current - fraction * block.cycle, block.cycle));
    }
}

/// Wrap `time` into `[0, cycle)`.
pub fn wrap_time(time: f64, cycle: f64) -> f64 {
    let wrapped = time.rem_euclid(cycle);
    // rem_euclid can round up to exactly `cycle` for tiny negative inputs.
    if wrapped >= cycle {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
