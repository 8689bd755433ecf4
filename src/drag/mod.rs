//! Drag-to-scrub.
//!
//! Host-agnostic: hosts implement [`DragSurface`] around their elements and feed pointer events
//! into a [`DragController`].

pub mod controller;
pub mod pointer;

pub use controller::{wrap_time, DragController, DragPhase, DRAG_THRESHOLD};
pub use pointer::{DragSurface, EventResponse, PointerEvent, PointerId, ScrubbableAnimation};
