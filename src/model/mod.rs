//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod animation;
pub mod direction;
pub mod error;
pub mod params;
pub mod span;

// Re-export for convenience
pub use animation::{AnimationDirection, AnimationParameters, IterationCount, PlayState};
pub use direction::{Direction, InvalidDirection, Orientation};
pub use error::{CallbackError, EngineError, HostError};
pub use params::{GradientWidth, MarqueeParams};
pub use span::{MeasuredSpans, Multiplier, Span, SPAN_EPSILON};
