//! Duration and multiplier calculations.
//!
//! Apparent scroll speed (pixels per second) stays constant regardless of the auto-fill
//! multiplier or of how content and container spans compare.

use crate::model::{Multiplier, Span};

/// Content duplicates needed to cover the container.
///
/// `max(1, ceil(container / content))` when auto-fill is on and content has been measured,
/// otherwise 1.
pub fn compute_multiplier(container: Span, content: Span, auto_fill: bool) -> Multiplier {
    if !auto_fill || content.is_zero() {
        return Multiplier::ONE;
    }
    let ratio = (container.get() / content.get()).ceil();
    // Float-to-int casts saturate, so absurd ratios clamp to u32::MAX.
    Multiplier::new(ratio as u32)
}

/// Animation cycle duration in seconds.
///
/// Zero until content has been measured. With auto-fill the travel distance is the full
/// duplicated length; without it, content shorter than its container travels the container's
/// span so the loop does not visibly jump.
pub fn compute_duration(
    container: Span,
    content: Span,
    multiplier: Multiplier,
    auto_fill: bool,
    effective_speed: f64,
) -> f64 {
    if content.is_zero() {
        return 0.0;
    }
    let speed = effective_speed.max(1.0);
    let distance = if auto_fill {
        content.get() * f64::from(multiplier.get())
    } else if content.get() < container.get() {
        container.get()
    } else {
        content.get()
    };
    distance / speed
}
