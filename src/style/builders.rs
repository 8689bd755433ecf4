//! Pure builders for each style aspect.
//!
//! Each aspect has a borrowed input struct naming exactly the parameters it reads. The cache
//! compares previous and current inputs to decide which aspects to rebuild, so an input struct
//! is also the aspect's dependency list.

use crate::model::{AnimationParameters, Direction, GradientWidth, MarqueeParams};
use std::fmt::Write;

use super::format::format_seconds;

/// Base class of the container element.
pub const CONTAINER_CLASS: &str = "marquee-container";

/// Class added while dragging is enabled.
pub const DRAGGABLE_CLASS: &str = "marquee-draggable";

/// Inputs of the class aspect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassInputs<'a> {
    /// Caller class names.
    pub class_name: &'a str,
    /// Dragging enabled.
    pub draggable: bool,
}

impl<'a> ClassInputs<'a> {
    /// Extract from parameters.
    pub fn of(params: &'a MarqueeParams) -> Self {
        Self {
            class_name: &params.class_name,
            draggable: params.draggable,
        }
    }
}

/// Inputs of the container-style aspect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerInputs<'a> {
    /// Animation running.
    pub play: bool,
    /// Pause on hover.
    pub pause_on_hover: bool,
    /// Pause on click.
    pub pause_on_click: bool,
    /// Travel direction.
    pub direction: Direction,
    /// Caller inline style.
    pub style: &'a str,
}

impl<'a> ContainerInputs<'a> {
    /// Extract from parameters.
    pub fn of(params: &'a MarqueeParams) -> Self {
        Self {
            play: params.play,
            pause_on_hover: params.pause_on_hover,
            pause_on_click: params.pause_on_click,
            direction: params.direction,
            style: &params.style,
        }
    }
}

/// Inputs of the gradient-style aspect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientInputs<'a> {
    /// Overlay color.
    pub color: &'a str,
    /// Overlay width.
    pub width: &'a GradientWidth,
}

impl<'a> GradientInputs<'a> {
    /// Extract from parameters.
    pub fn of(params: &'a MarqueeParams) -> Self {
        Self {
            color: &params.gradient_color,
            width: &params.gradient_width,
        }
    }
}

/// Parameter inputs of the animation-style aspect.
///
/// Measured spans also feed this aspect; the coordinator invalidates it directly when they
/// change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationInputs {
    /// Animation running.
    pub play: bool,
    /// Travel direction.
    pub direction: Direction,
    /// Configured speed (raw, before the `>= 1` guard).
    pub speed: f64,
    /// Start delay.
    pub delay: f64,
    /// Loop count.
    pub loop_count: u32,
    /// Auto-fill enabled.
    pub auto_fill: bool,
}

impl AnimationInputs {
    /// Extract from parameters.
    pub fn of(params: &MarqueeParams) -> Self {
        Self {
            play: params.play,
            direction: params.direction,
            speed: params.speed,
            delay: params.delay,
            loop_count: params.loop_count,
            auto_fill: params.auto_fill,
        }
    }
}

/// Inputs of the content-style aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentInputs {
    /// Travel direction.
    pub direction: Direction,
}

impl ContentInputs {
    /// Extract from parameters.
    pub fn of(params: &MarqueeParams) -> Self {
        Self {
            direction: params.direction,
        }
    }
}

fn push_var(out: &mut String, name: &str, value: impl std::fmt::Display) {
    // Writing into a String cannot fail.
    let _ = write!(out, "--{name}:{value};");
}

/// Container class attribute.
pub fn build_class(inputs: ClassInputs<'_>) -> String {
    let mut class = String::from(CONTAINER_CLASS);
    if inputs.draggable {
        class.push(' ');
        class.push_str(DRAGGABLE_CLASS);
    }
    let extra = inputs.class_name.trim();
    if !extra.is_empty() {
        class.push(' ');
        class.push_str(extra);
    }
    class
}

/// Container custom properties followed by the caller's inline style.
pub fn build_container_style(inputs: ContainerInputs<'_>) -> String {
    let hover_paused = !inputs.play || inputs.pause_on_hover;
    let click_paused = !inputs.play
        || (inputs.pause_on_hover && !inputs.pause_on_click)
        || inputs.pause_on_click;

    let mut out = String::new();
    push_var(&mut out, "pause-on-hover", paused_keyword(hover_paused));
    push_var(&mut out, "pause-on-click", paused_keyword(click_paused));
    push_var(
        &mut out,
        "width",
        if inputs.direction.is_vertical() {
            "100vh"
        } else {
            "100%"
        },
    );
    push_var(&mut out, "transform", container_transform(inputs.direction));

    let caller = inputs.style.trim();
    if !caller.is_empty() {
        out.push_str(caller);
    }
    out
}

/// Gradient overlay custom properties.
pub fn build_gradient_style(inputs: GradientInputs<'_>) -> String {
    let mut out = String::new();
    push_var(&mut out, "gradient-color", inputs.color);
    push_var(&mut out, "gradient-width", inputs.width);
    out
}

/// Animation custom properties.
pub fn build_animation_style(animation: &AnimationParameters, auto_fill: bool) -> String {
    let mut out = String::new();
    push_var(&mut out, "play", animation.play_state.as_css());
    push_var(&mut out, "direction", animation.direction.as_css());
    push_var(&mut out, "duration", format_seconds(animation.duration_seconds));
    push_var(&mut out, "delay", format_seconds(animation.delay_seconds));
    push_var(&mut out, "iteration-count", animation.iteration_count);
    push_var(&mut out, "min-width", if auto_fill { "auto" } else { "100%" });
    out
}

/// Content custom properties: a rotation counter to the container's.
pub fn build_content_style(inputs: ContentInputs) -> String {
    let mut out = String::new();
    push_var(&mut out, "transform", content_transform(inputs.direction));
    out
}

fn paused_keyword(paused: bool) -> &'static str {
    if paused {
        "paused"
    } else {
        "running"
    }
}

fn container_transform(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "rotate(-90deg)",
        Direction::Down => "rotate(90deg)",
        Direction::Left | Direction::Right => "none",
    }
}

fn content_transform(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "rotate(90deg)",
        Direction::Down => "rotate(-90deg)",
        Direction::Left | Direction::Right => "none",
    }
}

#[cfg(test)]
#[path = "builders_tests.rs"]
mod tests;
