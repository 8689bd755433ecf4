//! User-facing marquee parameters.

use super::direction::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default scroll speed in pixels per second.
pub const DEFAULT_SPEED: f64 = 50.0;

/// Default gradient overlay color.
pub const DEFAULT_GRADIENT_COLOR: &str = "white";

/// Default gradient overlay width in pixels.
pub const DEFAULT_GRADIENT_WIDTH: f64 = 200.0;

/// Width of the gradient overlay.
///
/// Numbers are pixels; strings are passed through as raw CSS lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GradientWidth {
    /// Width in pixels, rendered as `<n>px`.
    Pixels(f64),
    /// Raw CSS length (e.g. `"10%"`), rendered verbatim.
    Css(String),
}

impl Default for GradientWidth {
    fn default() -> Self {
        Self::Pixels(DEFAULT_GRADIENT_WIDTH)
    }
}

impl fmt::Display for GradientWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{}px", crate::style::format::format_number(*px)),
            Self::Css(css) => f.write_str(css),
        }
    }
}

/// Every parameter the engine reads.
///
/// Declared once by the embedding component and pushed into the engine with
/// `Marquee::set_parameters` on each parameter-update cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeParams {
    /// Extra class names appended to the container class.
    pub class_name: String,
    /// Caller-supplied inline style, appended after the engine's variables.
    pub style: String,
    /// Duplicate the content until it covers the container.
    pub auto_fill: bool,
    /// Whether the animation runs.
    pub play: bool,
    /// Pause while the pointer hovers the container.
    pub pause_on_hover: bool,
    /// Pause while the pointer is pressed on the container.
    pub pause_on_click: bool,
    /// Travel direction.
    pub direction: Direction,
    /// Speed in pixels per second. Values below 1 are treated as 1.
    pub speed: f64,
    /// Delay before the animation starts, in seconds.
    pub delay: f64,
    /// Number of loops; 0 loops forever.
    pub loop_count: u32,
    /// Show gradient overlays at both edges.
    pub gradient: bool,
    /// Gradient overlay color.
    pub gradient_color: String,
    /// Gradient overlay width.
    pub gradient_width: GradientWidth,
    /// Allow pointer drags to scrub the animation.
    pub draggable: bool,
}

impl Default for MarqueeParams {
    fn default() -> Self {
        Self {
            class_name: String::new(),
            style: String::new(),
            auto_fill: false,
            play: true,
            pause_on_hover: false,
            pause_on_click: false,
            direction: Direction::Left,
            speed: DEFAULT_SPEED,
            delay: 0.0,
            loop_count: 0,
            gradient: false,
            gradient_color: DEFAULT_GRADIENT_COLOR.to_string(),
            gradient_width: GradientWidth::default(),
            draggable: false,
        }
    }
}

impl MarqueeParams {
    /// Speed with the `>= 1` guard applied.
    pub fn effective_speed(&self) -> f64 {
        if self.speed.is_finite() {
            self.speed.max(1.0)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let params = MarqueeParams::default();
        assert_eq!(params.speed, 50.0);
        assert_eq!(params.direction, Direction::Left);
        assert!(params.play);
        assert_eq!(params.loop_count, 0);
        assert_eq!(params.gradient_color, "white");
        assert_eq!(params.gradient_width, GradientWidth::Pixels(200.0));
        assert!(!params.draggable);
        assert!(!params.auto_fill);
    }

    #[test]
    fn effective_speed_guards_zero_and_negative() {
        let mut params = MarqueeParams::default();
        params.speed = 0.0;
        assert_eq!(params.effective_speed(), 1.0);
        params.speed = -30.0;
        assert_eq!(params.effective_speed(), 1.0);
        params.speed = f64::NAN;
        assert_eq!(params.effective_speed(), 1.0);
        params.speed = 75.0;
        assert_eq!(params.effective_speed(), 75.0);
    }

    #[test]
    fn gradient_width_display() {
        assert_eq!(GradientWidth::Pixels(200.0).to_string(), "200px");
        assert_eq!(GradientWidth::Pixels(12.5).to_string(), "12.5px");
        assert_eq!(GradientWidth::Css("10%".to_string()).to_string(), "10%");
    }

    #[test]
    fn deserializes_partial_toml_with_defaults() {
        let params: MarqueeParams = toml::from_str(
            r#"
direction = "up"
speed = 80.0
gradient_width = "15%"
"#,
        )
        .expect("valid params");
        assert_eq!(params.direction, Direction::Up);
        assert_eq!(params.speed, 80.0);
        assert_eq!(params.gradient_width, GradientWidth::Css("15%".to_string()));
        assert!(params.play, "unspecified fields fall back to defaults");
    }
}
