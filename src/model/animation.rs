//! Animation timing parameters emitted to CSS.

use super::direction::Direction;
use super::params::MarqueeParams;
use std::fmt;
use std::num::NonZeroU32;

/// CSS `animation-play-state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayState {
    /// Animation advances.
    Running,
    /// Animation is frozen.
    Paused,
}

impl PlayState {
    /// `Running` when `running` is true.
    pub fn from_flag(running: bool) -> Self {
        if running {
            Self::Running
        } else {
            Self::Paused
        }
    }

    /// CSS keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }
}

/// CSS `animation-direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationDirection {
    /// Keyframes run forward.
    Normal,
    /// Keyframes run backward.
    Reverse,
}

impl AnimationDirection {
    /// Only `Left` runs the keyframes forward; the other directions reverse
    /// them (vertical ones inside a rotated container).
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Left => Self::Normal,
            Direction::Right | Direction::Up | Direction::Down => Self::Reverse,
        }
    }

    /// CSS keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Reverse => "reverse",
        }
    }
}

/// CSS `animation-iteration-count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterationCount {
    /// Loop a fixed number of times and then finish.
    Finite(NonZeroU32),
    /// Loop forever; never finishes.
    Infinite,
}

impl IterationCount {
    /// Map the user-facing loop count, where `0` means forever.
    pub fn from_loop_count(loop_count: u32) -> Self {
        NonZeroU32::new(loop_count).map_or(Self::Infinite, Self::Finite)
    }

    /// Whether the animation eventually finishes.
    pub fn is_finite(self) -> bool {
        matches!(self, Self::Finite(_))
    }
}

impl fmt::Display for IterationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Infinite => f.write_str("infinite"),
        }
    }
}

/// Everything the animation aspect of the style cache renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationParameters {
    /// Whether the animation runs.
    pub play_state: PlayState,
    /// Keyframe direction.
    pub direction: AnimationDirection,
    /// Cycle duration in seconds.
    pub duration_seconds: f64,
    /// Start delay in seconds.
    pub delay_seconds: f64,
    /// Loop count.
    pub iteration_count: IterationCount,
}

impl AnimationParameters {
    /// Combine parameters with an already-computed duration.
    pub fn new(params: &MarqueeParams, duration_seconds: f64) -> Self {
        Self {
            play_state: PlayState::from_flag(params.play),
            direction: AnimationDirection::for_direction(params.direction),
            duration_seconds,
            delay_seconds: if params.delay.is_finite() {
                params.delay.max(0.0)
            } else {
                0.0
            },
            iteration_count: IterationCount::from_loop_count(params.loop_count),
        }
    }
}
