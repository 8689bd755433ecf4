//! Scroll direction and the orientation flags derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction the marquee content travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Content travels right-to-left.
    #[default]
    Left,
    /// Content travels left-to-right.
    Right,
    /// Content travels bottom-to-top.
    Up,
    /// Content travels top-to-bottom.
    Down,
}

impl Direction {
    /// All directions, in declaration order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Whether the scroll axis is vertical (Up/Down).
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Whether drag deltas are inverted for this direction (Right/Up).
    ///
    /// Inverting keeps the scrub direction consistent with the visual travel
    /// direction of the content.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::Right | Self::Up)
    }

    /// Both derived flags at once.
    pub fn orientation(self) -> Orientation {
        Orientation {
            vertical: self.is_vertical(),
            reversed: self.is_reversed(),
        }
    }

    /// Lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a direction name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown direction '{0}' (expected left, right, up or down)")]
pub struct InvalidDirection(pub String);

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(InvalidDirection(s.to_string())),
        }
    }
}

/// Axis and polarity flags derived from a [`Direction`].
///
/// Computed once per direction change and handed to the layout observer and
/// the drag handler, which only care about these two bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Orientation {
    /// Measure and drag along the vertical axis.
    pub vertical: bool,
    /// Invert drag deltas.
    pub reversed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_only_for_up_and_down() {
        assert!(!Direction::Left.is_vertical());
        assert!(!Direction::Right.is_vertical());
        assert!(Direction::Up.is_vertical());
        assert!(Direction::Down.is_vertical());
    }

    #[test]
    fn reversed_only_for_right_and_up() {
        assert!(!Direction::Left.is_reversed());
        assert!(Direction::Right.is_reversed());
        assert!(Direction::Up.is_reversed());
        assert!(!Direction::Down.is_reversed());
    }

    #[test]
    fn orientation_matches_individual_flags() {
        for direction in Direction::ALL {
            let orientation = direction.orientation();
            assert_eq!(orientation.vertical, direction.is_vertical());
            assert_eq!(orientation.reversed, direction.is_reversed());
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("LEFT".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(" down ".parse::<Direction>(), Ok(Direction::Down));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for direction in Direction::ALL {
            assert_eq!(direction.to_string().parse::<Direction>(), Ok(direction));
        }
    }

    #[test]
    fn default_is_left() {
        assert_eq!(Direction::default(), Direction::Left);
    }
}
