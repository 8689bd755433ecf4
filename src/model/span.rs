//! Measured spans and the duplication multiplier.

/// Differences smaller than this are treated as measurement jitter.
pub const SPAN_EPSILON: f64 = 0.1;

/// Non-negative size along the scroll axis (width or height).
///
/// Negative and NaN inputs are clamped to zero by the constructor, so every
/// `Span` in the engine satisfies `get() >= 0.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Span(f64);

impl Span {
    /// A zero span (nothing measured yet).
    pub const ZERO: Self = Self(0.0);

    /// Create a span, clamping negative, NaN and infinite values to zero.
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self::ZERO
        }
    }

    /// Raw value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Whether nothing has been measured (or the element is collapsed).
    pub fn is_zero(self) -> bool {
        self.0 <= 0.0
    }

    /// Whether `other` differs from `self` by at least [`SPAN_EPSILON`].
    ///
    /// The comparison allows for the rounding error of the subtraction itself, so `200.0` and
    /// `200.1` count as a change even though their f64 difference is slightly below `0.1`.
    pub fn differs_from(self, other: Self) -> bool {
        let scale = self.0.max(other.0).max(1.0);
        (self.0 - other.0).abs() >= SPAN_EPSILON - 4.0 * f64::EPSILON * scale
    }
}

impl From<f64> for Span {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// Number of content duplicates rendered side by side. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Multiplier(u32);

impl Multiplier {
    /// A single copy of the content.
    pub const ONE: Self = Self(1);

    /// Create a multiplier, raising zero to one.
    pub fn new(count: u32) -> Self {
        Self(count.max(1))
    }

    /// Raw count.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::ONE
    }
}

/// Container and content spans reported together by one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasuredSpans {
    /// Span of the viewport element.
    pub container: Span,
    /// Span of one content block.
    pub content: Span,
}

impl MeasuredSpans {
    /// Build from raw values.
    pub fn new(container: f64, content: f64) -> Self {
        Self {
            container: Span::new(container),
            content: Span::new(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_clamps_negative_to_zero() {
        assert_eq!(Span::new(-12.0).get(), 0.0);
    }

    #[test]
    fn span_clamps_nan_and_infinity_to_zero() {
        assert_eq!(Span::new(f64::NAN).get(), 0.0);
        assert_eq!(Span::new(f64::INFINITY).get(), 0.0);
    }

    #[test]
    fn span_within_epsilon_is_unchanged() {
        let a = Span::new(200.0);
        assert!(!a.differs_from(Span::new(200.05)));
        assert!(!a.differs_from(Span::new(199.95)));
    }

    #[test]
    fn span_beyond_epsilon_is_changed() {
        let a = Span::new(200.0);
        assert!(a.differs_from(Span::new(200.2)));
        assert!(a.differs_from(Span::new(199.8)));
    }

    #[test]
    fn span_exactly_epsilon_apart_is_changed() {
        assert!(Span::new(200.0).differs_from(Span::new(200.1)));
        assert!(Span::new(200.1).differs_from(Span::new(200.0)));
        assert!(Span::new(0.0).differs_from(Span::new(0.1)));
        assert!(Span::new(4_096.3).differs_from(Span::new(4_096.4)));
        assert!(!Span::new(200.0).differs_from(Span::new(200.099)));
    }

    #[test]
    fn multiplier_never_zero() {
        assert_eq!(Multiplier::new(0), Multiplier::ONE);
        assert_eq!(Multiplier::new(4).get(), 4);
        assert_eq!(Multiplier::default(), Multiplier::ONE);
    }
}
