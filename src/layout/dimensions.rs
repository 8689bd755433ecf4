//! Last-known spans and the derived multiplier.

use super::timing::compute_multiplier;
use crate::model::{MeasuredSpans, Multiplier, Span};

/// What changed when new spans were recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimensionChange {
    /// Container span moved by at least the epsilon.
    pub container: bool,
    /// Content span moved by at least the epsilon.
    pub content: bool,
    /// The multiplier changed.
    pub multiplier: bool,
}

impl DimensionChange {
    /// Whether anything visible changed.
    pub fn any(&self) -> bool {
        self.container || self.content || self.multiplier
    }
}

/// Holds the last measured spans and the multiplier derived from them.
///
/// Spans within the epsilon of the stored values are ignored entirely, so sub-pixel jitter
/// never reaches the style cache.
#[derive(Debug, Clone, Default)]
pub struct DimensionStore {
    container: Span,
    content: Span,
    multiplier: Multiplier,
    measured: bool,
}

impl DimensionStore {
    /// Empty store: zero spans, multiplier one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Container span.
    pub fn container(&self) -> Span {
        self.container
    }

    /// Content span.
    pub fn content(&self) -> Span {
        self.content
    }

    /// Duplication multiplier.
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    /// Whether at least one measurement has been recorded.
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Record a measurement.
    ///
    /// A span is replaced only when it differs beyond the epsilon. The multiplier is
    /// recomputed from the stored spans afterwards.
    pub fn record(&mut self, spans: MeasuredSpans, auto_fill: bool) -> DimensionChange {
        self.measured = true;
        let mut change = DimensionChange::default();

        if self.container.differs_from(spans.container) {
            self.container = spans.container;
            change.container = true;
        }
        if self.content.differs_from(spans.content) {
            self.content = spans.content;
            change.content = true;
        }
        change.multiplier = self.recompute(auto_fill);
        change
    }

    /// Recompute the multiplier from stored spans. Returns whether it changed.
    pub fn recompute(&mut self, auto_fill: bool) -> bool {
        let multiplier = compute_multiplier(self.container, self.content, auto_fill);
        let changed = multiplier != self.multiplier;
        self.multiplier = multiplier;
        changed
    }
}
