//! Measurement coordinator state.
//!
//! Owns the [`DimensionStore`] and the [`StyleCache`], applies parameter updates and span
//! deliveries to them, and decides when a re-render is needed. The asynchronous host
//! round-trips that feed it live in the engine shell; everything here is synchronous and
//! touched only from the coordination thread.

use super::dimensions::{DimensionChange, DimensionStore};
use super::timing::compute_duration;
use crate::model::{MarqueeParams, MeasuredSpans, Multiplier, Orientation};
use crate::style::{AspectFlags, StyleCache};
use serde::Serialize;
use tracing::trace;

/// Everything the template layer needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMarquee {
    /// Container class attribute.
    pub class: String,
    /// Container style attribute (custom properties + caller style).
    pub container_style: String,
    /// Gradient overlay style attribute.
    pub gradient_style: String,
    /// Whether the gradient overlays are rendered at all.
    pub gradient: bool,
    /// Animation style attribute, applied to every content block.
    pub animation_style: String,
    /// Content style attribute, applied to each duplicated child.
    pub content_style: String,
    /// Number of content duplicates per block.
    pub multiplier: u32,
    /// Cycle duration in seconds.
    pub duration_seconds: f64,
}

/// Result of one parameter-update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParameterUpdate {
    /// Aspects the diff pass invalidated.
    pub aspects: AspectFlags,
    /// The measurement axis or drag polarity changed.
    pub orientation_changed: bool,
    /// Dragging was switched on or off.
    pub draggable_changed: bool,
    /// Toggling auto-fill changed the multiplier.
    pub multiplier_changed: bool,
}

/// Synchronous half of the measurement coordinator.
#[derive(Debug, Clone, Default)]
pub struct MeasurementCoordinator {
    params: MarqueeParams,
    initialized: bool,
    dimensions: DimensionStore,
    styles: StyleCache,
}

impl MeasurementCoordinator {
    /// Create a coordinator for the initial parameters.
    pub fn new(params: MarqueeParams) -> Self {
        let mut coordinator = Self::default();
        coordinator.update_parameters(params);
        coordinator
    }

    /// Current parameters.
    pub fn params(&self) -> &MarqueeParams {
        &self.params
    }

    /// Current axis/polarity flags.
    pub fn orientation(&self) -> Orientation {
        self.params.direction.orientation()
    }

    /// Last-known spans.
    pub fn dimensions(&self) -> &DimensionStore {
        &self.dimensions
    }

    /// Current multiplier.
    pub fn multiplier(&self) -> Multiplier {
        self.dimensions.multiplier()
    }

    /// Current cycle duration in seconds.
    pub fn duration(&self) -> f64 {
        compute_duration(
            self.dimensions.container(),
            self.dimensions.content(),
            self.dimensions.multiplier(),
            self.params.auto_fill,
            self.params.effective_speed(),
        )
    }

    /// Aspects pending a rebuild.
    pub fn pending_aspects(&self) -> AspectFlags {
        self.styles.pending()
    }

    /// Run the diff pass for a new parameter set and store it.
    pub fn update_parameters(&mut self, params: MarqueeParams) -> ParameterUpdate {
        let previous = self.initialized.then_some(&self.params);
        let aspects = self.styles.apply_diff(previous, &params);

        let (orientation_changed, draggable_changed, auto_fill_changed) = match previous {
            Some(prev) => (
                prev.direction.orientation() != params.direction.orientation(),
                prev.draggable != params.draggable,
                prev.auto_fill != params.auto_fill,
            ),
            None => (false, false, false),
        };

        let multiplier_changed = auto_fill_changed && self.dimensions.recompute(params.auto_fill);
        if multiplier_changed {
            self.styles.invalidate_animation();
        }

        self.params = params;
        self.initialized = true;

        ParameterUpdate {
            aspects,
            orientation_changed,
            draggable_changed,
            multiplier_changed,
        }
    }

    /// Apply a span delivery. Returns whether a re-render is needed.
    ///
    /// Only changes beyond the epsilon (or a multiplier change) invalidate the animation
    /// aspect.
    pub fn apply_measurement(&mut self, spans: MeasuredSpans) -> bool {
        let change: DimensionChange = self.dimensions.record(spans, self.params.auto_fill);
        trace!(
            container = spans.container.get(),
            content = spans.content.get(),
            changed = change.any(),
            "layout measurement applied"
        );
        if change.any() {
            self.styles.invalidate_animation();
        }
        change.any()
    }

    /// Build the render output, rebuilding only invalidated aspects.
    pub fn render(&mut self) -> RenderedMarquee {
        let duration = self.duration();
        let params = &self.params;
        RenderedMarquee {
            class: self.styles.class(params).to_string(),
            container_style: self.styles.container_style(params).to_string(),
            gradient_style: self.styles.gradient_style(params).to_string(),
            gradient: params.gradient,
            animation_style: self.styles.animation_style(params, duration).to_string(),
            content_style: self.styles.content_style(params).to_string(),
            multiplier: self.dimensions.multiplier().get(),
            duration_seconds: duration,
        }
    }
}
