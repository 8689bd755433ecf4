//! Per-aspect derived-style cache.
//!
//! Five independent [`Memoized`] strings, one per aspect. A diff pass run once per
//! parameter-update cycle invalidates exactly the aspects whose inputs changed; getters rebuild
//! lazily. Measured-span changes reach the animation aspect through
//! [`StyleCache::invalidate_animation`].

use super::builders::{
    build_animation_style, build_class, build_container_style, build_content_style,
    build_gradient_style, AnimationInputs, ClassInputs, ContainerInputs, ContentInputs,
    GradientInputs,
};
use super::memo::Memoized;
use crate::model::{AnimationParameters, MarqueeParams};

/// Which aspects a diff pass (or a direct invalidation) touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AspectFlags {
    /// Container class.
    pub class: bool,
    /// Container custom properties + caller style.
    pub container: bool,
    /// Gradient overlay custom properties.
    pub gradient: bool,
    /// Animation custom properties.
    pub animation: bool,
    /// Content custom properties.
    pub content: bool,
}

impl AspectFlags {
    /// Every aspect set.
    pub const ALL: Self = Self {
        class: true,
        container: true,
        gradient: true,
        animation: true,
        content: true,
    };

    /// Whether no aspect is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Memoized style strings for the five aspects.
#[derive(Debug, Clone, Default)]
pub struct StyleCache {
    class: Memoized<String>,
    container: Memoized<String>,
    gradient: Memoized<String>,
    animation: Memoized<String>,
    content: Memoized<String>,
}

impl StyleCache {
    /// Create a cache with every aspect pending its first build.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate the aspects whose inputs differ between `previous` and `current`.
    ///
    /// With no previous parameters (first cycle) everything is invalidated. Returns the aspects
    /// invalidated by this pass.
    pub fn apply_diff(
        &mut self,
        previous: Option<&MarqueeParams>,
        current: &MarqueeParams,
    ) -> AspectFlags {
        let Some(previous) = previous else {
            self.invalidate_all();
            return AspectFlags::ALL;
        };

        AspectFlags {
            class: self
                .class
                .invalidate_if(ClassInputs::of(previous) != ClassInputs::of(current)),
            container: self
                .container
                .invalidate_if(ContainerInputs::of(previous) != ContainerInputs::of(current)),
            gradient: self
                .gradient
                .invalidate_if(GradientInputs::of(previous) != GradientInputs::of(current)),
            animation: self
                .animation
                .invalidate_if(AnimationInputs::of(previous) != AnimationInputs::of(current)),
            content: self
                .content
                .invalidate_if(ContentInputs::of(previous) != ContentInputs::of(current)),
        }
    }

    /// Mark the animation aspect stale after a duration or multiplier change.
    pub fn invalidate_animation(&mut self) {
        self.animation.invalidate();
    }

    /// Mark every aspect stale.
    pub fn invalidate_all(&mut self) {
        self.class.invalidate();
        self.container.invalidate();
        self.gradient.invalidate();
        self.animation.invalidate();
        self.content.invalidate();
    }

    /// Aspects that will rebuild on their next read.
    pub fn pending(&self) -> AspectFlags {
        AspectFlags {
            class: self.class.is_invalidated(),
            container: self.container.is_invalidated(),
            gradient: self.gradient.is_invalidated(),
            animation: self.animation.is_invalidated(),
            content: self.content.is_invalidated(),
        }
    }

    /// Container class attribute.
    pub fn class(&mut self, params: &MarqueeParams) -> &str {
        self.class
            .get_or_rebuild(|| build_class(ClassInputs::of(params)))
    }

    /// Container style attribute.
    pub fn container_style(&mut self, params: &MarqueeParams) -> &str {
        self.container
            .get_or_rebuild(|| build_container_style(ContainerInputs::of(params)))
    }

    /// Gradient overlay style attribute.
    pub fn gradient_style(&mut self, params: &MarqueeParams) -> &str {
        self.gradient
            .get_or_rebuild(|| build_gradient_style(GradientInputs::of(params)))
    }

    /// Animation style attribute for the given cycle duration.
    pub fn animation_style(&mut self, params: &MarqueeParams, duration_seconds: f64) -> &str {
        self.animation.get_or_rebuild(|| {
            let animation = AnimationParameters::new(params, duration_seconds);
            build_animation_style(&animation, params.auto_fill)
        })
    }

    /// Content style attribute.
    pub fn content_style(&mut self, params: &MarqueeParams) -> &str {
        self.content
            .get_or_rebuild(|| build_content_style(ContentInputs::of(params)))
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
