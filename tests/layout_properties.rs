//! Property-based tests for timing, measurement and cache invariants.
//!
//! Tests validate:
//! 1. Apparent speed is constant under auto-fill
//! 2. Sub-epsilon jitter never dirties the cache
//! 3. The multiplier is monotone and at least 1
//! 4. Parameter diffs only touch dependent aspects

use marquee::layout::{compute_duration, compute_multiplier, MeasurementCoordinator};
use marquee::model::{Direction, MarqueeParams, MeasuredSpans, Span};
use marquee::style::StyleCache;
use proptest::prelude::*;

fn auto_fill() -> MarqueeParams {
    MarqueeParams {
        auto_fill: true,
        ..MarqueeParams::default()
    }
}

// ===== Property 1: Speed invariance =====

proptest! {
    #[test]
    fn auto_fill_speed_is_constant(
        speed in 1.0f64..1_000.0,
        content in 1.0f64..5_000.0,
        container in 0.0f64..20_000.0,
    ) {
        let content = Span::new(content);
        let container = Span::new(container);
        let multiplier = compute_multiplier(container, content, true);
        let duration = compute_duration(container, content, multiplier, true, speed);
        let apparent = content.get() * f64::from(multiplier.get()) / duration;
        prop_assert!((apparent - speed).abs() <= speed * 1e-9, "{apparent} vs {speed}");
    }

    #[test]
    fn plain_speed_covers_longer_span(
        speed in 1.0f64..1_000.0,
        content in 1.0f64..5_000.0,
        container in 0.0f64..5_000.0,
    ) {
        let duration = compute_duration(
            Span::new(container),
            Span::new(content),
            compute_multiplier(Span::new(container), Span::new(content), false),
            false,
            speed,
        );
        let distance = content.max(container);
        prop_assert!((distance / duration - speed).abs() <= speed * 1e-9);
    }

    #[test]
    fn speeds_below_one_behave_like_one(
        speed in -100.0f64..1.0,
        content in 1.0f64..5_000.0,
    ) {
        let span = Span::new(content);
        let m = compute_multiplier(span, span, false);
        prop_assert_eq!(
            compute_duration(span, span, m, false, speed),
            compute_duration(span, span, m, false, 1.0)
        );
    }
}

// ===== Property 2: Epsilon stability =====

proptest! {
    #[test]
    fn jitter_below_epsilon_is_ignored(
        container in 1.0f64..5_000.0,
        content in 1.0f64..5_000.0,
        dc in -0.099f64..0.099,
        dm in -0.099f64..0.099,
    ) {
        let mut coordinator = MeasurementCoordinator::new(auto_fill());
        coordinator.apply_measurement(MeasuredSpans::new(container, content));
        let before = coordinator.render();

        let rerender = coordinator.apply_measurement(MeasuredSpans::new(container + dc, content + dm));
        prop_assert!(!rerender);
        prop_assert!(coordinator.pending_aspects().is_empty());
        prop_assert_eq!(coordinator.render(), before);
    }

    #[test]
    fn change_beyond_epsilon_is_recorded(
        container in 1.0f64..5_000.0,
        content in 1.0f64..5_000.0,
        delta in 0.2f64..500.0,
    ) {
        let mut coordinator = MeasurementCoordinator::new(auto_fill());
        coordinator.apply_measurement(MeasuredSpans::new(container, content));
        coordinator.render();
        prop_assert!(coordinator.apply_measurement(MeasuredSpans::new(container, content + delta)));
        prop_assert!(coordinator.pending_aspects().animation);
    }
}

// ===== Property 3: Multiplier monotonicity =====

proptest! {
    #[test]
    fn multiplier_is_monotone(
        container in 0.0f64..10_000.0,
        extra in 0.0f64..10_000.0,
        content in 0.5f64..2_000.0,
        content_extra in 0.0f64..2_000.0,
    ) {
        let base = compute_multiplier(Span::new(container), Span::new(content), true);
        let wider = compute_multiplier(Span::new(container + extra), Span::new(content), true);
        let longer = compute_multiplier(Span::new(container), Span::new(content + content_extra), true);

        prop_assert!(base.get() >= 1);
        prop_assert!(wider >= base, "non-decreasing in container span");
        prop_assert!(longer <= base, "non-increasing in content span");
    }

    #[test]
    fn multiplier_is_one_without_auto_fill(container in 0.0f64..10_000.0, content in 0.0f64..100.0) {
        prop_assert_eq!(compute_multiplier(Span::new(container), Span::new(content), false).get(), 1);
    }
}

// ===== Property 4: Cache independence =====

proptest! {
    #[test]
    fn pause_on_click_only_touches_container(pause_on_click in any::<bool>(), direction_index in 0usize..4) {
        let base = MarqueeParams {
            direction: Direction::ALL[direction_index],
            ..MarqueeParams::default()
        };
        let toggled = MarqueeParams { pause_on_click: !pause_on_click, ..base.clone() };
        let base = MarqueeParams { pause_on_click, ..base };

        let mut cache = StyleCache::new();
        cache.apply_diff(None, &base);
        let flags = cache.apply_diff(Some(&base), &toggled);

        prop_assert!(flags.container);
        prop_assert!(!flags.gradient);
        prop_assert!(!flags.content);
        prop_assert!(!flags.class);
        prop_assert!(!flags.animation);
    }
}
