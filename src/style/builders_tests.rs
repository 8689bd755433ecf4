//! Tests for the style builders.

use super::*;
use crate::model::{IterationCount, MarqueeParams};
use insta::assert_snapshot;

fn params() -> MarqueeParams {
    MarqueeParams::default()
}

// ===== Class =====

#[test]
fn class_defaults_to_container_class() {
    assert_eq!(build_class(ClassInputs::of(&params())), "marquee-container");
}

#[test]
fn class_adds_draggable_and_caller_classes() {
    let p = MarqueeParams {
        class_name: " hero-strip ".to_string(),
        draggable: true,
        ..params()
    };
    assert_eq!(
        build_class(ClassInputs::of(&p)),
        "marquee-container marquee-draggable hero-strip"
    );
}

// ===== Container =====

#[test]
fn container_style_defaults() {
    assert_snapshot!(
        build_container_style(ContainerInputs::of(&params())),
        @"--pause-on-hover:running;--pause-on-click:running;--width:100%;--transform:none;"
    );
}

#[test]
fn container_style_vertical_up() {
    let p = MarqueeParams {
        direction: Direction::Up,
        ..params()
    };
    assert_snapshot!(
        build_container_style(ContainerInputs::of(&p)),
        @"--pause-on-hover:running;--pause-on-click:running;--width:100vh;--transform:rotate(-90deg);"
    );
}

#[test]
fn container_style_appends_caller_style_last() {
    let p = MarqueeParams {
        style: "color: red; height: 40px".to_string(),
        direction: Direction::Down,
        ..params()
    };
    let style = build_container_style(ContainerInputs::of(&p));
    assert!(
        style.ends_with(";color: red; height: 40px"),
        "caller style must follow engine variables, got {style}"
    );
    assert!(style.contains("--transform:rotate(90deg);"));
}

#[test]
fn pause_on_hover_pauses_both_hover_and_click() {
    let p = MarqueeParams {
        pause_on_hover: true,
        ..params()
    };
    let style = build_container_style(ContainerInputs::of(&p));
    assert!(style.contains("--pause-on-hover:paused;"));
    assert!(style.contains("--pause-on-click:paused;"));
}

#[test]
fn pause_on_click_alone_pauses_only_click() {
    let p = MarqueeParams {
        pause_on_click: true,
        ..params()
    };
    let style = build_container_style(ContainerInputs::of(&p));
    assert!(style.contains("--pause-on-hover:running;"));
    assert!(style.contains("--pause-on-click:paused;"));
}

#[test]
fn not_playing_pauses_everything() {
    let p = MarqueeParams {
        play: false,
        ..params()
    };
    let style = build_container_style(ContainerInputs::of(&p));
    assert!(style.contains("--pause-on-hover:paused;"));
    assert!(style.contains("--pause-on-click:paused;"));
}

// ===== Gradient =====

#[test]
fn gradient_style_pixels_and_css() {
    assert_snapshot!(
        build_gradient_style(GradientInputs::of(&params())),
        @"--gradient-color:white;--gradient-width:200px;"
    );

    let p = MarqueeParams {
        gradient_color: "rgb(10, 20, 30)".to_string(),
        gradient_width: GradientWidth::Css("12%".to_string()),
        ..params()
    };
    assert_snapshot!(
        build_gradient_style(GradientInputs::of(&p)),
        @"--gradient-color:rgb(10, 20, 30);--gradient-width:12%;"
    );
}

// ===== Animation =====

#[test]
fn animation_style_infinite_left() {
    let animation = AnimationParameters::new(&params(), 12.0);
    assert_eq!(animation.iteration_count, IterationCount::Infinite);
    assert_snapshot!(
        build_animation_style(&animation, false),
        @"--play:running;--direction:normal;--duration:12s;--delay:0s;--iteration-count:infinite;--min-width:100%;"
    );
}

#[test]
fn animation_style_finite_reverse_auto_fill() {
    let p = MarqueeParams {
        direction: Direction::Right,
        loop_count: 3,
        delay: 1.25,
        play: false,
        auto_fill: true,
        ..params()
    };
    let animation = AnimationParameters::new(&p, 1.0 / 3.0);
    assert_snapshot!(
        build_animation_style(&animation, p.auto_fill),
        @"--play:paused;--direction:reverse;--duration:0.333s;--delay:1.25s;--iteration-count:3;--min-width:auto;"
    );
}

// ===== Content =====

#[test]
fn content_rotation_counters_container() {
    assert_eq!(
        build_content_style(ContentInputs {
            direction: Direction::Up
        }),
        "--transform:rotate(90deg);"
    );
    assert_eq!(
        build_content_style(ContentInputs {
            direction: Direction::Down
        }),
        "--transform:rotate(-90deg);"
    );
    assert_eq!(
        build_content_style(ContentInputs {
            direction: Direction::Left
        }),
        "--transform:none;"
    );
}
