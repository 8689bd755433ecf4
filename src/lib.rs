//! Marquee layout/animation coordination engine.
//!
//! Computes the CSS state of a continuously scrolling marquee from measured container and
//! content sizes, keeps it up to date as the host reports layout changes, and lets pointer
//! drags scrub the running animation.
//!
//! Pure Core / Impure Shell: [`model`], [`layout`], [`style`] and [`drag`] are synchronous and
//! host-agnostic; [`engine`] owns the asynchronous round-trips to the [`host`].

pub mod config;
pub mod drag;
pub mod engine;
pub mod host;
pub mod layout;
pub mod logging;
pub mod model;
pub mod style;
