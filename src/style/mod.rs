//! Derived CSS state.
//!
//! Pure string builders per aspect, a memoized cell type, and the five-aspect cache the
//! render step reads custom properties from.

pub mod builders;
pub mod cache;
pub mod format;
pub mod memo;

pub use cache::{AspectFlags, StyleCache};
pub use memo::Memoized;
