//! Layout bookkeeping: spans, multiplier, duration, and the coordinator that owns them.

pub mod coordinator;
pub mod dimensions;
pub mod timing;

pub use coordinator::{MeasurementCoordinator, ParameterUpdate, RenderedMarquee};
pub use dimensions::{DimensionChange, DimensionStore};
pub use timing::{compute_duration, compute_multiplier};
