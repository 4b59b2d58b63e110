//! ps-core: stable foundation for pumpselect.
//!
//! Contains:
//! - units (uom SI types + catalog-unit constructors + hydraulic power)
//! - numeric (Real + validation and interpolation helpers)
//! - timing (evaluation counters and timers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PsError, PsResult};
pub use numeric::*;
pub use timing::{CountedOutcome, EvalCounters, MetricsSnapshot, Timer};
pub use units::*;
