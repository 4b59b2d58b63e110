//! Shared application service layer for pump selection.
//!
//! Front ends (the CLI today) go through this crate for catalog and
//! configuration loading, cached and instrumented selection runs, and
//! single-pump explanations.

pub mod cache;
pub mod catalog_service;
pub mod error;
pub mod hash;
pub mod selection_service;

pub use cache::{CacheKey, EvaluationCache, Lookup};
pub use catalog_service::{PumpSummary, list_pumps, load_catalog, load_config};
pub use error::{AppError, AppResult};
pub use hash::{config_signature, duty_signature};
pub use selection_service::SelectionService;
