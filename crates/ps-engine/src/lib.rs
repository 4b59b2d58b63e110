//! ps-engine: pump selection and performance evaluation.
//!
//! Pipeline for one duty point:
//! - pre-filter the catalog on BEP windows and pump type
//! - evaluate each candidate in parallel (operating mode, trim or speed
//!   performance, physical validation, scoring)
//! - group by tier and rank deterministically
//!
//! # Example
//!
//! ```no_run
//! use ps_engine::{DutyPoint, SelectionConfig, select};
//!
//! let catalog = ps_catalog::load(std::path::Path::new("catalog.yaml")).unwrap();
//! let duty = DutyPoint::new(1781.0, 22.0).unwrap();
//! let report = select(&duty, &catalog.pumps, &SelectionConfig::default()).unwrap();
//! for e in report.top(5) {
//!     println!("{} {:?} {:.1}", e.pump_code, e.tier, e.total_score());
//! }
//! ```

pub mod config;
pub mod curve;
pub mod duty;
pub mod error;
pub mod evaluator;
pub mod exclusion;
pub mod mode;
pub mod performance;
pub mod physics;
pub mod pipeline;
pub mod prefilter;
pub mod ranking;
pub mod scoring;
pub mod validator;

pub use config::{PrefilterConfig, SelectionConfig};
pub use curve::{CurveProperty, CurveView, interpolate};
pub use duty::{ApplicationType, DutyPoint};
pub use error::{EngineError, EngineResult, Solve, Unachievable};
pub use evaluator::{Evaluation, PumpOutcome, evaluate_pump};
pub use exclusion::{ExclusionReason, ExclusionRecord, ExclusionStage};
pub use mode::{OperationMode, SelectionMethod, Tier, classify_zone, qbp};
pub use performance::{
    Performance, PerformanceCalculator, PowerEstimate, PowerSource, SpeedSolution, TrimSolution,
};
pub use physics::{AffinityExponents, exponents_for};
pub use pipeline::{select, select_with};
pub use prefilter::{PrefilterOutcome, prefilter};
pub use ranking::{
    ExclusionSummary, SelectionReport, SelectionSummary, TierCounts, TierGroup, rank,
};
pub use scoring::{ScoreComponents, ScoreInputs};
pub use validator::{PhysicalCheck, check_physical};
