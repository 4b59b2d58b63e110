//! Why a pump did not make the ranked list (or made it only as marginal).

use crate::error::Unachievable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the pipeline that excluded a pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionStage {
    PreFilter,
    TypeConstraint,
    /// Performance could not be solved, or the pump data was unusable.
    Evaluation,
    /// Solved but not physically deliverable. Such pumps are still ranked
    /// as marginal; the record exists for audit.
    PhysicalIncapable,
}

impl ExclusionStage {
    pub fn label(self) -> &'static str {
        match self {
            ExclusionStage::PreFilter => "pre_filter",
            ExclusionStage::TypeConstraint => "type_constraint",
            ExclusionStage::Evaluation => "evaluation",
            ExclusionStage::PhysicalIncapable => "physical_incapable",
        }
    }
}

impl fmt::Display for ExclusionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Machine-readable exclusion reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ExclusionReason {
    MissingBep,
    FlowOutOfRange { bep_flow: f64, min: f64, max: f64 },
    HeadOutOfRange { bep_head: f64, min: f64, max: f64 },
    PumpTypeMismatch { required: String, actual: String },
    NoCurves,
    FlowOutsideCurve { flow: f64, min: f64, max: f64 },
    HeadUnachievable { target: f64, available: f64 },
    NoSystemIntersection { flow: f64, head: f64 },
    InvalidData { message: String },
    PhysicalLimit { detail: String },
}

impl ExclusionReason {
    /// Stable code, identical to the serialized `code` tag.
    pub fn code(&self) -> &'static str {
        match self {
            ExclusionReason::MissingBep => "missing_bep",
            ExclusionReason::FlowOutOfRange { .. } => "flow_out_of_range",
            ExclusionReason::HeadOutOfRange { .. } => "head_out_of_range",
            ExclusionReason::PumpTypeMismatch { .. } => "pump_type_mismatch",
            ExclusionReason::NoCurves => "no_curves",
            ExclusionReason::FlowOutsideCurve { .. } => "flow_outside_curve",
            ExclusionReason::HeadUnachievable { .. } => "head_unachievable",
            ExclusionReason::NoSystemIntersection { .. } => "no_system_intersection",
            ExclusionReason::InvalidData { .. } => "invalid_data",
            ExclusionReason::PhysicalLimit { .. } => "physical_limit",
        }
    }
}

impl From<Unachievable> for ExclusionReason {
    fn from(u: Unachievable) -> Self {
        match u {
            Unachievable::FlowOutsideCurve { flow, min, max } => {
                ExclusionReason::FlowOutsideCurve { flow, min, max }
            }
            Unachievable::HeadUnachievable { target, available } => {
                ExclusionReason::HeadUnachievable { target, available }
            }
            Unachievable::NoSystemIntersection { flow, head } => {
                ExclusionReason::NoSystemIntersection { flow, head }
            }
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::MissingBep => f.write_str("best efficiency point missing or zero"),
            ExclusionReason::FlowOutOfRange { bep_flow, min, max } => write!(
                f,
                "BEP flow {bep_flow:.2} outside admissible range {min:.2}-{max:.2}"
            ),
            ExclusionReason::HeadOutOfRange { bep_head, min, max } => write!(
                f,
                "BEP head {bep_head:.2} outside admissible range {min:.2}-{max:.2}"
            ),
            ExclusionReason::PumpTypeMismatch { required, actual } => {
                write!(f, "pump type {actual} does not match required {required}")
            }
            ExclusionReason::NoCurves => f.write_str("no performance curves"),
            ExclusionReason::FlowOutsideCurve { flow, min, max } => write!(
                f,
                "flow {flow:.2} outside curve range {min:.2}-{max:.2}"
            ),
            ExclusionReason::HeadUnachievable { target, available } => write!(
                f,
                "head {target:.2} exceeds available {available:.2} at full diameter"
            ),
            ExclusionReason::NoSystemIntersection { flow, head } => write!(
                f,
                "no speed brings the curve through ({flow:.2}, {head:.2})"
            ),
            ExclusionReason::InvalidData { message } => write!(f, "invalid pump data: {message}"),
            ExclusionReason::PhysicalLimit { detail } => f.write_str(detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionRecord {
    pub pump_code: String,
    pub stage: ExclusionStage,
    pub reason: ExclusionReason,
}

impl ExclusionRecord {
    pub fn new(
        pump_code: impl Into<String>,
        stage: ExclusionStage,
        reason: ExclusionReason,
    ) -> Self {
        Self {
            pump_code: pump_code.into(),
            stage,
            reason,
        }
    }
}
