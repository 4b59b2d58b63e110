//! Error and outcome types for the selection engine.

use ps_core::PsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural or fatal failures.
///
/// A pump that simply cannot meet a duty point is not an error; see
/// [`Unachievable`] and [`Solve`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid duty point: {0}")]
    InvalidDutyPoint(PsError),

    #[error("Catalog is empty")]
    EmptyCatalog,

    #[error("Invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Invalid curve data: {what}")]
    InvalidCurve { what: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Domain-valid reasons a pump cannot be solved for a duty point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Unachievable {
    /// Duty flow outside every usable curve's flow domain.
    FlowOutsideCurve { flow: f64, min: f64, max: f64 },
    /// Duty head above what the largest usable impeller delivers.
    HeadUnachievable { target: f64, available: f64 },
    /// The system curve through the duty point never meets the pump curve.
    NoSystemIntersection { flow: f64, head: f64 },
}

impl std::fmt::Display for Unachievable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unachievable::FlowOutsideCurve { flow, min, max } => write!(
                f,
                "flow {flow:.2} outside curve range {min:.2}-{max:.2}"
            ),
            Unachievable::HeadUnachievable { target, available } => write!(
                f,
                "head {target:.2} exceeds available {available:.2} at full diameter"
            ),
            Unachievable::NoSystemIntersection { flow, head } => write!(
                f,
                "system curve through ({flow:.2}, {head:.2}) does not cross the pump curve"
            ),
        }
    }
}

/// Result of a performance solve that is structurally sound.
#[derive(Debug, Clone, PartialEq)]
pub enum Solve<T> {
    Achieved(T),
    Unachievable(Unachievable),
}

impl<T> Solve<T> {
    pub fn is_achieved(&self) -> bool {
        matches!(self, Solve::Achieved(_))
    }

    pub fn achieved(self) -> Option<T> {
        match self {
            Solve::Achieved(v) => Some(v),
            Solve::Unachievable(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Solve<U> {
        match self {
            Solve::Achieved(v) => Solve::Achieved(f(v)),
            Solve::Unachievable(u) => Solve::Unachievable(u),
        }
    }
}
