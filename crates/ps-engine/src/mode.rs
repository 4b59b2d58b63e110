//! Operating-mode decision and operating-zone classification.

use serde::{Deserialize, Serialize};

/// How a pump may be adjusted to meet a duty point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationMode {
    /// Trimmable impeller and variable speed drive.
    Flexible,
    TrimOnly,
    VfdOnly,
    /// Neither adjustment is available.
    Fixed,
}

/// Adjustment actually used to reach the duty point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionMethod {
    ImpellerTrim,
    SpeedVariation,
    None,
}

impl OperationMode {
    pub fn from_capabilities(variable_speed: bool, variable_diameter: bool) -> Self {
        match (variable_speed, variable_diameter) {
            (true, true) => OperationMode::Flexible,
            (false, true) => OperationMode::TrimOnly,
            (true, false) => OperationMode::VfdOnly,
            (false, false) => OperationMode::Fixed,
        }
    }

    /// Method tried first for this mode.
    pub fn primary_method(self) -> SelectionMethod {
        match self {
            OperationMode::Flexible | OperationMode::TrimOnly => SelectionMethod::ImpellerTrim,
            OperationMode::VfdOnly => SelectionMethod::SpeedVariation,
            OperationMode::Fixed => SelectionMethod::None,
        }
    }

    /// Method tried when the primary one cannot reach the duty point.
    pub fn fallback_method(self) -> Option<SelectionMethod> {
        match self {
            OperationMode::Flexible => Some(SelectionMethod::SpeedVariation),
            OperationMode::TrimOnly | OperationMode::VfdOnly | OperationMode::Fixed => None,
        }
    }
}

impl std::fmt::Display for OperationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OperationMode::Flexible => "FLEXIBLE",
            OperationMode::TrimOnly => "TRIM_ONLY",
            OperationMode::VfdOnly => "VFD_ONLY",
            OperationMode::Fixed => "FIXED",
        };
        f.pad(s)
    }
}

impl std::fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SelectionMethod::ImpellerTrim => "IMPELLER_TRIM",
            SelectionMethod::SpeedVariation => "SPEED_VARIATION",
            SelectionMethod::None => "NONE",
        };
        f.pad(s)
    }
}

/// Operating-zone tier, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Preferred,
    Allowable,
    Acceptable,
    Marginal,
}

impl Tier {
    pub const ALL: [Tier; 4] = [
        Tier::Preferred,
        Tier::Allowable,
        Tier::Acceptable,
        Tier::Marginal,
    ];

    /// 1 (preferred) through 4 (marginal).
    pub fn number(self) -> u8 {
        match self {
            Tier::Preferred => 1,
            Tier::Allowable => 2,
            Tier::Acceptable => 3,
            Tier::Marginal => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Preferred => "preferred",
            Tier::Allowable => "allowable",
            Tier::Acceptable => "acceptable",
            Tier::Marginal => "marginal",
        }
    }
}

/// Duty flow as a percentage of BEP flow.
pub fn qbp(flow: f64, bep_flow: f64) -> f64 {
    flow / bep_flow * 100.0
}

/// Classify QBP into an operating zone.
pub fn classify_zone(qbp: f64) -> Tier {
    if (80.0..=110.0).contains(&qbp) {
        Tier::Preferred
    } else if (60.0..80.0).contains(&qbp) || (qbp > 110.0 && qbp <= 140.0) {
        Tier::Allowable
    } else if (50.0..60.0).contains(&qbp) || (qbp > 140.0 && qbp <= 200.0) {
        Tier::Acceptable
    } else {
        Tier::Marginal
    }
}
