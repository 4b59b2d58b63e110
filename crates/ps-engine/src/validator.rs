//! Physical deliverability check.
//!
//! The performance calculator answers "is there a mathematical solution";
//! this module answers "can the selected hardware actually run there".

use crate::config::SelectionConfig;
use crate::duty::DutyPoint;
use crate::mode::SelectionMethod;
use crate::performance::Performance;
use serde::{Deserialize, Serialize};

/// Relative slack on flow-domain edges to absorb affinity rounding.
const DOMAIN_EPS: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalCheck {
    pub capable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PhysicalCheck {
    pub fn capable() -> Self {
        Self {
            capable: true,
            reason: None,
        }
    }

    pub fn incapable(reason: impl Into<String>) -> Self {
        Self {
            capable: false,
            reason: Some(reason.into()),
        }
    }
}

/// Check that `perf` is physically deliverable for `duty`.
///
/// The first failing rule wins. Under trim, head and efficiency are read on
/// the reference curve at the duty flow while the flow domain is scaled by the
/// diameter ratio, so a duty near the end of the reference curve can be sized
/// and still fail the domain rule.
pub fn check_physical(
    perf: &Performance,
    duty: &DutyPoint,
    config: &SelectionConfig,
) -> PhysicalCheck {
    if perf.efficiency.is_nan() || perf.efficiency <= 0.0 {
        return PhysicalCheck::incapable(format!(
            "no efficiency at {:.2} m3/h (curve reads {:.1}%)",
            perf.flow, perf.efficiency
        ));
    }

    match perf.method {
        SelectionMethod::ImpellerTrim => {
            if let Some(trim) = &perf.trim {
                if trim.required_trim_pct < config.trim_min_pct {
                    return PhysicalCheck::incapable(format!(
                        "requires {:.1}% impeller diameter, below minimum trim {:.1}%",
                        trim.required_trim_pct, config.trim_min_pct
                    ));
                }
                if trim.trim_pct > config.trim_max_pct {
                    return PhysicalCheck::incapable(format!(
                        "trim {:.1}% above maximum {:.1}%",
                        trim.trim_pct, config.trim_max_pct
                    ));
                }
            }
        }
        SelectionMethod::SpeedVariation => {
            if let Some(speed) = &perf.speed
                && (speed.speed_ratio < config.min_speed_ratio
                    || speed.speed_ratio > config.max_speed_ratio)
            {
                return PhysicalCheck::incapable(format!(
                    "requires {:.1}% speed, outside drive range {:.1}-{:.1}%",
                    speed.speed_ratio * 100.0,
                    config.min_speed_ratio * 100.0,
                    config.max_speed_ratio * 100.0
                ));
            }
        }
        SelectionMethod::None => {}
    }

    let (lo, hi) = perf.flow_domain;
    let slack = DOMAIN_EPS * hi.abs().max(1.0);
    if duty.flow < lo - slack || duty.flow > hi + slack {
        return PhysicalCheck::incapable(format!(
            "flow {:.2} m3/h outside adjusted curve range {:.2}-{:.2} m3/h",
            duty.flow, lo, hi
        ));
    }

    if perf.head * config.tolerance_factor < duty.head {
        return PhysicalCheck::incapable(format!(
            "delivers {:.2} m head, duty needs {:.2} m",
            perf.head, duty.head
        ));
    }

    if let (Some(available), Some(required)) = (duty.npsh_available, perf.npsh_required)
        && available < required
    {
        return PhysicalCheck::incapable(format!(
            "NPSH available {available:.2} m below required {required:.2} m"
        ));
    }

    PhysicalCheck::capable()
}
