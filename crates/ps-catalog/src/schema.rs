//! Catalog schema definitions.
//!
//! Units follow the catalog convention: flow in m³/h, head and NPSH in m,
//! power in kW, impeller diameter in mm, speed in rpm, efficiency in percent.

use serde::{Deserialize, Serialize};

/// Pump-type tag used when a record does not name one.
pub const GENERAL_PUMP_TYPE: &str = "GENERAL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub name: String,
    #[serde(default)]
    pub pumps: Vec<PumpRecord>,
}

impl Catalog {
    pub fn pump(&self, code: &str) -> Option<&PumpRecord> {
        self.pumps.iter().find(|p| p.code == code)
    }
}

/// Field names also accept the upper-case column headers of catalog exports
/// (`PUMP_CODE`, `BEP_FLOW`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpRecord {
    #[serde(alias = "PUMP_CODE")]
    pub code: String,
    #[serde(default, alias = "MANUFACTURER")]
    pub manufacturer: String,
    #[serde(default = "default_pump_type", alias = "PUMP_TYPE")]
    pub pump_type: String,
    /// Pump may be driven by a variable-frequency drive.
    #[serde(default, alias = "VARIABLE_SPEED")]
    pub variable_speed: bool,
    /// Impeller may be trimmed.
    #[serde(default, alias = "VARIABLE_DIAMETER")]
    pub variable_diameter: bool,
    /// Flow at the best efficiency point. Missing or zero means unknown.
    #[serde(default, alias = "BEP_FLOW", skip_serializing_if = "Option::is_none")]
    pub bep_flow: Option<f64>,
    /// Head at the best efficiency point. Missing or zero means unknown.
    #[serde(default, alias = "BEP_HEAD", skip_serializing_if = "Option::is_none")]
    pub bep_head: Option<f64>,
    /// Impeller curves, ordered largest diameter first after loading.
    #[serde(default)]
    pub curves: Vec<ImpellerCurve>,
}

fn default_pump_type() -> String {
    GENERAL_PUMP_TYPE.to_string()
}

impl PumpRecord {
    /// Best efficiency point as `(flow, head)` when both values are usable.
    pub fn bep(&self) -> Option<(f64, f64)> {
        match (self.bep_flow, self.bep_head) {
            (Some(q), Some(h)) if q.is_finite() && h.is_finite() && q > 0.0 && h > 0.0 => {
                Some((q, h))
            }
            _ => None,
        }
    }

    /// Largest-diameter curve.
    pub fn reference_curve(&self) -> Option<&ImpellerCurve> {
        self.curves.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImpellerCurve {
    /// Impeller diameter (mm)
    pub diameter: f64,
    /// Test speed (rpm)
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Performance points, ascending flow
    pub points: Vec<PerformancePoint>,
}

fn default_speed() -> f64 {
    1450.0
}

impl ImpellerCurve {
    /// Flow domain `(min, max)` covered by the curve.
    pub fn flow_range(&self) -> Option<(f64, f64)> {
        Some((self.points.first()?.flow, self.points.last()?.flow))
    }

    /// `true` when every point carries a power value.
    pub fn has_power(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.power.is_some())
    }

    /// `true` when every point carries an NPSH-required value.
    pub fn has_npsh(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.npsh.is_some())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PerformancePoint {
    pub flow: f64,
    pub head: f64,
    /// Efficiency in percent (0-100)
    pub efficiency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    /// NPSH required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npsh: Option<f64>,
}

impl PerformancePoint {
    pub fn new(flow: f64, head: f64, efficiency: f64) -> Self {
        Self {
            flow,
            head,
            efficiency,
            power: None,
            npsh: None,
        }
    }

    pub fn with_power(mut self, power: f64) -> Self {
        self.power = Some(power);
        self
    }

    pub fn with_npsh(mut self, npsh: f64) -> Self {
        self.npsh = Some(npsh);
        self
    }
}
