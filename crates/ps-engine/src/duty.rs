//! Requested duty point.

use crate::error::{EngineError, EngineResult};
use ps_core::{PsError, ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Application context of a request. Carried through to the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationType {
    #[default]
    General,
    Water,
    Wastewater,
    Hvac,
    Fire,
    Irrigation,
    Industrial,
}

impl FromStr for ApplicationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "GENERAL" => Ok(Self::General),
            "WATER" | "WATER_SUPPLY" => Ok(Self::Water),
            "WASTEWATER" | "WASTE_WATER" => Ok(Self::Wastewater),
            "HVAC" => Ok(Self::Hvac),
            "FIRE" | "FIRE_PROTECTION" => Ok(Self::Fire),
            "IRRIGATION" => Ok(Self::Irrigation),
            "INDUSTRIAL" => Ok(Self::Industrial),
            other => Err(format!("unknown application type '{other}'")),
        }
    }
}

/// Flow (m³/h) and head (m) a pump must deliver, plus request constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyPoint {
    pub flow: f64,
    pub head: f64,
    /// Required pump type. `None`, "any" and "GENERAL" all mean unconstrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump_type: Option<String>,
    #[serde(default)]
    pub application: ApplicationType,
    /// NPSH available at the installation (m), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npsh_available: Option<f64>,
}

impl DutyPoint {
    /// Create a validated duty point.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidDutyPoint`] when flow or head is not a
    /// finite positive number.
    pub fn new(flow: f64, head: f64) -> EngineResult<Self> {
        let duty = Self {
            flow,
            head,
            pump_type: None,
            application: ApplicationType::General,
            npsh_available: None,
        };
        duty.validate()?;
        Ok(duty)
    }

    pub fn with_pump_type(mut self, pump_type: impl Into<String>) -> Self {
        self.pump_type = Some(pump_type.into());
        self
    }

    pub fn with_application(mut self, application: ApplicationType) -> Self {
        self.application = application;
        self
    }

    pub fn with_npsh_available(mut self, npsh: f64) -> Self {
        self.npsh_available = Some(npsh);
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        ensure_positive(self.flow, "duty flow").map_err(EngineError::InvalidDutyPoint)?;
        ensure_positive(self.head, "duty head").map_err(EngineError::InvalidDutyPoint)?;
        if let Some(npsha) = self.npsh_available {
            ensure_finite(npsha, "NPSH available").map_err(EngineError::InvalidDutyPoint)?;
            if npsha < 0.0 {
                return Err(EngineError::InvalidDutyPoint(PsError::InvalidArg {
                    what: "NPSH available must not be negative",
                }));
            }
        }
        Ok(())
    }

    /// The pump-type constraint, if one applies.
    pub fn type_constraint(&self) -> Option<&str> {
        let t = self.pump_type.as_deref()?.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("any") || t.eq_ignore_ascii_case("general") {
            None
        } else {
            Some(t)
        }
    }
}
