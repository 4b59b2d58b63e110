//! Scoring weights, thresholds and physical limits.
//!
//! Every field has a documented default; a partial YAML/JSON document only
//! overrides the fields it names.

use crate::error::{EngineError, EngineResult};
use ps_core::units::constants::WATER_DENSITY_KG_M3;
use serde::{Deserialize, Serialize};

/// Coarse admissibility windows applied before any curve math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefilterConfig {
    /// `bep_flow >= max(flow * flow_min_ratio, flow_min_abs)`
    pub flow_min_ratio: f64,
    pub flow_min_abs: f64,
    /// `bep_flow <= flow * flow_max_ratio`
    pub flow_max_ratio: f64,
    /// `bep_head >= head * head_min_ratio`
    pub head_min_ratio: f64,
    /// `bep_head <= head * head_max_ratio`
    pub head_max_ratio: f64,
}

impl Default for PrefilterConfig {
    fn default() -> Self {
        Self {
            flow_min_ratio: 0.4,
            flow_min_abs: 5.0,
            flow_max_ratio: 3.0,
            head_min_ratio: 0.3,
            head_max_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub bep_proximity_max: f64,
    pub efficiency_max: f64,
    pub head_margin_max: f64,

    /// Smallest trimmed diameter, percent of the reference diameter.
    pub trim_min_pct: f64,
    pub trim_max_pct: f64,
    pub trim_exponent_small: f64,
    pub trim_exponent_large: f64,
    /// Estimated trim (percent reduction) below which `trim_exponent_small` applies.
    pub small_trim_boundary_pct: f64,
    /// Head achievability slack, slightly above 1.
    pub tolerance_factor: f64,

    pub min_speed_ratio: f64,
    pub max_speed_ratio: f64,

    pub oversizing_threshold_pct: f64,
    pub severe_oversizing_threshold_pct: f64,
    pub oversizing_base_penalty: f64,
    pub oversizing_slope: f64,
    pub severe_oversizing_penalty: f64,
    pub physical_limit_penalty: f64,

    /// Allowed relative deviation between curve power and hydraulic power.
    pub power_cross_check_tolerance: f64,
    pub fluid_density: f64,

    pub prefilter: PrefilterConfig,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            bep_proximity_max: 45.0,
            efficiency_max: 35.0,
            head_margin_max: 20.0,
            trim_min_pct: 80.0,
            trim_max_pct: 100.0,
            trim_exponent_small: 2.9,
            trim_exponent_large: 2.1,
            small_trim_boundary_pct: 5.0,
            tolerance_factor: 1.02,
            min_speed_ratio: 0.5,
            max_speed_ratio: 1.0,
            oversizing_threshold_pct: 150.0,
            severe_oversizing_threshold_pct: 300.0,
            oversizing_base_penalty: 15.0,
            oversizing_slope: 0.1,
            severe_oversizing_penalty: 30.0,
            physical_limit_penalty: 50.0,
            power_cross_check_tolerance: 0.15,
            fluid_density: WATER_DENSITY_KG_M3,
            prefilter: PrefilterConfig::default(),
        }
    }
}

fn invalid(field: &'static str, value: f64, reason: &'static str) -> EngineError {
    EngineError::InvalidConfig {
        field,
        value,
        reason,
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> EngineResult<()> {
        let non_negative = [
            ("bep_proximity_max", self.bep_proximity_max),
            ("efficiency_max", self.efficiency_max),
            ("head_margin_max", self.head_margin_max),
            ("small_trim_boundary_pct", self.small_trim_boundary_pct),
            ("oversizing_threshold_pct", self.oversizing_threshold_pct),
            ("oversizing_base_penalty", self.oversizing_base_penalty),
            ("oversizing_slope", self.oversizing_slope),
            ("severe_oversizing_penalty", self.severe_oversizing_penalty),
            ("physical_limit_penalty", self.physical_limit_penalty),
            ("power_cross_check_tolerance", self.power_cross_check_tolerance),
            ("prefilter.flow_min_ratio", self.prefilter.flow_min_ratio),
            ("prefilter.flow_min_abs", self.prefilter.flow_min_abs),
            ("prefilter.head_min_ratio", self.prefilter.head_min_ratio),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, value, "must be finite and non-negative"));
            }
        }

        let positive = [
            ("trim_min_pct", self.trim_min_pct),
            ("trim_exponent_small", self.trim_exponent_small),
            ("trim_exponent_large", self.trim_exponent_large),
            ("min_speed_ratio", self.min_speed_ratio),
            ("fluid_density", self.fluid_density),
            ("prefilter.flow_max_ratio", self.prefilter.flow_max_ratio),
            ("prefilter.head_max_ratio", self.prefilter.head_max_ratio),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, value, "must be finite and positive"));
            }
        }

        if !self.trim_max_pct.is_finite() || self.trim_max_pct > 100.0 {
            return Err(invalid("trim_max_pct", self.trim_max_pct, "must not exceed 100"));
        }
        if self.trim_min_pct > self.trim_max_pct {
            return Err(invalid(
                "trim_min_pct",
                self.trim_min_pct,
                "must not exceed trim_max_pct",
            ));
        }
        if !self.tolerance_factor.is_finite() || self.tolerance_factor < 1.0 {
            return Err(invalid(
                "tolerance_factor",
                self.tolerance_factor,
                "must be finite and at least 1",
            ));
        }
        if !self.max_speed_ratio.is_finite() || self.max_speed_ratio < self.min_speed_ratio {
            return Err(invalid(
                "max_speed_ratio",
                self.max_speed_ratio,
                "must be finite and not below min_speed_ratio",
            ));
        }
        if !self.severe_oversizing_threshold_pct.is_finite()
            || self.severe_oversizing_threshold_pct < self.oversizing_threshold_pct
        {
            return Err(invalid(
                "severe_oversizing_threshold_pct",
                self.severe_oversizing_threshold_pct,
                "must not be below oversizing_threshold_pct",
            ));
        }
        if self.prefilter.flow_min_ratio > self.prefilter.flow_max_ratio {
            return Err(invalid(
                "prefilter.flow_min_ratio",
                self.prefilter.flow_min_ratio,
                "must not exceed flow_max_ratio",
            ));
        }
        if self.prefilter.head_min_ratio > self.prefilter.head_max_ratio {
            return Err(invalid(
                "prefilter.head_min_ratio",
                self.prefilter.head_min_ratio,
                "must not exceed head_max_ratio",
            ));
        }

        Ok(())
    }
}
