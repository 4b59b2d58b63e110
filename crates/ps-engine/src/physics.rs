//! Affinity-law exponents per pump type.
//!
//! ```text
//! Q2 / Q1 = (x2 / x1)^flow
//! H2 / H1 = (x2 / x1)^head
//! P2 / P1 = (x2 / x1)^power
//! ```
//!
//! where `x` is impeller diameter or rotational speed. The nominal set is
//! `{1, 2, 3}`; high specific-speed designs deviate from it when trimmed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffinityExponents {
    pub flow: f64,
    pub head: f64,
    pub power: f64,
}

impl AffinityExponents {
    pub const NOMINAL: Self = Self {
        flow: 1.0,
        head: 2.0,
        power: 3.0,
    };

    pub fn scale_flow(&self, flow: f64, ratio: f64) -> f64 {
        flow * ratio.powf(self.flow)
    }

    pub fn scale_head(&self, head: f64, ratio: f64) -> f64 {
        head * ratio.powf(self.head)
    }

    pub fn scale_power(&self, power: f64, ratio: f64) -> f64 {
        power * ratio.powf(self.power)
    }
}

impl Default for AffinityExponents {
    fn default() -> Self {
        Self::NOMINAL
    }
}

/// Canonical form of a pump-type tag: upper case, `-` and spaces folded to `_`.
pub fn normalize_pump_type(tag: &str) -> String {
    tag.trim().to_ascii_uppercase().replace(['-', ' '], "_")
}

/// Exponents used when scaling a curve of the given pump type.
pub fn exponents_for(pump_type: &str) -> AffinityExponents {
    match normalize_pump_type(pump_type).as_str() {
        // Mixed and axial flow impellers lose flow faster than radial ones
        // when the outer diameter is cut.
        "MIXED_FLOW" => AffinityExponents {
            flow: 1.2,
            head: 2.0,
            power: 3.2,
        },
        "AXIAL_FLOW" => AffinityExponents {
            flow: 1.4,
            head: 2.0,
            power: 3.4,
        },
        // Stacked stages: every stage is trimmed, interstage leakage rises.
        "MULTISTAGE" => AffinityExponents {
            flow: 1.0,
            head: 2.0,
            power: 2.9,
        },
        _ => AffinityExponents::NOMINAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radial_types_use_nominal_exponents() {
        for tag in ["END_SUCTION", "split case", "GENERAL", "vertical-turbine", "unknown"] {
            assert_eq!(exponents_for(tag), AffinityExponents::NOMINAL, "{tag}");
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(exponents_for("axial-flow"), exponents_for("AXIAL_FLOW"));
        assert_ne!(exponents_for("axial flow"), AffinityExponents::NOMINAL);
    }

    #[test]
    fn nominal_scaling() {
        let e = AffinityExponents::NOMINAL;
        assert!((e.scale_flow(100.0, 0.9) - 90.0).abs() < 1e-12);
        assert!((e.scale_head(50.0, 0.9) - 40.5).abs() < 1e-12);
        assert!((e.scale_power(10.0, 0.5) - 1.25).abs() < 1e-12);
    }
}
