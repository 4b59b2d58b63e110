//! Catalog validation logic.
//!
//! Runs once when a catalog is loaded so that the selection engine can rely on
//! curve invariants (ascending distinct flows, at least two points, sane
//! values) without re-checking them per evaluation.

use crate::schema::{Catalog, ImpellerCurve, PumpRecord};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate pump code: {code}")]
    DuplicateCode { code: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid curve for pump '{code}' (diameter {diameter}): {reason}")]
    InvalidCurve {
        code: String,
        diameter: f64,
        reason: String,
    },
}

pub fn validate_catalog(catalog: &Catalog) -> Result<(), ValidationError> {
    let mut codes = HashSet::new();
    for pump in &catalog.pumps {
        if !codes.insert(pump.code.as_str()) {
            return Err(ValidationError::DuplicateCode {
                code: pump.code.clone(),
            });
        }
        validate_pump(pump)?;
    }
    Ok(())
}

pub fn validate_pump(pump: &PumpRecord) -> Result<(), ValidationError> {
    if pump.code.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "pump code".to_string(),
            value: format!("{:?}", pump.code),
            reason: "must not be empty".to_string(),
        });
    }

    // Missing or zero BEP is allowed here; it excludes the pump at selection time.
    for (field, value) in [("bep_flow", pump.bep_flow), ("bep_head", pump.bep_head)] {
        if let Some(v) = value
            && (!v.is_finite() || v < 0.0)
        {
            return Err(ValidationError::InvalidValue {
                field: format!("pump '{}' {}", pump.code, field),
                value: v.to_string(),
                reason: "must be finite and non-negative".to_string(),
            });
        }
    }

    let mut diameters: Vec<f64> = Vec::with_capacity(pump.curves.len());
    for curve in &pump.curves {
        validate_curve(&pump.code, curve)?;
        if diameters.iter().any(|d| *d == curve.diameter) {
            return Err(ValidationError::InvalidCurve {
                code: pump.code.clone(),
                diameter: curve.diameter,
                reason: "duplicate impeller diameter".to_string(),
            });
        }
        diameters.push(curve.diameter);
    }

    Ok(())
}

fn validate_curve(code: &str, curve: &ImpellerCurve) -> Result<(), ValidationError> {
    let fail = |reason: String| ValidationError::InvalidCurve {
        code: code.to_string(),
        diameter: curve.diameter,
        reason,
    };

    if !curve.diameter.is_finite() || curve.diameter <= 0.0 {
        return Err(fail("diameter must be positive and finite".to_string()));
    }
    if !curve.speed.is_finite() || curve.speed <= 0.0 {
        return Err(fail(format!("speed {} must be positive and finite", curve.speed)));
    }
    if curve.points.len() < 2 {
        return Err(fail(format!(
            "needs at least 2 performance points, found {}",
            curve.points.len()
        )));
    }

    for (i, point) in curve.points.iter().enumerate() {
        let finite = point.flow.is_finite()
            && point.head.is_finite()
            && point.efficiency.is_finite()
            && point.power.is_none_or(f64::is_finite)
            && point.npsh.is_none_or(f64::is_finite);
        if !finite {
            return Err(fail(format!("point {i} has a non-finite value")));
        }
        if point.flow < 0.0 || point.head < 0.0 {
            return Err(fail(format!("point {i} has negative flow or head")));
        }
        if !(0.0..=100.0).contains(&point.efficiency) {
            return Err(fail(format!(
                "point {i} efficiency {} outside 0-100",
                point.efficiency
            )));
        }
        if point.power.is_some_and(|p| p < 0.0) || point.npsh.is_some_and(|n| n < 0.0) {
            return Err(fail(format!("point {i} has negative power or NPSH")));
        }
    }

    for (i, pair) in curve.points.windows(2).enumerate() {
        if pair[1].flow <= pair[0].flow {
            return Err(fail(format!(
                "flow must be strictly ascending (points {} and {})",
                i,
                i + 1
            )));
        }
    }

    Ok(())
}
