//! Cheap catalog narrowing before any curve math.

use crate::config::PrefilterConfig;
use crate::duty::DutyPoint;
use crate::exclusion::{ExclusionReason, ExclusionRecord, ExclusionStage};
use crate::physics::normalize_pump_type;
use ps_catalog::PumpRecord;

/// Candidates that passed every rule, and a record for each that did not.
#[derive(Debug, Default)]
pub struct PrefilterOutcome<'a> {
    pub candidates: Vec<&'a PumpRecord>,
    pub excluded: Vec<ExclusionRecord>,
}

/// Admissible BEP flow window `[min, max]` for a duty point.
pub fn flow_window(duty: &DutyPoint, config: &PrefilterConfig) -> (f64, f64) {
    (
        (duty.flow * config.flow_min_ratio).max(config.flow_min_abs),
        duty.flow * config.flow_max_ratio,
    )
}

/// Admissible BEP head window `[min, max]` for a duty point.
pub fn head_window(duty: &DutyPoint, config: &PrefilterConfig) -> (f64, f64) {
    (
        duty.head * config.head_min_ratio,
        duty.head * config.head_max_ratio,
    )
}

/// First rule `pump` fails, if any.
pub fn screen(
    pump: &PumpRecord,
    duty: &DutyPoint,
    config: &PrefilterConfig,
) -> Option<(ExclusionStage, ExclusionReason)> {
    let Some((bep_flow, bep_head)) = pump.bep() else {
        return Some((ExclusionStage::PreFilter, ExclusionReason::MissingBep));
    };

    let (min, max) = flow_window(duty, config);
    if bep_flow < min || bep_flow > max {
        return Some((
            ExclusionStage::PreFilter,
            ExclusionReason::FlowOutOfRange { bep_flow, min, max },
        ));
    }

    let (min, max) = head_window(duty, config);
    if bep_head < min || bep_head > max {
        return Some((
            ExclusionStage::PreFilter,
            ExclusionReason::HeadOutOfRange { bep_head, min, max },
        ));
    }

    if let Some(required) = duty.type_constraint()
        && normalize_pump_type(required) != normalize_pump_type(&pump.pump_type)
    {
        return Some((
            ExclusionStage::TypeConstraint,
            ExclusionReason::PumpTypeMismatch {
                required: required.to_string(),
                actual: pump.pump_type.clone(),
            },
        ));
    }

    None
}

pub fn prefilter<'a, I>(
    duty: &DutyPoint,
    pumps: I,
    config: &PrefilterConfig,
) -> PrefilterOutcome<'a>
where
    I: IntoIterator<Item = &'a PumpRecord>,
{
    let mut out = PrefilterOutcome::default();
    for pump in pumps {
        match screen(pump, duty, config) {
            None => out.candidates.push(pump),
            Some((stage, reason)) => {
                tracing::debug!(
                    pump = %pump.code,
                    %stage,
                    reason = reason.code(),
                    "pre-filter excluded"
                );
                out.excluded
                    .push(ExclusionRecord::new(pump.code.clone(), stage, reason));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_catalog::GENERAL_PUMP_TYPE;

    fn pump(code: &str, bep_flow: Option<f64>, bep_head: Option<f64>) -> PumpRecord {
        PumpRecord {
            code: code.to_string(),
            manufacturer: "Test".to_string(),
            pump_type: GENERAL_PUMP_TYPE.to_string(),
            variable_speed: false,
            variable_diameter: true,
            bep_flow,
            bep_head,
            curves: Vec::new(),
        }
    }

    fn duty() -> DutyPoint {
        DutyPoint::new(1781.0, 22.0).unwrap()
    }

    #[test]
    fn bep_flow_below_window_is_excluded() {
        let pumps = vec![
            pump("LOW", Some(500.0), Some(23.0)),
            pump("OK", Some(1800.0), Some(23.0)),
        ];
        let out = prefilter(&duty(), &pumps, &PrefilterConfig::default());
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].code, "OK");
        assert_eq!(out.excluded.len(), 1);
        let rec = &out.excluded[0];
        assert_eq!(rec.pump_code, "LOW");
        assert_eq!(rec.stage, ExclusionStage::PreFilter);
        match &rec.reason {
            ExclusionReason::FlowOutOfRange { min, .. } => assert!((min - 712.4).abs() < 1e-9),
            other => panic!("unexpected reason {other:?}"),
        }
    }

    #[test]
    fn absolute_floor_applies_to_small_duties() {
        let small = DutyPoint::new(5.0, 10.0).unwrap();
        let (min, max) = flow_window(&small, &PrefilterConfig::default());
        assert_eq!(min, 5.0);
        assert_eq!(max, 15.0);
    }

    #[test]
    fn bep_flow_above_window_is_excluded() {
        let big = pump("BIG", Some(6000.0), Some(23.0));
        let out = prefilter(&duty(), [&big], &PrefilterConfig::default());
        assert!(out.candidates.is_empty());
        assert_eq!(out.excluded[0].reason.code(), "flow_out_of_range");
    }

    #[test]
    fn head_window_is_enforced() {
        let pumps = [
            pump("H-LOW", Some(1800.0), Some(6.0)),
            pump("H-HIGH", Some(1800.0), Some(45.0)),
            pump("H-EDGE", Some(1800.0), Some(44.0)),
        ];
        let out = prefilter(&duty(), &pumps, &PrefilterConfig::default());
        let codes: Vec<_> = out.candidates.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, ["H-EDGE"]);
        assert!(out.excluded.iter().all(|r| r.reason.code() == "head_out_of_range"));
    }

    #[test]
    fn missing_or_zero_bep_is_excluded() {
        let pumps = [pump("NONE", None, Some(23.0)), pump("ZERO", Some(0.0), Some(23.0))];
        let out = prefilter(&duty(), &pumps, &PrefilterConfig::default());
        assert!(out.candidates.is_empty());
        assert!(out.excluded.iter().all(|r| r.reason == ExclusionReason::MissingBep));
    }

    #[test]
    fn type_constraint_is_case_insensitive() {
        let mut axial = pump("AX", Some(1800.0), Some(23.0));
        axial.pump_type = "Axial-Flow".to_string();
        let general = pump("GEN", Some(1800.0), Some(23.0));
        let pumps = [axial, general];

        let d = duty().with_pump_type("axial_flow");
        let out = prefilter(&d, &pumps, &PrefilterConfig::default());
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].code, "AX");
        assert_eq!(out.excluded[0].stage, ExclusionStage::TypeConstraint);

        let any = duty().with_pump_type("ANY");
        let out = prefilter(&any, &pumps, &PrefilterConfig::default());
        assert_eq!(out.candidates.len(), 2);
    }
}
