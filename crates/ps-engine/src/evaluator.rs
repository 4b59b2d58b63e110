//! Per-pump evaluation: mode decision, performance, validation, scoring.

use crate::config::SelectionConfig;
use crate::duty::DutyPoint;
use crate::error::Solve;
use crate::exclusion::{ExclusionReason, ExclusionRecord, ExclusionStage};
use crate::mode::{OperationMode, SelectionMethod, Tier, classify_zone, qbp};
use crate::performance::{Performance, PerformanceCalculator};
use crate::scoring::{ScoreComponents, ScoreInputs};
use crate::validator::{PhysicalCheck, check_physical};
use ps_catalog::PumpRecord;
use ps_core::CountedOutcome;
use serde::{Deserialize, Serialize};

/// Result of evaluating one pump at one duty point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub pump_code: String,
    pub manufacturer: String,
    pub pump_type: String,
    pub operation_mode: OperationMode,
    pub selection_method: SelectionMethod,
    pub bep_flow: f64,
    pub bep_head: f64,
    /// Duty flow as percent of BEP flow.
    pub qbp: f64,
    pub flow_ratio: f64,
    /// Tier from QBP alone.
    pub zone: Tier,
    /// Final tier; marginal whenever the pump is physically incapable.
    pub tier: Tier,
    pub performance: Performance,
    pub physical: PhysicalCheck,
    pub scores: ScoreComponents,
}

impl Evaluation {
    pub fn total_score(&self) -> f64 {
        self.scores.total
    }

    pub fn efficiency(&self) -> f64 {
        self.performance.efficiency
    }

    pub fn is_capable(&self) -> bool {
        self.physical.capable
    }

    /// Audit record for a physically incapable pump.
    pub fn physical_exclusion(&self) -> Option<ExclusionRecord> {
        if self.physical.capable {
            return None;
        }
        let detail = self
            .physical
            .reason
            .clone()
            .unwrap_or_else(|| "physically incapable".to_string());
        Some(ExclusionRecord::new(
            self.pump_code.clone(),
            ExclusionStage::PhysicalIncapable,
            ExclusionReason::PhysicalLimit { detail },
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PumpOutcome {
    Evaluated(Box<Evaluation>),
    Excluded(ExclusionRecord),
}

impl PumpOutcome {
    fn excluded(pump: &PumpRecord, reason: ExclusionReason) -> Self {
        PumpOutcome::Excluded(ExclusionRecord::new(
            pump.code.clone(),
            ExclusionStage::Evaluation,
            reason,
        ))
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        match self {
            PumpOutcome::Evaluated(e) => Some(e),
            PumpOutcome::Excluded(_) => None,
        }
    }
}

impl CountedOutcome for PumpOutcome {
    fn is_success(&self) -> bool {
        matches!(self, PumpOutcome::Evaluated(_))
    }
}

/// Solve with the mode's primary method, then its fallback if the primary
/// cannot reach the duty point. The primary's reason is kept on failure.
fn solve_for_mode(
    calc: &PerformanceCalculator<'_>,
    pump: &PumpRecord,
    duty: &DutyPoint,
    mode: OperationMode,
) -> crate::error::EngineResult<Solve<Performance>> {
    let primary = calc.solve(pump, duty, mode.primary_method())?;
    let Solve::Unachievable(reason) = primary else {
        return Ok(primary);
    };
    let Some(fallback) = mode.fallback_method() else {
        return Ok(Solve::Unachievable(reason));
    };
    tracing::debug!(
        pump = %pump.code,
        %reason,
        method = %fallback,
        "primary method failed, trying fallback"
    );
    match calc.solve(pump, duty, fallback)? {
        Solve::Achieved(perf) => Ok(Solve::Achieved(perf)),
        Solve::Unachievable(_) => Ok(Solve::Unachievable(reason)),
    }
}

/// Evaluate one pump. Never fails: problems become an exclusion record.
pub fn evaluate_pump(pump: &PumpRecord, duty: &DutyPoint, config: &SelectionConfig) -> PumpOutcome {
    let Some((bep_flow, bep_head)) = pump.bep() else {
        return PumpOutcome::excluded(pump, ExclusionReason::MissingBep);
    };
    if pump.curves.is_empty() {
        return PumpOutcome::excluded(pump, ExclusionReason::NoCurves);
    }

    let mode = OperationMode::from_capabilities(pump.variable_speed, pump.variable_diameter);
    let calc = PerformanceCalculator::new(config);
    let performance = match solve_for_mode(&calc, pump, duty, mode) {
        Ok(Solve::Achieved(perf)) => perf,
        Ok(Solve::Unachievable(reason)) => {
            tracing::debug!(pump = %pump.code, %mode, %reason, "duty point unachievable");
            return PumpOutcome::excluded(pump, reason.into());
        }
        Err(err) => {
            tracing::warn!(pump = %pump.code, error = %err, "pump data unusable");
            return PumpOutcome::excluded(
                pump,
                ExclusionReason::InvalidData {
                    message: err.to_string(),
                },
            );
        }
    };

    let physical = check_physical(&performance, duty, config);
    let qbp = qbp(duty.flow, bep_flow);
    let flow_ratio = duty.flow / bep_flow;
    let zone = classify_zone(qbp);
    let tier = if physical.capable { zone } else { Tier::Marginal };

    let scores = ScoreComponents::compute(
        &ScoreInputs {
            flow_ratio,
            efficiency: performance.efficiency,
            delivered_head: performance.head,
            duty_head: duty.head,
            bep_head,
            physically_capable: physical.capable,
        },
        config,
    );

    tracing::debug!(
        pump = %pump.code,
        %mode,
        method = %performance.method,
        trim_pct = ?performance.trim_pct(),
        speed_ratio = ?performance.speed_ratio(),
        qbp,
        tier = tier.label(),
        capable = physical.capable,
        score = scores.total,
        "pump evaluated"
    );

    PumpOutcome::Evaluated(Box::new(Evaluation {
        pump_code: pump.code.clone(),
        manufacturer: pump.manufacturer.clone(),
        pump_type: pump.pump_type.clone(),
        operation_mode: mode,
        selection_method: performance.method,
        bep_flow,
        bep_head,
        qbp,
        flow_ratio,
        zone,
        tier,
        performance,
        physical,
        scores,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_catalog::{ImpellerCurve, PerformancePoint};

    /// `H = shutoff - c Q^2` every 300 m³/h up to 3000, efficiency peaking at 1800.
    fn curve(diameter: f64, shutoff: f64, c: f64) -> ImpellerCurve {
        let points = (0..=10)
            .map(|i| {
                let q = i as f64 * 300.0;
                let eff = 82.0 - 1e-5 * (q - 1800.0) * (q - 1800.0);
                PerformancePoint::new(q, shutoff - c * q * q, eff.max(10.0))
            })
            .collect();
        ImpellerCurve {
            diameter,
            speed: 1480.0,
            points,
        }
    }

    fn pump(code: &str, variable_speed: bool, variable_diameter: bool, shutoff: f64) -> PumpRecord {
        PumpRecord {
            code: code.to_string(),
            manufacturer: "Acme".to_string(),
            pump_type: "END_SUCTION".to_string(),
            variable_speed,
            variable_diameter,
            bep_flow: Some(1800.0),
            bep_head: Some(23.0),
            curves: vec![curve(400.0, shutoff, 2.2e-6)],
        }
    }

    fn duty(flow: f64, head: f64) -> DutyPoint {
        DutyPoint::new(flow, head).unwrap()
    }

    fn evaluated(outcome: PumpOutcome) -> Evaluation {
        match outcome {
            PumpOutcome::Evaluated(e) => *e,
            PumpOutcome::Excluded(r) => panic!("unexpected exclusion: {r:?}"),
        }
    }

    #[test]
    fn near_bep_trim_is_preferred_with_full_bep_points() {
        let config = SelectionConfig::default();
        let e = evaluated(evaluate_pump(
            &pump("P-1", false, true, 30.0),
            &duty(1781.0, 22.0),
            &config,
        ));
        assert_eq!(e.operation_mode, OperationMode::TrimOnly);
        assert_eq!(e.selection_method, SelectionMethod::ImpellerTrim);
        assert!((e.qbp - 98.944).abs() < 0.01);
        assert_eq!(e.tier, Tier::Preferred);
        assert_eq!(e.scores.bep_proximity, 45.0);
        assert!(e.is_capable());
        let trim = e.performance.trim.as_ref().unwrap();
        assert_eq!(trim.exponent, 2.9);
        assert!(trim.trim_pct > 95.0 && trim.trim_pct < 100.0);
        assert!((e.performance.head - 22.0).abs() < 1e-9);
        assert_eq!(e.scores.head_margin, 20.0);
    }

    #[test]
    fn variable_speed_only_uses_speed_variation() {
        let config = SelectionConfig::default();
        let e = evaluated(evaluate_pump(
            &pump("V-1", true, false, 30.0),
            &duty(1781.0, 22.0),
            &config,
        ));
        assert_eq!(e.operation_mode, OperationMode::VfdOnly);
        assert_eq!(e.selection_method, SelectionMethod::SpeedVariation);
        let n = e.performance.speed_ratio().unwrap();
        assert!(n > 0.9 && n < 1.0, "speed ratio {n}");
        assert!(e.is_capable());
    }

    #[test]
    fn fixed_pump_reads_rated_curve() {
        let config = SelectionConfig::default();
        let e = evaluated(evaluate_pump(
            &pump("F-1", false, false, 30.0),
            &duty(1781.0, 22.0),
            &config,
        ));
        assert_eq!(e.operation_mode, OperationMode::Fixed);
        assert_eq!(e.selection_method, SelectionMethod::None);
        assert!(e.performance.trim.is_none());
        assert!(e.performance.speed.is_none());
        assert!(e.performance.head > 22.0);
    }

    #[test]
    fn incapable_pump_is_marginal_with_one_penalty() {
        let config = SelectionConfig::default();
        // Curve far above the duty: trim would need to go below the minimum.
        let p = pump("BIG", false, true, 60.0);
        let d = duty(1781.0, 22.0);
        let e = evaluated(evaluate_pump(&p, &d, &config));
        assert!(!e.is_capable());
        assert_eq!(e.zone, Tier::Preferred);
        assert_eq!(e.tier, Tier::Marginal);
        assert_eq!(e.scores.physical_penalty, -50.0);
        let audit = e.physical_exclusion().unwrap();
        assert_eq!(audit.stage, ExclusionStage::PhysicalIncapable);

        let again = evaluated(evaluate_pump(&p, &d, &config));
        assert_eq!(again.scores, e.scores);
    }

    #[test]
    fn flexible_falls_back_to_speed_when_trim_cannot_reach_head() {
        let config = SelectionConfig::default();
        let e = evaluated(evaluate_pump(
            &pump("FX", true, true, 30.0),
            &duty(1781.0, 26.0),
            &config,
        ));
        assert_eq!(e.operation_mode, OperationMode::Flexible);
        assert_eq!(e.selection_method, SelectionMethod::SpeedVariation);
        // Needs overspeed, which the drive cannot deliver.
        assert!(e.performance.speed_ratio().unwrap() > 1.0);
        assert!(!e.is_capable());
        assert_eq!(e.tier, Tier::Marginal);
    }

    #[test]
    fn trim_only_beyond_curve_is_excluded_at_evaluation() {
        let config = SelectionConfig::default();
        match evaluate_pump(&pump("T", false, true, 30.0), &duty(3500.0, 5.0), &config) {
            PumpOutcome::Excluded(r) => {
                assert_eq!(r.stage, ExclusionStage::Evaluation);
                assert_eq!(r.reason.code(), "flow_outside_curve");
            }
            other => panic!("expected exclusion, got {other:?}"),
        }
    }

    #[test]
    fn missing_data_is_excluded_not_panicking() {
        let config = SelectionConfig::default();
        let mut no_curves = pump("NC", false, true, 30.0);
        no_curves.curves.clear();
        let out = evaluate_pump(&no_curves, &duty(1781.0, 22.0), &config);
        assert!(!out.is_success());
        assert!(matches!(
            out,
            PumpOutcome::Excluded(ExclusionRecord {
                reason: ExclusionReason::NoCurves,
                ..
            })
        ));

        let mut no_bep = pump("NB", false, true, 30.0);
        no_bep.bep_flow = None;
        let out = evaluate_pump(&no_bep, &duty(1781.0, 22.0), &config);
        assert!(out.evaluation().is_none());
    }
}
