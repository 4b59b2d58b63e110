//! Pre-filter, parallel evaluation, ranking.

use crate::config::SelectionConfig;
use crate::duty::DutyPoint;
use crate::error::{EngineError, EngineResult};
use crate::evaluator::{PumpOutcome, evaluate_pump};
use crate::prefilter::prefilter;
use crate::ranking::{SelectionReport, rank};
use ps_catalog::PumpRecord;
use ps_core::Timer;
use rayon::prelude::*;

/// Run a full selection with the built-in evaluator.
pub fn select(
    duty: &DutyPoint,
    pumps: &[PumpRecord],
    config: &SelectionConfig,
) -> EngineResult<SelectionReport> {
    select_with(duty, pumps, config, |pump| evaluate_pump(pump, duty, config))
}

/// Run a full selection, evaluating each candidate with `evaluate`.
///
/// `evaluate` lets callers wrap evaluation (caching, instrumentation)
/// without touching the algorithm. It runs on rayon worker threads.
pub fn select_with<F>(
    duty: &DutyPoint,
    pumps: &[PumpRecord],
    config: &SelectionConfig,
    evaluate: F,
) -> EngineResult<SelectionReport>
where
    F: Fn(&PumpRecord) -> PumpOutcome + Sync,
{
    config.validate()?;
    duty.validate()?;
    if pumps.is_empty() {
        return Err(EngineError::EmptyCatalog);
    }

    let span = tracing::info_span!("selection", flow = duty.flow, head = duty.head);
    let _enter = span.enter();
    let timer = Timer::start("selection");

    let filtered = prefilter(duty, pumps, &config.prefilter);
    let candidates = filtered.candidates.len();

    let outcomes: Vec<PumpOutcome> = filtered
        .candidates
        .par_iter()
        .map(|pump| evaluate(pump))
        .collect();

    let mut exclusions = filtered.excluded;
    let mut evaluations = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            PumpOutcome::Evaluated(e) => evaluations.push(*e),
            PumpOutcome::Excluded(r) => exclusions.push(r),
        }
    }

    let report = rank(duty.clone(), pumps.len(), candidates, evaluations, exclusions);

    tracing::info!(
        catalog = pumps.len(),
        candidates,
        evaluated = report.summary.evaluated,
        excluded = report.exclusion_summary.total,
        best = ?report.summary.best_pump,
        elapsed_s = timer.elapsed_s(),
        timer = timer.label(),
        "selection finished"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::{ExclusionReason, ExclusionRecord, ExclusionStage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pump(code: &str, bep_flow: f64) -> PumpRecord {
        PumpRecord {
            code: code.to_string(),
            manufacturer: String::new(),
            pump_type: "GENERAL".to_string(),
            variable_speed: false,
            variable_diameter: true,
            bep_flow: Some(bep_flow),
            bep_head: Some(20.0),
            curves: Vec::new(),
        }
    }

    #[test]
    fn empty_catalog_is_a_system_error() {
        let duty = DutyPoint::new(100.0, 20.0).unwrap();
        let err = select(&duty, &[], &SelectionConfig::default()).unwrap_err();
        assert_eq!(err, EngineError::EmptyCatalog);
    }

    #[test]
    fn invalid_inputs_are_rejected_before_evaluation() {
        let calls = AtomicUsize::new(0);
        let pumps = [pump("A", 100.0)];
        let bad_duty = DutyPoint {
            flow: -1.0,
            ..DutyPoint::new(100.0, 20.0).unwrap()
        };
        let result = select_with(&bad_duty, &pumps, &SelectionConfig::default(), |p| {
            calls.fetch_add(1, Ordering::SeqCst);
            PumpOutcome::Excluded(ExclusionRecord::new(
                p.code.clone(),
                ExclusionStage::Evaluation,
                ExclusionReason::NoCurves,
            ))
        });
        assert!(matches!(result, Err(EngineError::InvalidDutyPoint(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn only_candidates_reach_the_evaluator() {
        let calls = AtomicUsize::new(0);
        let pumps = [pump("IN", 100.0), pump("OUT", 1000.0)];
        let duty = DutyPoint::new(100.0, 20.0).unwrap();
        let report = select_with(&duty, &pumps, &SelectionConfig::default(), |p| {
            calls.fetch_add(1, Ordering::SeqCst);
            evaluate_pump(p, &duty, &SelectionConfig::default())
        })
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.summary.candidates, 1);
        assert_eq!(report.exclusion_summary.by_stage[&ExclusionStage::PreFilter], 1);
        // The candidate has no curves, so it is excluded during evaluation.
        assert_eq!(report.exclusion_summary.by_reason["no_curves"], 1);
        assert!(report.is_empty());
    }
}
