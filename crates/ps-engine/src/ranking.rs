//! Tier grouping, deterministic ordering, summary statistics.

use crate::duty::DutyPoint;
use crate::evaluator::Evaluation;
use crate::exclusion::{ExclusionRecord, ExclusionStage};
use crate::mode::Tier;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierGroup {
    pub tier: Tier,
    pub evaluations: Vec<Evaluation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub preferred: usize,
    pub allowable: usize,
    pub acceptable: usize,
    pub marginal: usize,
}

impl TierCounts {
    pub fn get(&self, tier: Tier) -> usize {
        match tier {
            Tier::Preferred => self.preferred,
            Tier::Allowable => self.allowable,
            Tier::Acceptable => self.acceptable,
            Tier::Marginal => self.marginal,
        }
    }

    fn bump(&mut self, tier: Tier) {
        match tier {
            Tier::Preferred => self.preferred += 1,
            Tier::Allowable => self.allowable += 1,
            Tier::Acceptable => self.acceptable += 1,
            Tier::Marginal => self.marginal += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub catalog_size: usize,
    pub candidates: usize,
    pub evaluated: usize,
    pub tier_counts: TierCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_pump: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_efficiency: Option<f64>,
    /// Lowest power among physically capable pumps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_power_kw: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSummary {
    pub total: usize,
    pub by_stage: BTreeMap<ExclusionStage, usize>,
    pub by_reason: BTreeMap<String, usize>,
}

impl ExclusionSummary {
    pub fn from_records(records: &[ExclusionRecord]) -> Self {
        let mut out = ExclusionSummary {
            total: records.len(),
            ..Default::default()
        };
        for r in records {
            *out.by_stage.entry(r.stage).or_default() += 1;
            *out.by_reason.entry(r.reason.code().to_string()).or_default() += 1;
        }
        out
    }
}

/// Complete output of one selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionReport {
    pub duty: DutyPoint,
    /// One group per tier, best tier first. Empty tiers are kept.
    pub tiers: Vec<TierGroup>,
    pub exclusions: Vec<ExclusionRecord>,
    pub summary: SelectionSummary,
    pub exclusion_summary: ExclusionSummary,
}

impl SelectionReport {
    /// All evaluations in final order.
    pub fn ranked(&self) -> impl Iterator<Item = &Evaluation> {
        self.tiers.iter().flat_map(|g| g.evaluations.iter())
    }

    pub fn top(&self, n: usize) -> Vec<&Evaluation> {
        self.ranked().take(n).collect()
    }

    pub fn tier(&self, tier: Tier) -> &[Evaluation] {
        self.tiers
            .iter()
            .find(|g| g.tier == tier)
            .map(|g| g.evaluations.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.summary.evaluated == 0
    }
}

/// Score descending, efficiency descending, pump code ascending.
pub fn compare_evaluations(a: &Evaluation, b: &Evaluation) -> Ordering {
    b.total_score()
        .total_cmp(&a.total_score())
        .then_with(|| b.efficiency().total_cmp(&a.efficiency()))
        .then_with(|| a.pump_code.cmp(&b.pump_code))
}

fn compare_exclusions(a: &ExclusionRecord, b: &ExclusionRecord) -> Ordering {
    a.stage
        .cmp(&b.stage)
        .then_with(|| a.pump_code.cmp(&b.pump_code))
        .then_with(|| a.reason.code().cmp(b.reason.code()))
}

fn best_by(evals: &[Evaluation], key: impl Fn(&Evaluation) -> f64) -> Option<f64> {
    evals.iter().map(key).max_by(|a, b| a.total_cmp(b))
}

/// Group, order and summarise a run.
///
/// `evaluations` may arrive in any order; the output depends only on
/// their contents.
pub fn rank(
    duty: DutyPoint,
    catalog_size: usize,
    candidates: usize,
    evaluations: Vec<Evaluation>,
    mut exclusions: Vec<ExclusionRecord>,
) -> SelectionReport {
    exclusions.extend(evaluations.iter().filter_map(Evaluation::physical_exclusion));
    exclusions.sort_by(compare_exclusions);

    let mut tier_counts = TierCounts::default();
    let mut grouped: BTreeMap<Tier, Vec<Evaluation>> =
        Tier::ALL.iter().map(|t| (*t, Vec::new())).collect();
    let evaluated = evaluations.len();

    let best_score = best_by(&evaluations, Evaluation::total_score);
    let best_efficiency = best_by(&evaluations, Evaluation::efficiency);
    let min_power_kw = evaluations
        .iter()
        .filter(|e| e.is_capable())
        .filter_map(|e| e.performance.power_kw())
        .min_by(|a, b| a.total_cmp(b));

    for e in evaluations {
        tier_counts.bump(e.tier);
        grouped.entry(e.tier).or_default().push(e);
    }

    let tiers: Vec<TierGroup> = grouped
        .into_iter()
        .map(|(tier, mut evaluations)| {
            evaluations.sort_by(compare_evaluations);
            TierGroup { tier, evaluations }
        })
        .collect();

    let best_pump = tiers
        .iter()
        .find_map(|g| g.evaluations.first())
        .map(|e| e.pump_code.clone());

    let exclusion_summary = ExclusionSummary::from_records(&exclusions);

    SelectionReport {
        duty,
        tiers,
        exclusions,
        summary: SelectionSummary {
            catalog_size,
            candidates,
            evaluated,
            tier_counts,
            best_pump,
            best_score,
            best_efficiency,
            min_power_kw,
        },
        exclusion_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionReason;
    use crate::mode::{OperationMode, SelectionMethod};
    use crate::performance::{Performance, PowerEstimate, PowerSource};
    use crate::scoring::ScoreComponents;
    use crate::validator::PhysicalCheck;

    fn eval(
        code: &str,
        tier: Tier,
        total: f64,
        efficiency: f64,
        power: f64,
        capable: bool,
    ) -> Evaluation {
        Evaluation {
            pump_code: code.to_string(),
            manufacturer: "Acme".to_string(),
            pump_type: "GENERAL".to_string(),
            operation_mode: OperationMode::TrimOnly,
            selection_method: SelectionMethod::ImpellerTrim,
            bep_flow: 100.0,
            bep_head: 30.0,
            qbp: 100.0,
            flow_ratio: 1.0,
            zone: tier,
            tier,
            performance: Performance {
                method: SelectionMethod::ImpellerTrim,
                reference_diameter: 250.0,
                rated_speed: 1450.0,
                flow: 100.0,
                head: 30.0,
                efficiency,
                power: Some(PowerEstimate {
                    kw: power,
                    source: PowerSource::Hydraulic,
                    deviation: None,
                }),
                npsh_required: None,
                flow_domain: (0.0, 200.0),
                trim: None,
                speed: None,
            },
            physical: if capable {
                PhysicalCheck::capable()
            } else {
                PhysicalCheck::incapable("too small")
            },
            scores: ScoreComponents {
                bep_proximity: 0.0,
                efficiency: 0.0,
                head_margin: 0.0,
                oversizing_penalty: 0.0,
                physical_penalty: 0.0,
                total,
            },
        }
    }

    fn duty() -> DutyPoint {
        DutyPoint::new(100.0, 30.0).unwrap()
    }

    #[test]
    fn orders_by_score_then_efficiency_then_code() {
        let evals = vec![
            eval("C", Tier::Preferred, 80.0, 70.0, 10.0, true),
            eval("B", Tier::Preferred, 90.0, 70.0, 10.0, true),
            eval("A", Tier::Preferred, 80.0, 70.0, 10.0, true),
            eval("D", Tier::Preferred, 80.0, 75.0, 10.0, true),
        ];
        let report = rank(duty(), 4, 4, evals, Vec::new());
        let codes: Vec<_> = report.ranked().map(|e| e.pump_code.as_str()).collect();
        assert_eq!(codes, ["B", "D", "A", "C"]);
    }

    #[test]
    fn tier_beats_score() {
        let evals = vec![
            eval("HIGH-SCORE", Tier::Allowable, 95.0, 80.0, 10.0, true),
            eval("LOW-SCORE", Tier::Preferred, 60.0, 70.0, 10.0, true),
        ];
        let report = rank(duty(), 2, 2, evals, Vec::new());
        assert_eq!(report.top(1)[0].pump_code, "LOW-SCORE");
        assert_eq!(report.summary.best_pump.as_deref(), Some("LOW-SCORE"));
        assert_eq!(report.summary.best_score, Some(95.0));
        assert_eq!(report.tiers.len(), 4);
        assert!(report.tier(Tier::Acceptable).is_empty());
    }

    #[test]
    fn min_power_ignores_incapable_pumps() {
        let evals = vec![
            eval("OK", Tier::Preferred, 80.0, 70.0, 12.0, true),
            eval("BAD", Tier::Marginal, 20.0, 60.0, 3.0, false),
        ];
        let report = rank(duty(), 2, 2, evals, Vec::new());
        assert_eq!(report.summary.min_power_kw, Some(12.0));
        assert_eq!(report.summary.tier_counts.get(Tier::Marginal), 1);
        assert_eq!(report.summary.best_efficiency, Some(70.0));
    }

    #[test]
    fn exclusions_include_physical_audit_and_are_sorted() {
        let evals = vec![eval("BAD", Tier::Marginal, 20.0, 60.0, 3.0, false)];
        let excluded = vec![
            ExclusionRecord::new("Z", ExclusionStage::PreFilter, ExclusionReason::MissingBep),
            ExclusionRecord::new("A", ExclusionStage::Evaluation, ExclusionReason::NoCurves),
            ExclusionRecord::new("M", ExclusionStage::PreFilter, ExclusionReason::MissingBep),
        ];
        let report = rank(duty(), 4, 2, evals, excluded);
        let order: Vec<_> = report
            .exclusions
            .iter()
            .map(|r| r.pump_code.as_str())
            .collect();
        assert_eq!(order, ["M", "Z", "A", "BAD"]);
        let s = &report.exclusion_summary;
        assert_eq!(s.total, 4);
        assert_eq!(s.by_stage[&ExclusionStage::PreFilter], 2);
        assert_eq!(s.by_stage[&ExclusionStage::PhysicalIncapable], 1);
        assert_eq!(s.by_reason["missing_bep"], 2);
    }

    #[test]
    fn empty_run_is_valid() {
        let report = rank(duty(), 3, 0, Vec::new(), Vec::new());
        assert!(report.is_empty());
        assert!(report.summary.best_pump.is_none());
        assert_eq!(report.ranked().count(), 0);
    }
}
