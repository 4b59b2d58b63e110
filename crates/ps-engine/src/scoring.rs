//! Multi-component scoring.
//!
//! Each component is computed once per evaluation and the total is a plain
//! sum. There is no floor, so totals can go negative.

use crate::config::SelectionConfig;
use serde::{Deserialize, Serialize};

const BEP_REFERENCE_MAX: f64 = 45.0;
const EFFICIENCY_REFERENCE_MAX: f64 = 35.0;
const HEAD_MARGIN_REFERENCE_MAX: f64 = 20.0;

/// BEP proximity bands as `(low, high, points)`, innermost first.
/// Low edges are inclusive on the left side of BEP, high edges on the right.
const BEP_BANDS: [(f64, f64, f64); 5] = [
    (0.95, 1.05, 45.0),
    (0.90, 1.10, 40.0),
    (0.80, 1.20, 30.0),
    (0.70, 1.30, 20.0),
    (0.60, 1.40, 10.0),
];

/// Points for operating at `flow_ratio = flow / bep_flow`.
pub fn bep_proximity_score(flow_ratio: f64, config: &SelectionConfig) -> f64 {
    let points = BEP_BANDS
        .iter()
        .find(|(lo, hi, _)| flow_ratio >= *lo && flow_ratio <= *hi)
        .map_or(0.0, |(_, _, p)| *p);
    points * config.bep_proximity_max / BEP_REFERENCE_MAX
}

/// Points for efficiency in percent.
pub fn efficiency_score(efficiency: f64, config: &SelectionConfig) -> f64 {
    let e = efficiency;
    let points = if e >= 85.0 {
        35.0
    } else if e >= 75.0 {
        30.0 + (e - 75.0) * 0.5
    } else if e >= 65.0 {
        25.0 + (e - 65.0) * 0.5
    } else if e >= 45.0 {
        10.0 + (e - 45.0) * 0.75
    } else if e >= 40.0 {
        ((e - 40.0) * 2.0).max(0.0)
    } else {
        0.0
    };
    points * config.efficiency_max / EFFICIENCY_REFERENCE_MAX
}

/// Head margin over the duty head, percent.
pub fn head_margin_pct(delivered_head: f64, duty_head: f64) -> f64 {
    (delivered_head - duty_head) / duty_head * 100.0
}

/// Points for head margin in percent. Margins at or below 5% score full.
pub fn head_margin_score(margin_pct: f64, config: &SelectionConfig) -> f64 {
    let p = margin_pct;
    let points = if p <= 5.0 {
        20.0
    } else if p <= 10.0 {
        20.0 - (p - 5.0) * 2.0
    } else if p <= 15.0 {
        10.0 - (p - 10.0)
    } else if p <= 20.0 {
        (5.0 - (p - 15.0) * 2.0).max(0.0)
    } else {
        0.0
    };
    points * config.head_margin_max / HEAD_MARGIN_REFERENCE_MAX
}

/// BEP head above the duty head, percent of duty head.
pub fn head_ratio_pct(bep_head: f64, duty_head: f64) -> f64 {
    (bep_head - duty_head) / duty_head * 100.0
}

/// Oversizing penalty, zero or negative.
pub fn oversizing_penalty(head_ratio_pct: f64, config: &SelectionConfig) -> f64 {
    if head_ratio_pct > config.severe_oversizing_threshold_pct {
        -config.severe_oversizing_penalty
    } else if head_ratio_pct > config.oversizing_threshold_pct {
        -config.oversizing_base_penalty
            - (head_ratio_pct - config.oversizing_threshold_pct) * config.oversizing_slope
    } else {
        0.0
    }
}

/// Flat penalty for a physically incapable pump, zero or negative.
pub fn physical_penalty(capable: bool, config: &SelectionConfig) -> f64 {
    if capable {
        0.0
    } else {
        -config.physical_limit_penalty
    }
}

/// Everything the scorer needs from one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub flow_ratio: f64,
    pub efficiency: f64,
    pub delivered_head: f64,
    pub duty_head: f64,
    pub bep_head: f64,
    pub physically_capable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub bep_proximity: f64,
    pub efficiency: f64,
    pub head_margin: f64,
    pub oversizing_penalty: f64,
    pub physical_penalty: f64,
    pub total: f64,
}

impl ScoreComponents {
    pub fn compute(inputs: &ScoreInputs, config: &SelectionConfig) -> Self {
        let bep_proximity = bep_proximity_score(inputs.flow_ratio, config);
        let efficiency = efficiency_score(inputs.efficiency, config);
        let head_margin = head_margin_score(
            head_margin_pct(inputs.delivered_head, inputs.duty_head),
            config,
        );
        let oversizing_penalty =
            oversizing_penalty(head_ratio_pct(inputs.bep_head, inputs.duty_head), config);
        let physical_penalty = physical_penalty(inputs.physically_capable, config);

        Self {
            bep_proximity,
            efficiency,
            head_margin,
            oversizing_penalty,
            physical_penalty,
            total: bep_proximity + efficiency + head_margin + oversizing_penalty + physical_penalty,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn efficiency_score_is_bounded_and_monotone(a in 0.0f64..100.0, b in 0.0f64..100.0) {
            let c = SelectionConfig::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let s_lo = efficiency_score(lo, &c);
            let s_hi = efficiency_score(hi, &c);
            prop_assert!((0.0..=35.0).contains(&s_lo));
            prop_assert!(s_lo <= s_hi + 1e-12);
        }

        #[test]
        fn head_margin_score_is_bounded_and_non_increasing(
            a in -20.0f64..40.0,
            b in -20.0f64..40.0
        ) {
            let c = SelectionConfig::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let s_lo = head_margin_score(lo, &c);
            let s_hi = head_margin_score(hi, &c);
            prop_assert!((0.0..=20.0).contains(&s_lo));
            prop_assert!(s_hi <= s_lo + 1e-12);
        }

        #[test]
        fn efficiency_score_has_no_jumps(e in 40.0f64..99.0) {
            let c = SelectionConfig::default();
            let step = 1e-7;
            let d = (efficiency_score(e + step, &c) - efficiency_score(e, &c)).abs();
            prop_assert!(d < 1e-5);
        }

        #[test]
        fn head_margin_score_has_no_jumps(p in -10.0f64..30.0) {
            let c = SelectionConfig::default();
            let step = 1e-7;
            let d = (head_margin_score(p + step, &c) - head_margin_score(p, &c)).abs();
            prop_assert!(d < 1e-5);
        }

        #[test]
        fn full_bep_points_only_near_bep(r in 0.0f64..3.0) {
            let c = SelectionConfig::default();
            let s = bep_proximity_score(r, &c);
            prop_assert_eq!(s == 45.0, (0.95..=1.05).contains(&r));
        }
    }
}
