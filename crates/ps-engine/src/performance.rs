//! Achievable performance at a duty point.
//!
//! Three ways to meet a duty point, chosen by the evaluator:
//!
//! - **Impeller trim**: interpolate head at the duty flow on the largest
//!   usable curve, then size the diameter with a two-regime affinity law
//!
//!   ```text
//!   estimate   = 1 - sqrt(H_target / H_base)          (square law)
//!   exponent   = small if estimate < boundary else large
//!   D_required = D_ref * (H_target / H_base)^(1 / exponent)
//!   ```
//!
//! - **Speed variation**: intersect the full-speed curve with the system
//!   parabola `H = H_d (Q / Q_d)^2` and scale with `n = Q_d / Q_1`.
//! - **Rated**: read the full-diameter curve at the duty flow as is.

use crate::config::SelectionConfig;
use crate::curve::CurveView;
use crate::duty::DutyPoint;
use crate::error::{EngineError, EngineResult, Solve, Unachievable};
use crate::mode::SelectionMethod;
use crate::physics::{self, AffinityExponents};
use ps_catalog::{ImpellerCurve, PumpRecord};
use ps_core::units::hydraulic_power_kw;
use serde::{Deserialize, Serialize};

const BISECTION_MAX_ITERS: usize = 200;
const BISECTION_FLOW_TOL: f64 = 1e-10;

/// Diameter sizing result for an impeller trim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimSolution {
    /// Diameter of the curve the trim is sized from (mm).
    pub reference_diameter: f64,
    /// Head of the reference curve at the duty flow.
    pub base_head: f64,
    /// Square-law trim estimate, percent reduction.
    pub estimated_trim_pct: f64,
    pub exponent: f64,
    /// Diameter needed to hit the duty head, percent of reference, unclamped.
    pub required_trim_pct: f64,
    /// `required_trim_pct` clamped to the configured trim range.
    pub trim_pct: f64,
    pub diameter: f64,
    /// Head produced at the duty flow with the clamped diameter.
    pub delivered_head: f64,
}

impl TrimSolution {
    pub fn diameter_ratio(&self) -> f64 {
        self.trim_pct / 100.0
    }

    pub fn is_clamped(&self) -> bool {
        self.trim_pct != self.required_trim_pct
    }
}

/// Speed needed to meet the duty point on the full-diameter curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedSolution {
    pub speed_ratio: f64,
    pub rated_speed: f64,
    pub speed_rpm: f64,
    /// Flow on the full-speed curve that maps onto the duty point.
    pub equivalent_flow: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerSource {
    /// Affinity-scaled catalog power.
    Curve,
    /// `rho g Q H / eta`.
    Hydraulic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerEstimate {
    pub kw: f64,
    pub source: PowerSource,
    /// Relative difference between curve and hydraulic power, when both exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation: Option<f64>,
}

/// Computed operating point of one pump at one duty point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub method: SelectionMethod,
    pub reference_diameter: f64,
    pub rated_speed: f64,
    pub flow: f64,
    /// Head delivered at the duty flow after adjustment.
    pub head: f64,
    /// Efficiency in percent.
    pub efficiency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<PowerEstimate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npsh_required: Option<f64>,
    /// Flow range of the adjusted curve.
    pub flow_domain: (f64, f64),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<TrimSolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<SpeedSolution>,
}

impl Performance {
    pub fn trim_pct(&self) -> Option<f64> {
        self.trim.as_ref().map(|t| t.trim_pct)
    }

    pub fn speed_ratio(&self) -> Option<f64> {
        self.speed.as_ref().map(|s| s.speed_ratio)
    }

    pub fn power_kw(&self) -> Option<f64> {
        self.power.as_ref().map(|p| p.kw)
    }
}

/// Head exponent for a square-law trim estimate.
///
/// The switch at the boundary is deliberately discontinuous.
pub fn trim_exponent(estimated_trim_pct: f64, config: &SelectionConfig) -> f64 {
    if estimated_trim_pct < config.small_trim_boundary_pct {
        config.trim_exponent_small
    } else {
        config.trim_exponent_large
    }
}

/// Head at the duty flow for an impeller cut to `ratio` of the reference.
pub fn head_at_ratio(base_head: f64, ratio: f64, exponent: f64) -> f64 {
    base_head * ratio.powf(exponent)
}

/// Size the trimmed diameter that brings `base_head` down to `target_head`.
pub fn size_trim(
    reference_diameter: f64,
    base_head: f64,
    target_head: f64,
    config: &SelectionConfig,
) -> TrimSolution {
    let head_ratio = target_head / base_head;
    let estimated_trim_pct = (1.0 - head_ratio.sqrt()) * 100.0;
    let exponent = trim_exponent(estimated_trim_pct, config);

    let required_trim_pct = head_ratio.powf(1.0 / exponent) * 100.0;
    let trim_pct = required_trim_pct.clamp(config.trim_min_pct, config.trim_max_pct);
    let ratio = trim_pct / 100.0;

    TrimSolution {
        reference_diameter,
        base_head,
        estimated_trim_pct,
        exponent,
        required_trim_pct,
        trim_pct,
        diameter: reference_diameter * ratio,
        delivered_head: head_at_ratio(base_head, ratio, exponent),
    }
}

fn usable_range(pump: &PumpRecord, curve: &ImpellerCurve) -> EngineResult<(f64, f64)> {
    match curve.flow_range() {
        Some(range) if curve.points.len() >= 2 => Ok(range),
        _ => Err(EngineError::InvalidCurve {
            what: format!(
                "pump '{}' curve {} has fewer than two points",
                pump.code, curve.diameter
            ),
        }),
    }
}

fn reference_curve(pump: &PumpRecord) -> EngineResult<&ImpellerCurve> {
    pump.reference_curve().ok_or_else(|| EngineError::InvalidCurve {
        what: format!("pump '{}' has no curves", pump.code),
    })
}

/// Bisection on a bracketed sign change of `f` over `[lo, hi]`.
fn bisect(f: impl Fn(f64) -> f64, mut lo: f64, mut hi: f64) -> f64 {
    let mut f_lo = f(lo);
    for _ in 0..BISECTION_MAX_ITERS {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid == 0.0 || (hi - lo) <= BISECTION_FLOW_TOL * mid.abs().max(1.0) {
            return mid;
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Computes performance for a pump under a given adjustment method.
pub struct PerformanceCalculator<'a> {
    config: &'a SelectionConfig,
}

impl<'a> PerformanceCalculator<'a> {
    pub fn new(config: &'a SelectionConfig) -> Self {
        Self { config }
    }

    pub fn solve(
        &self,
        pump: &PumpRecord,
        duty: &DutyPoint,
        method: SelectionMethod,
    ) -> EngineResult<Solve<Performance>> {
        match method {
            SelectionMethod::ImpellerTrim => self.trim(pump, duty),
            SelectionMethod::SpeedVariation => self.speed(pump, duty),
            SelectionMethod::None => self.rated(pump, duty),
        }
    }

    /// Size an impeller trim, walking curves from the largest diameter down.
    pub fn trim(&self, pump: &PumpRecord, duty: &DutyPoint) -> EngineResult<Solve<Performance>> {
        if pump.curves.is_empty() {
            return Err(EngineError::InvalidCurve {
                what: format!("pump '{}' has no curves", pump.code),
            });
        }
        let exps = physics::exponents_for(&pump.pump_type);
        let mut first_failure: Option<Unachievable> = None;

        for curve in &pump.curves {
            let (lo, hi) = usable_range(pump, curve)?;
            let view = CurveView::new(curve);

            let Some(base_head) = view.head_at(duty.flow) else {
                first_failure.get_or_insert(Unachievable::FlowOutsideCurve {
                    flow: duty.flow,
                    min: lo,
                    max: hi,
                });
                continue;
            };
            // Cutting the impeller only lowers head at a given flow.
            if duty.head > base_head * self.config.tolerance_factor {
                first_failure.get_or_insert(Unachievable::HeadUnachievable {
                    target: duty.head,
                    available: base_head,
                });
                continue;
            }

            let trim = size_trim(curve.diameter, base_head, duty.head, self.config);
            let ratio = trim.diameter_ratio();
            let efficiency = view.efficiency_at(duty.flow).unwrap_or(0.0);
            let npsh_required = view.npsh_at(duty.flow).map(|n| exps.scale_head(n, ratio));
            let curve_power = view.power_at(duty.flow).map(|p| exps.scale_power(p, ratio));
            let power = self.resolve_power(
                &pump.code,
                curve_power,
                duty.flow,
                trim.delivered_head,
                efficiency,
            );

            tracing::debug!(
                pump = %pump.code,
                reference_diameter = curve.diameter,
                exponent = trim.exponent,
                required_trim_pct = trim.required_trim_pct,
                trim_pct = trim.trim_pct,
                "impeller trim sized"
            );

            return Ok(Solve::Achieved(Performance {
                method: SelectionMethod::ImpellerTrim,
                reference_diameter: curve.diameter,
                rated_speed: curve.speed,
                flow: duty.flow,
                head: trim.delivered_head,
                efficiency,
                power,
                npsh_required,
                flow_domain: (exps.scale_flow(lo, ratio), exps.scale_flow(hi, ratio)),
                trim: Some(trim),
                speed: None,
            }));
        }

        match first_failure {
            Some(reason) => Ok(Solve::Unachievable(reason)),
            None => Err(EngineError::InvalidCurve {
                what: format!("pump '{}' has no usable curves", pump.code),
            }),
        }
    }

    /// Solve for the drive speed on the full-diameter curve.
    pub fn speed(&self, pump: &PumpRecord, duty: &DutyPoint) -> EngineResult<Solve<Performance>> {
        let curve = reference_curve(pump)?;
        let (lo, hi) = usable_range(pump, curve)?;
        let view = CurveView::new(curve);
        let exps = AffinityExponents::NOMINAL;

        let k = duty.head / (duty.flow * duty.flow);
        let residual = |q: f64| view.head_at(q).map(|h| h - k * q * q);
        let no_intersection = Unachievable::NoSystemIntersection {
            flow: duty.flow,
            head: duty.head,
        };

        let (Some(r_lo), Some(r_hi)) = (residual(lo), residual(hi)) else {
            return Err(EngineError::InvalidCurve {
                what: format!("pump '{}' curve cannot be read at its own bounds", pump.code),
            });
        };
        // Pump curve must start above the system parabola and end below it.
        if r_lo < 0.0 || r_hi > 0.0 {
            return Ok(Solve::Unachievable(no_intersection));
        }

        let q1 = if r_lo == 0.0 {
            lo
        } else if r_hi == 0.0 {
            hi
        } else {
            bisect(|q| residual(q).unwrap_or(f64::NAN), lo, hi)
        };
        if q1.is_nan() || q1 <= 0.0 {
            return Ok(Solve::Unachievable(no_intersection));
        }

        let n = duty.flow / q1;
        let base_head = view.head_at(q1).unwrap_or(0.0);
        let head = exps.scale_head(base_head, n);
        let efficiency = view.efficiency_at(q1).unwrap_or(0.0);
        let npsh_required = view.npsh_at(q1).map(|h| exps.scale_head(h, n));
        let curve_power = view.power_at(q1).map(|p| exps.scale_power(p, n));
        let power = self.resolve_power(&pump.code, curve_power, duty.flow, head, efficiency);

        tracing::debug!(
            pump = %pump.code,
            speed_ratio = n,
            equivalent_flow = q1,
            "speed variation solved"
        );

        Ok(Solve::Achieved(Performance {
            method: SelectionMethod::SpeedVariation,
            reference_diameter: curve.diameter,
            rated_speed: curve.speed,
            flow: duty.flow,
            head,
            efficiency,
            power,
            npsh_required,
            flow_domain: (exps.scale_flow(lo, n), exps.scale_flow(hi, n)),
            trim: None,
            speed: Some(SpeedSolution {
                speed_ratio: n,
                rated_speed: curve.speed,
                speed_rpm: curve.speed * n,
                equivalent_flow: q1,
            }),
        }))
    }

    /// Read the full-diameter curve at rated speed without adjustment.
    pub fn rated(&self, pump: &PumpRecord, duty: &DutyPoint) -> EngineResult<Solve<Performance>> {
        let curve = reference_curve(pump)?;
        let (lo, hi) = usable_range(pump, curve)?;
        let view = CurveView::new(curve);

        let Some(head) = view.head_at(duty.flow) else {
            return Ok(Solve::Unachievable(Unachievable::FlowOutsideCurve {
                flow: duty.flow,
                min: lo,
                max: hi,
            }));
        };
        let efficiency = view.efficiency_at(duty.flow).unwrap_or(0.0);
        let npsh_required = view.npsh_at(duty.flow);
        let power = self.resolve_power(
            &pump.code,
            view.power_at(duty.flow),
            duty.flow,
            head,
            efficiency,
        );

        Ok(Solve::Achieved(Performance {
            method: SelectionMethod::None,
            reference_diameter: curve.diameter,
            rated_speed: curve.speed,
            flow: duty.flow,
            head,
            efficiency,
            power,
            npsh_required,
            flow_domain: (lo, hi),
            trim: None,
            speed: None,
        }))
    }

    /// Cross-check curve power against hydraulic power.
    fn resolve_power(
        &self,
        code: &str,
        curve_kw: Option<f64>,
        flow: f64,
        head: f64,
        efficiency: f64,
    ) -> Option<PowerEstimate> {
        let hydraulic_kw = hydraulic_power_kw(flow, head, self.config.fluid_density, efficiency);
        match (curve_kw, hydraulic_kw) {
            (Some(c), Some(h)) => {
                let deviation = (c - h).abs() / h;
                if deviation > self.config.power_cross_check_tolerance {
                    tracing::warn!(
                        pump = %code,
                        curve_kw = c,
                        hydraulic_kw = h,
                        deviation,
                        "curve power disagrees with hydraulic power, using hydraulic"
                    );
                    Some(PowerEstimate {
                        kw: h,
                        source: PowerSource::Hydraulic,
                        deviation: Some(deviation),
                    })
                } else {
                    Some(PowerEstimate {
                        kw: c,
                        source: PowerSource::Curve,
                        deviation: Some(deviation),
                    })
                }
            }
            (Some(c), None) => Some(PowerEstimate {
                kw: c,
                source: PowerSource::Curve,
                deviation: None,
            }),
            (None, Some(h)) => Some(PowerEstimate {
                kw: h,
                source: PowerSource::Hydraulic,
                deviation: None,
            }),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_catalog::{GENERAL_PUMP_TYPE, PerformancePoint};

    /// Parabolic curve `H = shutoff - c Q^2`, sampled every 10 m³/h.
    fn parabolic_curve(diameter: f64, shutoff: f64, c: f64, q_max: f64) -> ImpellerCurve {
        let mut points = Vec::new();
        let mut q = 0.0;
        while q <= q_max + 1e-9 {
            let eff = (80.0 - 0.004 * (q - 100.0) * (q - 100.0)).max(5.0);
            points.push(
                PerformancePoint::new(q, shutoff - c * q * q, eff).with_npsh(1.0 + 0.0002 * q * q),
            );
            q += 10.0;
        }
        ImpellerCurve {
            diameter,
            speed: 1450.0,
            points,
        }
    }

    fn pump(curves: Vec<ImpellerCurve>) -> PumpRecord {
        PumpRecord {
            code: "T-1".to_string(),
            manufacturer: "Test".to_string(),
            pump_type: GENERAL_PUMP_TYPE.to_string(),
            variable_speed: true,
            variable_diameter: true,
            bep_flow: Some(100.0),
            bep_head: Some(40.0),
            curves,
        }
    }

    fn duty(flow: f64, head: f64) -> DutyPoint {
        DutyPoint::new(flow, head).unwrap()
    }

    #[test]
    fn small_trim_uses_steep_exponent() {
        let config = SelectionConfig::default();
        // head ratio 0.95 -> square-law estimate ~2.5%
        let sol = size_trim(250.0, 100.0, 95.0, &config);
        assert!(sol.estimated_trim_pct < 5.0);
        assert_eq!(sol.exponent, 2.9);
        assert!((sol.required_trim_pct - 0.95_f64.powf(1.0 / 2.9) * 100.0).abs() < 1e-9);
        assert!(!sol.is_clamped());
    }

    #[test]
    fn large_trim_uses_shallow_exponent() {
        let config = SelectionConfig::default();
        let sol = size_trim(250.0, 100.0, 80.0, &config);
        assert!(sol.estimated_trim_pct >= 5.0);
        assert_eq!(sol.exponent, 2.1);
        assert!((sol.diameter - 250.0 * 0.8_f64.powf(1.0 / 2.1)).abs() < 1e-9);
    }

    #[test]
    fn exponent_switches_exactly_at_boundary() {
        let config = SelectionConfig::default();
        assert_eq!(trim_exponent(4.999_999, &config), 2.9);
        assert_eq!(trim_exponent(5.0, &config), 2.1);

        // Head ratios either side of a 5% square-law estimate.
        let at_boundary = 0.95_f64 * 0.95;
        let below = size_trim(200.0, 100.0, at_boundary * 100.0 + 1e-6, &config);
        let above = size_trim(200.0, 100.0, at_boundary * 100.0 - 1e-6, &config);
        assert_eq!(below.exponent, 2.9);
        assert_eq!(above.exponent, 2.1);
        // The discontinuity shows up in the sized diameter.
        assert!((below.trim_pct - above.trim_pct).abs() > 1.0);
    }

    #[test]
    fn trim_is_clamped_to_minimum() {
        let config = SelectionConfig::default();
        let sol = size_trim(250.0, 100.0, 30.0, &config);
        assert!(sol.required_trim_pct < config.trim_min_pct);
        assert_eq!(sol.trim_pct, config.trim_min_pct);
        assert!(sol.is_clamped());
        assert!(sol.delivered_head > 30.0);
    }

    #[test]
    fn head_slightly_above_curve_within_tolerance_keeps_full_diameter() {
        let config = SelectionConfig::default();
        let sol = size_trim(250.0, 100.0, 101.0, &config);
        assert_eq!(sol.trim_pct, 100.0);
        assert_eq!(sol.delivered_head, 100.0);
    }

    #[test]
    fn trim_round_trip_recovers_target_head() {
        let config = SelectionConfig::default();
        let p = pump(vec![parabolic_curve(250.0, 50.0, 0.001, 200.0)]);
        let d = duty(100.0, 36.0);

        let perf = PerformanceCalculator::new(&config)
            .trim(&p, &d)
            .unwrap()
            .achieved()
            .unwrap();
        let trim = perf.trim.as_ref().unwrap();
        assert_eq!(trim.base_head, 40.0);

        let recomputed = head_at_ratio(
            trim.base_head,
            trim.diameter / trim.reference_diameter,
            trim.exponent,
        );
        assert!((recomputed - d.head).abs() <= d.head * (config.tolerance_factor - 1.0));
        assert!((perf.head - 36.0).abs() < 1e-9);
    }

    #[test]
    fn trim_near_curve_end_is_sized_but_outside_scaled_domain() {
        let config = SelectionConfig::default();
        let p = pump(vec![parabolic_curve(250.0, 50.0, 0.001, 200.0)]);
        let d = duty(195.0, 10.0);

        let perf = PerformanceCalculator::new(&config)
            .trim(&p, &d)
            .unwrap()
            .achieved()
            .unwrap();
        assert!((perf.head - 10.0).abs() < 1e-9);
        assert!(perf.flow_domain.1 < d.flow);

        let check = crate::validator::check_physical(&perf, &d, &config);
        assert!(!check.capable);
        assert!(check.reason.unwrap().contains("outside adjusted curve range"));
    }

    #[test]
    fn trim_reports_head_unachievable() {
        let config = SelectionConfig::default();
        let p = pump(vec![parabolic_curve(250.0, 50.0, 0.001, 200.0)]);
        let result = PerformanceCalculator::new(&config).trim(&p, &duty(100.0, 45.0)).unwrap();
        assert_eq!(
            result,
            Solve::Unachievable(Unachievable::HeadUnachievable {
                target: 45.0,
                available: 40.0
            })
        );
    }

    #[test]
    fn trim_falls_through_to_smaller_curve_with_wider_domain() {
        let config = SelectionConfig::default();
        let p = pump(vec![
            parabolic_curve(250.0, 50.0, 0.001, 150.0),
            parabolic_curve(230.0, 48.0, 0.0009, 220.0),
        ]);
        let perf = PerformanceCalculator::new(&config)
            .trim(&p, &duty(180.0, 15.0))
            .unwrap()
            .achieved()
            .unwrap();
        assert_eq!(perf.reference_diameter, 230.0);
    }

    #[test]
    fn trim_outside_every_curve_is_flow_outside_curve() {
        let config = SelectionConfig::default();
        let p = pump(vec![parabolic_curve(250.0, 50.0, 0.001, 150.0)]);
        let result = PerformanceCalculator::new(&config).trim(&p, &duty(300.0, 10.0)).unwrap();
        assert!(matches!(
            result,
            Solve::Unachievable(Unachievable::FlowOutsideCurve { .. })
        ));
    }

    #[test]
    fn trim_without_curves_is_structural_error() {
        let config = SelectionConfig::default();
        let p = pump(vec![]);
        assert!(PerformanceCalculator::new(&config).trim(&p, &duty(100.0, 30.0)).is_err());
    }

    #[test]
    fn trim_scales_npsh_and_flow_domain() {
        let config = SelectionConfig::default();
        let p = pump(vec![parabolic_curve(250.0, 50.0, 0.001, 200.0)]);
        let perf = PerformanceCalculator::new(&config)
            .trim(&p, &duty(100.0, 36.0))
            .unwrap()
            .achieved()
            .unwrap();
        let ratio = perf.trim_pct().unwrap() / 100.0;
        assert!((perf.npsh_required.unwrap() - 3.0 * ratio * ratio).abs() < 1e-9);
        assert!((perf.flow_domain.1 - 200.0 * ratio).abs() < 1e-9);
        assert_eq!(perf.power.as_ref().unwrap().source, PowerSource::Hydraulic);
    }

    #[test]
    fn speed_variation_meets_duty_head() {
        let config = SelectionConfig::default();
        let p = pump(vec![parabolic_curve(250.0, 50.0, 0.001, 200.0)]);
        let d = duty(80.0, 20.0);
        let perf = PerformanceCalculator::new(&config)
            .speed(&p, &d)
            .unwrap()
            .achieved()
            .unwrap();
        let speed = perf.speed.as_ref().unwrap();

        assert!(speed.speed_ratio > 0.5 && speed.speed_ratio < 1.0);
        assert!((perf.head - 20.0).abs() < 1e-6);
        assert!((speed.speed_rpm - 1450.0 * speed.speed_ratio).abs() < 1e-9);
        assert!((speed.equivalent_flow * speed.speed_ratio - 80.0).abs() < 1e-6);
    }

    #[test]
    fn speed_variation_without_intersection() {
        let config = SelectionConfig::default();
        let p = pump(vec![parabolic_curve(250.0, 50.0, 0.001, 100.0)]);
        // System parabola stays below the pump curve up to the last point.
        let result = PerformanceCalculator::new(&config).speed(&p, &duty(50.0, 5.0)).unwrap();
        assert!(matches!(
            result,
            Solve::Unachievable(Unachievable::NoSystemIntersection { .. })
        ));
    }

    #[test]
    fn duty_above_curve_needs_overspeed() {
        let config = SelectionConfig::default();
        let p = pump(vec![parabolic_curve(250.0, 50.0, 0.001, 200.0)]);
        let perf = PerformanceCalculator::new(&config)
            .speed(&p, &duty(100.0, 60.0))
            .unwrap()
            .achieved()
            .unwrap();
        assert!(perf.speed_ratio().unwrap() > 1.0);
    }

    #[test]
    fn rated_reads_curve_directly() {
        let config = SelectionConfig::default();
        let p = pump(vec![parabolic_curve(250.0, 50.0, 0.001, 200.0)]);
        let perf = PerformanceCalculator::new(&config)
            .rated(&p, &duty(100.0, 30.0))
            .unwrap()
            .achieved()
            .unwrap();
        assert_eq!(perf.method, SelectionMethod::None);
        assert_eq!(perf.head, 40.0);
        assert_eq!(perf.efficiency, 80.0);
        assert_eq!(perf.flow_domain, (0.0, 200.0));
    }

    #[test]
    fn curve_power_within_tolerance_is_preferred() {
        let config = SelectionConfig::default();
        let calc = PerformanceCalculator::new(&config);
        let hydraulic = hydraulic_power_kw(100.0, 40.0, config.fluid_density, 80.0).unwrap();

        let close = calc.resolve_power("P", Some(hydraulic * 1.05), 100.0, 40.0, 80.0).unwrap();
        assert_eq!(close.source, PowerSource::Curve);

        let far = calc.resolve_power("P", Some(hydraulic * 1.5), 100.0, 40.0, 80.0).unwrap();
        assert_eq!(far.source, PowerSource::Hydraulic);
        assert!((far.kw - hydraulic).abs() < 1e-12);

        assert!(calc.resolve_power("P", None, 100.0, 40.0, 0.0).is_none());
    }
}
