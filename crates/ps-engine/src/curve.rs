//! Piecewise-linear interpolation over an impeller curve.
//!
//! Points are ordered by strictly ascending flow (guaranteed by catalog
//! validation). Queries outside `[first.flow, last.flow]` return `None`
//! rather than extrapolating.

use ps_catalog::{ImpellerCurve, PerformancePoint};
use ps_core::lerp;

/// Quantity read off a performance curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveProperty {
    Head,
    Efficiency,
    Power,
    Npsh,
}

impl CurveProperty {
    fn read(self, point: &PerformancePoint) -> Option<f64> {
        match self {
            CurveProperty::Head => Some(point.head),
            CurveProperty::Efficiency => Some(point.efficiency),
            CurveProperty::Power => point.power,
            CurveProperty::Npsh => point.npsh,
        }
    }
}

/// Interpolate `property` at `flow`.
///
/// Returns `None` when `flow` is outside the curve's domain, when the curve
/// has fewer than two points, or when the bracketing points do not carry the
/// property.
pub fn interpolate(points: &[PerformancePoint], flow: f64, property: CurveProperty) -> Option<f64> {
    if points.len() < 2 || !flow.is_finite() {
        return None;
    }
    let first = points.first()?;
    let last = points.last()?;
    if flow < first.flow || flow > last.flow {
        return None;
    }

    // First index whose flow is >= the query; the domain check above keeps it in range.
    let upper = points.partition_point(|p| p.flow < flow).max(1);
    let lo = &points[upper - 1];
    let hi = &points[upper];

    let y0 = property.read(lo)?;
    let y1 = property.read(hi)?;
    Some(lerp(lo.flow, y0, hi.flow, y1, flow))
}

/// Borrowing view over one impeller curve.
#[derive(Debug, Clone, Copy)]
pub struct CurveView<'a> {
    curve: &'a ImpellerCurve,
}

impl<'a> CurveView<'a> {
    pub fn new(curve: &'a ImpellerCurve) -> Self {
        Self { curve }
    }

    pub fn head_at(&self, flow: f64) -> Option<f64> {
        interpolate(&self.curve.points, flow, CurveProperty::Head)
    }

    pub fn efficiency_at(&self, flow: f64) -> Option<f64> {
        interpolate(&self.curve.points, flow, CurveProperty::Efficiency)
    }

    pub fn power_at(&self, flow: f64) -> Option<f64> {
        interpolate(&self.curve.points, flow, CurveProperty::Power)
    }

    pub fn npsh_at(&self, flow: f64) -> Option<f64> {
        interpolate(&self.curve.points, flow, CurveProperty::Npsh)
    }
}
