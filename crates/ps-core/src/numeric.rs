use crate::PsError;

/// Floating point type for catalog and duty values.
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PsError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, PsError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(PsError::NonPositive { what, value: v })
    }
}

/// Linear interpolation between `(x0, y0)` and `(x1, y1)` evaluated at `x`.
///
/// Degenerate segments (`x0 == x1`) return `y0`.
#[inline]
pub fn lerp(x0: Real, y0: Real, x1: Real, y1: Real, x: Real) -> Real {
    let span = x1 - x0;
    if span == 0.0 {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / span
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(0.0, "flow").is_err());
        assert!(ensure_positive(-1.0, "flow").is_err());
        assert!(matches!(
            ensure_positive(Real::INFINITY, "flow"),
            Err(PsError::NonFinite { .. })
        ));
        assert_eq!(ensure_positive(2.5, "flow").unwrap(), 2.5);
    }

    #[test]
    fn lerp_midpoint_and_degenerate() {
        assert_eq!(lerp(0.0, 10.0, 2.0, 20.0, 1.0), 15.0);
        assert_eq!(lerp(1.0, 7.0, 1.0, 9.0, 1.0), 7.0);
    }
}
