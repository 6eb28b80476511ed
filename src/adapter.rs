//! Adapter layer: converts between the Decimal simulation core and the f64
//! values handed to the chart and to JavaScript.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Convert f64 to Decimal (lossy; NaN and infinities map to zero).
pub fn to_decimal(v: f64) -> Decimal {
    Decimal::from_f64(v).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal to f64.
pub fn from_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Host timestamps arrive as JS numbers (milliseconds). Negative or
/// non-finite values collapse to zero.
pub fn millis_from_js(ms: f64) -> u64 {
    if ms.is_finite() && ms > 0.0 {
        ms as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_conversions() {
        assert_eq!(to_decimal(0.5), dec!(0.5));
        assert_eq!(to_decimal(-12.25), dec!(-12.25));
        assert!((from_decimal(dec!(50.05)) - 50.05).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_maps_to_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_millis_from_js() {
        assert_eq!(millis_from_js(1_500.7), 1_500);
        assert_eq!(millis_from_js(-3.0), 0);
        assert_eq!(millis_from_js(f64::NAN), 0);
    }
}
