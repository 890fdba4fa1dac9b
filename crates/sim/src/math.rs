//! Fixed-point math helpers shared by the rate evaluators and the
//! allocation algorithms.
//!
//! EVK vaults quote per-second interest rates on a 1e27 scale and
//! utilization on a `u32` scale; the adaptive rate model works in WAD
//! (1e18). The helpers here keep those conversions in one place.

use alloy_primitives::{I256, U256};

/// 1e18, the WAD fixed-point scale.
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// 1e27, the scale EVK per-second interest rates are quoted in.
pub const RAY: U256 = U256::from_limbs([11_515_845_246_265_065_472, 54_210_108, 0, 0]);

/// `u32::MAX`, the fixed-point scale EVK quotes utilization in.
pub const UTILIZATION_SCALE: U256 = U256::from_limbs([4_294_967_295, 0, 0, 0]);

/// Seconds in a 365.2425-day Gregorian year, the convention EVK uses for
/// annualizing per-second rates.
pub const SECONDS_PER_YEAR: f64 = 31_556_952.0;

/// Returns the smaller of two values
pub fn min(a: U256, b: U256) -> U256 {
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the larger of two values
pub fn max(a: U256, b: U256) -> U256 {
    if a > b {
        a
    } else {
        b
    }
}

/// Subtraction floored at zero instead of underflowing
pub fn zero_floor_sub(a: U256, b: U256) -> U256 {
    a.saturating_sub(b)
}

/// Multiply two WAD-scaled values, rounding down
pub fn w_mul_down(a: U256, b: U256) -> U256 {
    a * b / WAD
}

/// Divide two WAD-scaled values, rounding down
pub fn w_div_down(a: U256, b: U256) -> U256 {
    a * WAD / b
}

/// `a * b / denominator`, rounding down
pub fn mul_div_down(a: U256, b: U256, denominator: U256) -> U256 {
    a * b / denominator
}

/// Clamps a signed value to zero from below and returns it unsigned
pub fn positive(value: I256) -> U256 {
    if value.is_negative() {
        U256::ZERO
    } else {
        value.unsigned_abs()
    }
}

/// Converts an unsigned amount to a signed delta.
///
/// Token amounts are far below `I256::MAX`, so the saturation is a
/// formality to keep the conversion total.
pub fn to_signed(value: U256) -> I256 {
    I256::try_from(value).unwrap_or(I256::MAX)
}

/// `base + delta`, floored at zero when the delta is negative
pub fn add_delta(base: U256, delta: I256) -> U256 {
    if delta.is_negative() {
        base.saturating_sub(delta.unsigned_abs())
    } else {
        base.saturating_add(delta.unsigned_abs())
    }
}

/// `base - delta`, floored at zero when the delta is positive
pub fn sub_delta(base: U256, delta: I256) -> U256 {
    if delta.is_negative() {
        base.saturating_add(delta.unsigned_abs())
    } else {
        base.saturating_sub(delta.unsigned_abs())
    }
}

/// Lossy conversion of an amount to `f64` for ratio and weighting math
pub fn to_f64(value: U256) -> f64 {
    value.saturating_to::<u128>() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_is_1e27() {
        assert_eq!(RAY, U256::from(10u64).pow(U256::from(27u64)));
    }

    #[test]
    fn test_zero_floor_sub() {
        assert_eq!(zero_floor_sub(U256::from(5), U256::from(3)), U256::from(2));
        assert_eq!(zero_floor_sub(U256::from(3), U256::from(5)), U256::ZERO);
    }

    #[test]
    fn test_w_mul_down_rounds_down() {
        // 0.25 WAD * 7 = 1.75 -> 1
        let quarter = WAD / U256::from(4);
        assert_eq!(w_mul_down(quarter, U256::from(7)), U256::from(1));
    }

    #[test]
    fn test_positive() {
        assert_eq!(positive(I256::try_from(42).unwrap()), U256::from(42));
        assert_eq!(positive(I256::try_from(-42).unwrap()), U256::ZERO);
        assert_eq!(positive(I256::ZERO), U256::ZERO);
    }

    #[test]
    fn test_add_delta_floors_at_zero() {
        let minus_ten = I256::try_from(-10).unwrap();
        assert_eq!(add_delta(U256::from(4), minus_ten), U256::ZERO);
        assert_eq!(add_delta(U256::from(14), minus_ten), U256::from(4));
    }

    #[test]
    fn test_sub_delta() {
        let ten = I256::try_from(10).unwrap();
        let minus_ten = I256::try_from(-10).unwrap();
        assert_eq!(sub_delta(U256::from(25), ten), U256::from(15));
        assert_eq!(sub_delta(U256::from(25), minus_ten), U256::from(35));
        assert_eq!(sub_delta(U256::from(5), ten), U256::ZERO);
    }
}
