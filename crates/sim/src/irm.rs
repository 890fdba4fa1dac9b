//! Interest rate evaluators for EVK lending vaults.
//!
//! Two rate models are in use across the strategies an earn vault
//! allocates into:
//!
//! - **Kinked**: a two-slope linear model. Below the kink utilization the
//!   rate climbs at `slope1` per utilization unit, above it at `slope2`.
//!   Utilization is quoted on the `u32` scale and the slopes are already
//!   per-utilization-unit, so no rescaling happens inside the model.
//! - **Adaptive**: a target-seeking model. An equilibrium `rate_at_target`
//!   is clamped to its configured bounds and then scaled by an asymmetric
//!   curve around the target utilization: `1 / curve_steepness` at zero
//!   utilization, `1` at target, `curve_steepness` at full utilization.
//!   The model is evaluated single-shot from the currently configured
//!   `rate_at_target`; no elapsed-time adaptation is threaded through
//!   this interface.
//!
//! Both evaluators return per-second rates on the 1e27 scale, which
//! [`resolve_borrow_apy`] annualizes by continuous compounding.

use alloy_primitives::U256;

use crate::math::{self, SECONDS_PER_YEAR, UTILIZATION_SCALE, WAD};

/// Scale factor between WAD-quoted adaptive rates and the 1e27
/// per-second scale the kinked model and the APY conversion use.
const RATE_SCALE_FACTOR: U256 = U256::from_limbs([1_000_000_000, 0, 0, 0]);

/// Parameters of the two-slope kinked rate model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KinkedIrm {
    /// Rate at zero utilization (1e27 per-second scale)
    pub base_rate: U256,
    /// Utilization at which the slope changes (`u32` scale)
    pub kink: U256,
    /// Rate increase per utilization unit below the kink
    pub slope1: U256,
    /// Rate increase per utilization unit above the kink
    pub slope2: U256,
}

/// Parameters of the target-seeking adaptive rate model (WAD scale)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveIrm {
    /// Current equilibrium per-second rate at target utilization
    pub rate_at_target: U256,
    /// Utilization the model steers toward
    pub target_utilization: U256,
    /// Rate used before the model's first interaction
    pub initial_rate_at_target: U256,
    /// Lower clamp for the equilibrium rate
    pub min_rate_at_target: U256,
    /// Upper clamp for the equilibrium rate
    pub max_rate_at_target: U256,
    /// Curve multiplier at full utilization
    pub curve_steepness: U256,
    /// Speed at which the equilibrium rate adapts over time
    pub adjustment_speed: U256,
}

/// Interest-rate-model configuration of a strategy vault.
///
/// A closed sum type: adding a model means extending this enum and the
/// matching in [`borrow_rate`], never a silent fallthrough. Unknown tags
/// coming off the chain fail at the decode boundary with
/// [`SimError::UnsupportedModel`](crate::SimError::UnsupportedModel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrmConfig {
    /// Vault without a rate model; the borrow rate is always zero
    NoIrm,
    /// Two-slope kinked model
    Kinked(KinkedIrm),
    /// Target-seeking adaptive model
    Adaptive(AdaptiveIrm),
}

/// Computes the per-second borrow rate for a vault's configured model
pub fn borrow_rate(cash: U256, total_borrows: U256, irm: &IrmConfig) -> U256 {
    match irm {
        IrmConfig::NoIrm => U256::ZERO,
        IrmConfig::Kinked(params) => compute_interest_rate(cash, total_borrows, params),
        IrmConfig::Adaptive(params) => compute_adaptive_interest_rate(cash, total_borrows, params),
    }
}

/// Decodes the compact exponent+mantissa supply-cap encoding into an
/// asset-unit ceiling.
///
/// The low 6 bits are a decimal exponent, the high 10 bits a mantissa
/// scaled by 100: `cap = mantissa * 10^exponent / 100`. A raw value of
/// zero means the vault is uncapped and resolves to `U256::MAX`.
pub fn resolve_supply_cap(amount_cap: u16) -> U256 {
    if amount_cap == 0 {
        return U256::MAX;
    }
    let exponent = U256::from(amount_cap & 63);
    let mantissa = U256::from(amount_cap >> 6);
    U256::from(10u64).pow(exponent) * mantissa / U256::from(100u64)
}

/// Annualizes a per-second rate (1e27 scale) into a continuously
/// compounded percentage: `(e^(rate * seconds_per_year) - 1) * 100`.
pub fn resolve_borrow_apy(rate_per_second: U256) -> f64 {
    let rate = math::to_f64(rate_per_second) / 1e27;
    ((rate * SECONDS_PER_YEAR).exp() - 1.0) * 100.0
}

/// Derives the supply-side APY from the borrow APY.
///
/// Suppliers earn the borrow rate scaled by utilization, minus the
/// vault's interest fee (quoted in basis points). Zero utilization
/// yields exactly zero.
pub fn resolve_supply_apy(borrow_apy: f64, cash: U256, total_borrows: U256, interest_fee: u16) -> f64 {
    let total = cash + total_borrows;
    if total.is_zero() {
        return 0.0;
    }
    let utilization = math::to_f64(total_borrows) / math::to_f64(total);
    let fee_fraction = f64::from(interest_fee) / 10_000.0;
    borrow_apy * utilization * (1.0 - fee_fraction)
}

/// Computes the kinked-model per-second borrow rate.
///
/// Utilization is `total_borrows * u32::MAX / (cash + total_borrows)`;
/// an empty vault is treated as zero utilization and yields exactly the
/// base rate.
pub fn compute_interest_rate(cash: U256, total_borrows: U256, params: &KinkedIrm) -> U256 {
    let total = cash + total_borrows;
    let utilization = if total.is_zero() {
        U256::ZERO
    } else {
        total_borrows * UTILIZATION_SCALE / total
    };

    if utilization <= params.kink {
        params.base_rate + params.slope1 * utilization
    } else {
        params.base_rate
            + params.slope1 * params.kink
            + params.slope2 * (utilization - params.kink)
    }
}

/// Computes the adaptive-model per-second borrow rate (1e27 scale).
///
/// The utilization error is normalized to `[-1, 1]`: by the distance to
/// full utilization above target, by the target itself below it. The
/// clamped `rate_at_target` is then scaled by the asymmetric curve
/// factor and converted from WAD to the 1e27 per-second scale.
pub fn compute_adaptive_interest_rate(cash: U256, total_borrows: U256, params: &AdaptiveIrm) -> U256 {
    let total = cash + total_borrows;
    let utilization = if total.is_zero() {
        U256::ZERO
    } else {
        total_borrows * WAD / total
    };

    let target = params.target_utilization;
    let (err, err_negative) = if utilization >= target {
        let norm = WAD - target;
        if norm.is_zero() {
            (U256::ZERO, false)
        } else {
            (math::w_div_down(utilization - target, norm), false)
        }
    } else {
        (math::w_div_down(target - utilization, target), true)
    };

    let rate_at_target = if params.rate_at_target.is_zero() {
        params.initial_rate_at_target
    } else {
        math::min(
            math::max(params.rate_at_target, params.min_rate_at_target),
            params.max_rate_at_target,
        )
    };

    let factor = if err_negative {
        let coeff = WAD - math::w_div_down(WAD, params.curve_steepness);
        WAD - math::w_mul_down(coeff, err)
    } else {
        let coeff = params.curve_steepness - WAD;
        WAD + math::w_mul_down(coeff, err)
    };

    math::w_mul_down(factor, rate_at_target) * RATE_SCALE_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinked_fixture() -> KinkedIrm {
        KinkedIrm {
            base_rate: U256::from(3_020_253_667_084_197_485u64),
            kink: U256::from(3_951_369_912u64),
            slope1: U256::from(863_158_601u64),
            slope2: U256::from(45_210_010_787u64),
        }
    }

    fn adaptive_fixture() -> AdaptiveIrm {
        AdaptiveIrm {
            rate_at_target: U256::from(634_195_839u64),
            target_utilization: U256::from(900_000_000_000_000_000u64),
            initial_rate_at_target: U256::from(634_195_839u64),
            min_rate_at_target: U256::from(31_709_791u64),
            max_rate_at_target: U256::from(63_419_583_967u64),
            curve_steepness: U256::from(4_000_000_000_000_000_000u64),
            adjustment_speed: U256::from(1_585_489_599_188u64),
        }
    }

    #[test]
    fn test_resolve_supply_cap_uncapped() {
        assert_eq!(resolve_supply_cap(0), U256::MAX);
    }

    #[test]
    fn test_resolve_supply_cap_decodes_mantissa_and_exponent() {
        assert_eq!(
            resolve_supply_cap(28813),
            U256::from(45_000_000_000_000u64)
        );
        assert_eq!(
            resolve_supply_cap(32013),
            U256::from(50_000_000_000_000u64)
        );
    }

    #[test]
    fn test_resolve_supply_cap_monotonic_in_mantissa() {
        // Same exponent, growing mantissa
        let low = resolve_supply_cap((450 << 6) | 13);
        let high = resolve_supply_cap((500 << 6) | 13);
        assert!(low < high);
    }

    #[test]
    fn test_resolve_borrow_apy_zero() {
        assert_eq!(resolve_borrow_apy(U256::ZERO), 0.0);
    }

    #[test]
    fn test_resolve_borrow_apy_known_rates() {
        let apy = resolve_borrow_apy(U256::from(5_533_034_129_750_742_200u64));
        assert!((apy - 19.07765).abs() < 0.001);

        let apy = resolve_borrow_apy(U256::from(2_290_021_605_521_508_540u64));
        assert!((apy - 7.49413).abs() < 0.001);
    }

    #[test]
    fn test_resolve_borrow_apy_strictly_increasing() {
        let mut previous = resolve_borrow_apy(U256::ZERO);
        for rate in [1u64, 1_000_000_000, 2_290_021_605_521_508_540, 5_533_034_129_750_742_200] {
            let apy = resolve_borrow_apy(U256::from(rate));
            assert!(apy > previous);
            previous = apy;
        }
    }

    #[test]
    fn test_resolve_supply_apy_zero_utilization() {
        assert_eq!(resolve_supply_apy(15.0, U256::ZERO, U256::ZERO, 0), 0.0);
    }

    #[test]
    fn test_resolve_supply_apy_no_fee() {
        let apy = resolve_supply_apy(
            15.0,
            U256::from(10_000_000_000u64),
            U256::from(10_000_000_000u64),
            0,
        );
        assert!((apy - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resolve_supply_apy_with_fee() {
        // 10% interest fee on 50% utilization
        let apy = resolve_supply_apy(
            15.0,
            U256::from(10_000_000_000u64),
            U256::from(10_000_000_000u64),
            1000,
        );
        assert!((apy - 6.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_compute_interest_rate_empty_vault_is_base_rate() {
        let params = kinked_fixture();
        let rate = compute_interest_rate(U256::ZERO, U256::ZERO, &params);
        assert_eq!(rate, params.base_rate);
    }

    #[test]
    fn test_compute_interest_rate_below_kink() {
        let rate = compute_interest_rate(
            U256::from(5_151_523_736_830u64),
            U256::from(11_838_253_218_233u64),
            &kinked_fixture(),
        );
        assert_eq!(rate, U256::from(5_603_408_339_543_631_230u64));
    }

    #[test]
    fn test_compute_interest_rate_above_kink() {
        let rate = compute_interest_rate(
            U256::from(1_151_523_736_830u64),
            U256::from(11_838_253_218_233u64),
            &kinked_fixture(),
        );
        assert_eq!(rate, U256::from(6_398_850_687_830_828_338u64));
    }

    #[test]
    fn test_compute_interest_rate_full_utilization() {
        let rate = compute_interest_rate(
            U256::ZERO,
            U256::from(11_838_253_218_233u64),
            &kinked_fixture(),
        );
        assert_eq!(rate, U256::from(21_964_953_984_174_581_018u128));
    }

    #[test]
    fn test_compute_adaptive_interest_rate_zero_utilization() {
        // At zero utilization the curve bottoms out at 1/curve_steepness
        let rate = compute_adaptive_interest_rate(U256::ZERO, U256::ZERO, &adaptive_fixture());
        assert_eq!(rate, U256::from(158_548_959_000_000_000u64));
    }

    #[test]
    fn test_compute_adaptive_interest_rate_below_target() {
        let rate = compute_adaptive_interest_rate(
            U256::from(100_000_000u64),
            U256::from(100_000_000u64),
            &adaptive_fixture(),
        );
        assert_eq!(rate, U256::from(422_797_226_000_000_000u64));
    }

    #[test]
    fn test_compute_adaptive_interest_rate_near_target() {
        let rate = compute_adaptive_interest_rate(
            U256::from(30_000_000u64),
            U256::from(170_000_000u64),
            &adaptive_fixture(),
        );
        assert_eq!(rate, U256::from(607_771_012_000_000_000u64));
    }

    #[test]
    fn test_compute_adaptive_interest_rate_full_utilization() {
        // At full utilization the curve tops out at curve_steepness
        let rate = compute_adaptive_interest_rate(
            U256::ZERO,
            U256::from(170_000_000u64),
            &adaptive_fixture(),
        );
        assert_eq!(rate, U256::from(2_536_783_356_000_000_000u64));
    }

    #[test]
    fn test_compute_adaptive_interest_rate_clamps_rate_at_target() {
        let mut params = adaptive_fixture();
        params.rate_at_target = params.max_rate_at_target * U256::from(10u64);
        let clamped = compute_adaptive_interest_rate(
            U256::from(100_000_000u64),
            U256::from(100_000_000u64),
            &params,
        );

        params.rate_at_target = params.max_rate_at_target;
        let at_max = compute_adaptive_interest_rate(
            U256::from(100_000_000u64),
            U256::from(100_000_000u64),
            &params,
        );
        assert_eq!(clamped, at_max);
    }

    #[test]
    fn test_compute_adaptive_interest_rate_first_interaction() {
        let mut params = adaptive_fixture();
        params.rate_at_target = U256::ZERO;
        // Falls back to the initial rate, which matches the fixture's
        // configured rate_at_target
        let rate = compute_adaptive_interest_rate(U256::ZERO, U256::ZERO, &params);
        assert_eq!(rate, U256::from(158_548_959_000_000_000u64));
    }

    #[test]
    fn test_borrow_rate_no_irm_is_zero() {
        let rate = borrow_rate(U256::from(100u64), U256::from(100u64), &IrmConfig::NoIrm);
        assert_eq!(rate, U256::ZERO);
    }

    #[test]
    fn test_borrow_rate_dispatches_by_model() {
        let kinked = IrmConfig::Kinked(kinked_fixture());
        assert_eq!(
            borrow_rate(U256::ZERO, U256::ZERO, &kinked),
            kinked_fixture().base_rate
        );

        let adaptive = IrmConfig::Adaptive(adaptive_fixture());
        assert_eq!(
            borrow_rate(U256::ZERO, U256::ZERO, &adaptive),
            U256::from(158_548_959_000_000_000u64)
        );
    }
}
