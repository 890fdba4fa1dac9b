//! Capacity-constrained one-way transfers between strategies.
//!
//! Drain mode moves capital from a designated source vault into a
//! designated target vault instead of searching for a globally optimal
//! allocation. The transfer amount is bounded by everything that could
//! make the on-chain rebalance revert: source-side liquidity, the
//! target's protocol supply cap, the allocator-imposed strategy cap,
//! and any operator-configured soft cap. A 1% haircut on the resulting
//! ceiling absorbs rounding drift between the moment the allocation is
//! computed and the moment the transaction lands.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::earn::{Allocation, EulerEarn, ReturnsDetails};
use crate::error::{DrainRole, SimError};
use crate::math;
use crate::returns::compute_greedy_returns;

/// Operator-supplied drain endpoints and trigger threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainConfig {
    /// Vault to withdraw from
    pub source_vault: Address,
    /// Vault to deposit into
    pub target_vault: Address,
    /// No transfer is attempted while the source allocation is at or
    /// below this amount
    pub threshold: U256,
}

/// Result of a drain computation
#[derive(Debug, Clone, PartialEq)]
pub struct DrainOutcome {
    /// The resulting allocation (a clone of the input when nothing moved)
    pub allocation: Allocation,
    /// Total blended return of the resulting allocation, in percent
    pub total_returns: f64,
    /// Per-vault returns detail of the resulting allocation
    pub details: ReturnsDetails,
    /// Amount moved from source to target; zero marks a deliberate no-op
    pub transferred: U256,
}

/// Computes a capacity-constrained transfer from the drain source into
/// the drain target and re-scores the resulting allocation.
///
/// The input allocation is never mutated; the outcome carries a clone.
/// A zero `transferred` is a deliberate no-op, not an error: the clone
/// is then structurally equal to the input.
pub fn compute_drain_allocation(
    vault: &EulerEarn,
    initial_allocation: &Allocation,
    config: &DrainConfig,
    soft_caps: &HashMap<Address, U256>,
) -> Result<DrainOutcome, SimError> {
    if config.source_vault == config.target_vault {
        return Err(SimError::DrainVaultsIdentical);
    }

    let source_strategy =
        vault
            .strategies
            .get(&config.source_vault)
            .ok_or(SimError::DrainVaultUnknown {
                role: DrainRole::Source,
                vault: config.source_vault,
            })?;
    let target_strategy =
        vault
            .strategies
            .get(&config.target_vault)
            .ok_or(SimError::DrainVaultUnknown {
                role: DrainRole::Target,
                vault: config.target_vault,
            })?;

    let source_entry =
        *initial_allocation
            .get(&config.source_vault)
            .ok_or(SimError::DrainAllocationMissing {
                role: DrainRole::Source,
                vault: config.source_vault,
            })?;
    let target_entry =
        *initial_allocation
            .get(&config.target_vault)
            .ok_or(SimError::DrainAllocationMissing {
                role: DrainRole::Target,
                vault: config.target_vault,
            })?;

    if source_entry.new_amount <= config.threshold {
        return Ok(no_op(vault, initial_allocation));
    }

    let source_details = &source_strategy.details;
    let target_details = &target_strategy.details;

    // Never propose withdrawing more than is both liquid and allocated
    let withdrawable = math::min(
        math::add_delta(source_details.cash, source_entry.diff),
        source_entry.new_amount,
    );

    // Room left under the target's protocol supply cap
    let dest_supply_cap = math::sub_delta(
        target_details
            .supply_cap
            .saturating_sub(target_details.total_borrows)
            .saturating_sub(target_details.cash),
        target_entry.diff,
    );

    // Room left under the allocator-imposed strategy cap
    let dest_strategy_cap = math::zero_floor_sub(target_strategy.cap, target_entry.new_amount);

    // Room left under the operator's soft cap, unbounded when none is set
    let dest_soft_cap = soft_caps
        .get(&config.target_vault)
        .map_or(U256::MAX, |cap| {
            math::zero_floor_sub(*cap, target_entry.new_amount)
        });

    let mut transfer_cap = [dest_supply_cap, dest_strategy_cap, dest_soft_cap]
        .into_iter()
        .fold(withdrawable, math::min);
    if let Some(max_withdraw) = source_details.max_withdraw {
        transfer_cap = math::min(transfer_cap, max_withdraw);
    }

    // Leave a small reserve to avoid rounding issues on-chain; a cap so
    // small the haircut rounds to zero is transferred whole instead
    let haircut = transfer_cap * U256::from(99u64) / U256::from(100u64);
    let transfer_amount = if haircut.is_zero() {
        transfer_cap
    } else {
        haircut
    };

    if transfer_amount.is_zero() {
        return Ok(no_op(vault, initial_allocation));
    }

    let mut allocation = initial_allocation.clone();
    if let Some(entry) = allocation.get_mut(&config.source_vault) {
        entry.withdraw(transfer_amount);
    }
    if let Some(entry) = allocation.get_mut(&config.target_vault) {
        entry.deposit(transfer_amount);
    }

    let returns = compute_greedy_returns(vault, &allocation);
    Ok(DrainOutcome {
        allocation,
        total_returns: returns.total_returns,
        details: returns.details,
        transferred: transfer_amount,
    })
}

/// Scores the allocation untouched and reports a zero transfer
fn no_op(vault: &EulerEarn, initial_allocation: &Allocation) -> DrainOutcome {
    let returns = compute_greedy_returns(vault, initial_allocation);
    DrainOutcome {
        allocation: initial_allocation.clone(),
        total_returns: returns.total_returns,
        details: returns.details,
        transferred: U256::ZERO,
    }
}
