//! Snapshot types for an Euler Earn vault and the strategies it
//! allocates into.
//!
//! Everything here is an immutable value object: snapshots are re-read
//! from chain each run, and allocation transforms always clone before
//! mutating, so concurrent computations over the same snapshot never
//! need coordination.

use std::collections::HashMap;

use alloy_primitives::{Address, I256, U256};

use crate::irm::IrmConfig;
use crate::math;

/// Lending protocol a strategy vault belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Euler,
}

/// An active reward campaign on a strategy vault
#[derive(Debug, Clone, PartialEq)]
pub struct RewardCampaign {
    /// Token the campaign pays out in
    pub reward_token: Address,
    /// Campaign APY in percent
    pub apy: f64,
}

/// Point-in-time snapshot of a strategy vault's on-chain state
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyDetails {
    /// The strategy vault's address
    pub vault: Address,
    /// The strategy vault's share token symbol
    pub symbol: String,
    /// Protocol the vault belongs to
    pub protocol: Protocol,
    /// Idle liquidity held by the vault
    pub cash: U256,
    /// Assets currently borrowed from the vault
    pub total_borrows: U256,
    /// Share tokens outstanding
    pub total_shares: U256,
    /// Interest fee in basis points
    pub interest_fee: u16,
    /// Resolved protocol-level supply cap (`U256::MAX` when uncapped)
    pub supply_cap: U256,
    /// Decimals of the underlying asset
    pub asset_decimals: u8,
    /// The vault's interest-rate-model configuration
    pub irm_config: IrmConfig,
    /// Maximum amount currently withdrawable, when the vault reports one
    pub max_withdraw: Option<U256>,
    /// Borrow APY in percent, derived at read time
    pub borrow_apy: f64,
    /// Supply APY in percent, derived at read time
    pub supply_apy: f64,
    /// Combined reward APY in percent across campaigns
    pub reward_apy: f64,
    /// Active reward campaigns
    pub reward_campaigns: Vec<RewardCampaign>,
}

/// A strategy of the earn vault: its snapshot plus the allocator-imposed
/// cap and the currently allocated amount
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    /// Allocator-imposed cap, independent of the protocol supply cap
    pub cap: U256,
    /// Amount the earn vault currently has allocated here
    pub allocation: U256,
    /// The strategy vault's state snapshot
    pub details: StrategyDetails,
}

/// View of an Euler Earn vault and its strategy set
#[derive(Debug, Clone, PartialEq)]
pub struct EulerEarn {
    /// Strategies keyed by vault address
    pub strategies: HashMap<Address, Strategy>,
    /// Decimals of the earn vault's underlying asset
    pub asset_decimals: u8,
    /// Canonical strategy iteration order for fallback behavior
    pub initial_allocation_queue: Vec<Address>,
    /// Sink vault holding unallocated liquidity, if one is configured
    pub idle_vault: Option<Address>,
}

impl EulerEarn {
    /// Total amount currently allocated across all strategies
    pub fn total_allocated(&self) -> U256 {
        self.strategies
            .values()
            .fold(U256::ZERO, |acc, strategy| acc + strategy.allocation)
    }

    /// Builds the identity allocation reflecting current on-chain state
    pub fn current_allocation(&self) -> Allocation {
        self.strategies
            .iter()
            .map(|(address, strategy)| (*address, AllocationEntry::unchanged(strategy.allocation)))
            .collect()
    }
}

/// One vault's entry in a candidate allocation.
///
/// Invariant: `diff == new_amount - old_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationEntry {
    /// Amount allocated before the rebalance
    pub old_amount: U256,
    /// Amount allocated after the rebalance
    pub new_amount: U256,
    /// Signed change, `new_amount - old_amount`
    pub diff: I256,
}

impl AllocationEntry {
    /// Entry for a vault whose allocation is left untouched
    pub fn unchanged(amount: U256) -> Self {
        Self {
            old_amount: amount,
            new_amount: amount,
            diff: I256::ZERO,
        }
    }

    /// Plans an additional withdrawal of `amount` from this vault
    pub fn withdraw(&mut self, amount: U256) {
        self.new_amount = math::zero_floor_sub(self.new_amount, amount);
        self.diff -= math::to_signed(amount);
    }

    /// Plans an additional deposit of `amount` into this vault
    pub fn deposit(&mut self, amount: U256) {
        self.new_amount = self.new_amount.saturating_add(amount);
        self.diff += math::to_signed(amount);
    }
}

/// Candidate allocation keyed by strategy vault address
pub type Allocation = HashMap<Address, AllocationEntry>;

/// Per-vault yield detail derived from a candidate allocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyReturns {
    /// Supply-side interest APY in percent
    pub interest_apy: f64,
    /// Reward APY in percent
    pub rewards_apy: f64,
    /// Projected utilization as a fraction
    pub utilization: f64,
}

/// Per-vault returns keyed by strategy vault address
pub type ReturnsDetails = HashMap<Address, StrategyReturns>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_entry_withdraw_deposit_keep_invariant() {
        let mut entry = AllocationEntry::unchanged(U256::from(1_000u64));
        entry.withdraw(U256::from(300u64));
        assert_eq!(entry.new_amount, U256::from(700u64));
        assert_eq!(entry.diff, I256::try_from(-300).unwrap());

        entry.deposit(U256::from(100u64));
        assert_eq!(entry.new_amount, U256::from(800u64));
        assert_eq!(entry.diff, I256::try_from(-200).unwrap());
    }

    #[test]
    fn test_unchanged_entry_has_zero_diff() {
        let entry = AllocationEntry::unchanged(U256::from(42u64));
        assert_eq!(entry.old_amount, entry.new_amount);
        assert_eq!(entry.diff, I256::ZERO);
    }
}
