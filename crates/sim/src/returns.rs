//! Returns scoring and the equalization search.
//!
//! [`compute_greedy_returns`] converts a candidate allocation into a
//! total blended return plus per-vault detail by re-deriving each
//! strategy's rates at its projected utilization. It is deterministic
//! for a given `(vault, allocation)` pair: strategies are visited in
//! address order so the floating-point blend never depends on map
//! iteration order.

use alloy_primitives::{Address, U256};

use crate::earn::{Allocation, EulerEarn, ReturnsDetails, StrategyReturns};
use crate::irm;
use crate::math;

/// Upper bound on equalization moves per run; each move shifts one
/// step, so this also bounds how far a single run can rebalance.
const EQUALIZE_MAX_MOVES: usize = 64;

/// Total blended return and per-vault detail for a candidate allocation
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyReturns {
    /// Allocation-weighted blend of supply and reward APY, in percent
    pub total_returns: f64,
    /// Per-vault detail at the projected allocation
    pub details: ReturnsDetails,
}

/// Scores a candidate allocation against the vault snapshot.
///
/// Each strategy is evaluated at its projected cash (`cash + diff`,
/// zero-floored): the rate model gives the projected borrow rate, from
/// which supply APY follows with the interest fee applied. Reward APY is
/// carried from the snapshot. Allocation entries with no matching
/// strategy (the idle sink) weigh into the blend at zero yield.
pub fn compute_greedy_returns(vault: &EulerEarn, allocation: &Allocation) -> GreedyReturns {
    let mut addresses: Vec<Address> = allocation.keys().copied().collect();
    addresses.sort_unstable();

    let mut details = ReturnsDetails::new();
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for address in addresses {
        let Some(entry) = allocation.get(&address) else {
            continue;
        };
        let weight = math::to_f64(entry.new_amount);
        total_weight += weight;

        let Some(strategy) = vault.strategies.get(&address) else {
            // idle sink: holds capital at zero yield
            details.insert(
                address,
                StrategyReturns {
                    interest_apy: 0.0,
                    rewards_apy: 0.0,
                    utilization: 0.0,
                },
            );
            continue;
        };

        let d = &strategy.details;
        let projected_cash = math::add_delta(d.cash, entry.diff);
        let rate = irm::borrow_rate(projected_cash, d.total_borrows, &d.irm_config);
        let borrow_apy = irm::resolve_borrow_apy(rate);
        let interest_apy =
            irm::resolve_supply_apy(borrow_apy, projected_cash, d.total_borrows, d.interest_fee);

        let projected_total = projected_cash + d.total_borrows;
        let utilization = if projected_total.is_zero() {
            0.0
        } else {
            math::to_f64(d.total_borrows) / math::to_f64(projected_total)
        };

        details.insert(
            address,
            StrategyReturns {
                interest_apy,
                rewards_apy: d.reward_apy,
                utilization,
            },
        );
        weighted_sum += weight * (interest_apy + d.reward_apy);
    }

    let total_returns = if total_weight == 0.0 {
        0.0
    } else {
        weighted_sum / total_weight
    };

    GreedyReturns {
        total_returns,
        details,
    }
}

/// Computes an equalization-mode candidate allocation.
///
/// Greedy improvement search: repeatedly move one step of capital from
/// the lowest-yielding strategy with withdrawable liquidity into the
/// highest-yielding strategy with cap room, keeping the move only if the
/// re-scored total return improves. Strategies are compared on their
/// projected supply-plus-reward APY, ties broken by address, so the
/// search is deterministic. The returned allocation never violates the
/// protocol supply cap or the allocator-imposed strategy cap.
pub fn compute_equalized_allocation(vault: &EulerEarn, initial_allocation: &Allocation) -> Allocation {
    let mut allocation = initial_allocation.clone();

    let total = allocation
        .values()
        .fold(U256::ZERO, |acc, entry| acc + entry.new_amount);
    if total.is_zero() {
        return allocation;
    }
    let step = math::max(total / U256::from(EQUALIZE_MAX_MOVES as u64), U256::from(1u64));

    let mut best = compute_greedy_returns(vault, &allocation);

    for _ in 0..EQUALIZE_MAX_MOVES {
        let Some((donor, receiver, amount)) = pick_move(vault, &allocation, &best.details, step)
        else {
            break;
        };

        let mut candidate = allocation.clone();
        if let Some(entry) = candidate.get_mut(&donor) {
            entry.withdraw(amount);
        }
        if let Some(entry) = candidate.get_mut(&receiver) {
            entry.deposit(amount);
        }

        let scored = compute_greedy_returns(vault, &candidate);
        if scored.total_returns <= best.total_returns {
            break;
        }
        allocation = candidate;
        best = scored;
    }

    allocation
}

/// Selects the donor/receiver pair for the next equalization move, or
/// `None` when no capacity-respecting move exists.
fn pick_move(
    vault: &EulerEarn,
    allocation: &Allocation,
    details: &ReturnsDetails,
    step: U256,
) -> Option<(Address, Address, U256)> {
    let mut addresses: Vec<Address> = allocation.keys().copied().collect();
    addresses.sort_unstable();

    let mut donor: Option<(Address, f64, U256)> = None;
    let mut receiver: Option<(Address, f64, U256)> = None;

    for address in addresses {
        let (Some(entry), Some(strategy)) =
            (allocation.get(&address), vault.strategies.get(&address))
        else {
            continue;
        };
        let apy = details
            .get(&address)
            .map_or(0.0, |r| r.interest_apy + r.rewards_apy);
        let d = &strategy.details;

        let withdrawable = math::min(math::add_delta(d.cash, entry.diff), entry.new_amount);
        if !withdrawable.is_zero() && donor.map_or(true, |(_, best_apy, _)| apy < best_apy) {
            donor = Some((address, apy, withdrawable));
        }

        let supply_room = math::sub_delta(
            d.supply_cap
                .saturating_sub(d.total_borrows)
                .saturating_sub(d.cash),
            entry.diff,
        );
        let cap_room = math::zero_floor_sub(strategy.cap, entry.new_amount);
        let room = math::min(supply_room, cap_room);
        if !room.is_zero() && receiver.map_or(true, |(_, best_apy, _)| apy > best_apy) {
            receiver = Some((address, apy, room));
        }
    }

    let (donor, _, withdrawable) = donor?;
    let (receiver, _, room) = receiver?;
    if donor == receiver {
        return None;
    }

    let amount = math::min(step, math::min(withdrawable, room));
    if amount.is_zero() {
        return None;
    }
    Some((donor, receiver, amount))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use alloy_primitives::I256;

    use super::*;
    use crate::earn::{AllocationEntry, Protocol, Strategy, StrategyDetails};
    use crate::irm::{IrmConfig, KinkedIrm};

    fn strategy_details(vault: Address, cash: u64, total_borrows: u64) -> StrategyDetails {
        StrategyDetails {
            vault,
            symbol: "eTEST".to_string(),
            protocol: Protocol::Euler,
            cash: U256::from(cash),
            total_borrows: U256::from(total_borrows),
            total_shares: U256::from(cash + total_borrows),
            interest_fee: 0,
            supply_cap: U256::MAX,
            asset_decimals: 6,
            irm_config: IrmConfig::Kinked(KinkedIrm {
                base_rate: U256::ZERO,
                kink: U256::from(3_951_369_912u64),
                slope1: U256::from(863_158_601u64),
                slope2: U256::from(45_210_010_787u64),
            }),
            max_withdraw: None,
            borrow_apy: 0.0,
            supply_apy: 0.0,
            reward_apy: 0.0,
            reward_campaigns: vec![],
        }
    }

    fn address(byte: u8) -> Address {
        Address::with_last_byte(byte)
    }

    fn vault_with(strategies: Vec<(Address, Strategy)>) -> EulerEarn {
        let queue = strategies.iter().map(|(a, _)| *a).collect();
        EulerEarn {
            strategies: strategies.into_iter().collect(),
            asset_decimals: 6,
            initial_allocation_queue: queue,
            idle_vault: None,
        }
    }

    #[test]
    fn test_compute_greedy_returns_empty_allocation() {
        let vault = vault_with(vec![]);
        let returns = compute_greedy_returns(&vault, &HashMap::new());
        assert_eq!(returns.total_returns, 0.0);
        assert!(returns.details.is_empty());
    }

    #[test]
    fn test_compute_greedy_returns_weights_by_new_amount() {
        let a = address(1);
        let b = address(2);
        // a is fully idle (zero yield), b is half utilized
        let vault = vault_with(vec![
            (
                a,
                Strategy {
                    cap: U256::MAX,
                    allocation: U256::from(1_000u64),
                    details: strategy_details(a, 1_000, 0),
                },
            ),
            (
                b,
                Strategy {
                    cap: U256::MAX,
                    allocation: U256::from(1_000u64),
                    details: strategy_details(b, 500, 500),
                },
            ),
        ]);
        let allocation = vault.current_allocation();

        let returns = compute_greedy_returns(&vault, &allocation);
        let detail_a = returns.details[&a];
        let detail_b = returns.details[&b];

        assert_eq!(detail_a.interest_apy, 0.0);
        assert!(detail_b.interest_apy > 0.0);
        assert!((detail_b.utilization - 0.5).abs() < 1e-9);
        // equal weights: the blend is the midpoint
        let expected = (detail_a.interest_apy + detail_b.interest_apy) / 2.0;
        assert!((returns.total_returns - expected).abs() < 1e-12);
    }

    #[test]
    fn test_compute_greedy_returns_idle_entry_weighs_zero_yield() {
        let a = address(1);
        let idle = address(9);
        let vault = vault_with(vec![(
            a,
            Strategy {
                cap: U256::MAX,
                allocation: U256::from(500u64),
                details: strategy_details(a, 250, 250),
            },
        )]);
        let mut allocation = vault.current_allocation();
        allocation.insert(idle, AllocationEntry::unchanged(U256::from(500u64)));

        let returns = compute_greedy_returns(&vault, &allocation);
        let detail_a = returns.details[&a];
        // idle holds half the capital, so the blend halves
        assert!((returns.total_returns - detail_a.interest_apy / 2.0).abs() < 1e-12);
        assert_eq!(returns.details[&idle].interest_apy, 0.0);
    }

    #[test]
    fn test_compute_greedy_returns_applies_planned_diff() {
        let a = address(1);
        let vault = vault_with(vec![(
            a,
            Strategy {
                cap: U256::MAX,
                allocation: U256::from(1_000u64),
                details: strategy_details(a, 500, 500),
            },
        )]);

        let mut drained = vault.current_allocation();
        if let Some(entry) = drained.get_mut(&a) {
            entry.withdraw(U256::from(400u64));
        }

        let before = compute_greedy_returns(&vault, &vault.current_allocation());
        let after = compute_greedy_returns(&vault, &drained);
        // withdrawing cash pushes utilization and the supply APY up
        assert!(after.details[&a].utilization > before.details[&a].utilization);
        assert!(after.details[&a].interest_apy > before.details[&a].interest_apy);
    }

    #[test]
    fn test_compute_equalized_allocation_moves_toward_higher_yield() {
        let low = address(1);
        let high = address(2);
        // The earn vault holds a small share of each strategy vault, so
        // shifting its capital barely dilutes the receiving vault's APY.
        let vault = vault_with(vec![
            (
                low,
                Strategy {
                    cap: U256::MAX,
                    allocation: U256::from(10_000u64),
                    details: strategy_details(low, 100_000, 0),
                },
            ),
            (
                high,
                Strategy {
                    cap: U256::MAX,
                    allocation: U256::from(1_000u64),
                    details: strategy_details(high, 20_000, 80_000),
                },
            ),
        ]);
        let initial = vault.current_allocation();

        let equalized = compute_equalized_allocation(&vault, &initial);

        let before = compute_greedy_returns(&vault, &initial).total_returns;
        let after = compute_greedy_returns(&vault, &equalized).total_returns;
        assert!(after > before);
        assert!(equalized[&high].new_amount > initial[&high].new_amount);

        // conservation across the two strategies
        let total_before = initial[&low].new_amount + initial[&high].new_amount;
        let total_after = equalized[&low].new_amount + equalized[&high].new_amount;
        assert_eq!(total_before, total_after);
    }

    #[test]
    fn test_compute_equalized_allocation_respects_strategy_cap() {
        let low = address(1);
        let high = address(2);
        let cap = U256::from(1_100u64);
        let vault = vault_with(vec![
            (
                low,
                Strategy {
                    cap: U256::MAX,
                    allocation: U256::from(10_000u64),
                    details: strategy_details(low, 100_000, 0),
                },
            ),
            (
                high,
                Strategy {
                    cap,
                    allocation: U256::from(1_000u64),
                    details: strategy_details(high, 20_000, 80_000),
                },
            ),
        ]);

        let equalized = compute_equalized_allocation(&vault, &vault.current_allocation());
        assert!(equalized[&high].new_amount <= cap);
    }

    #[test]
    fn test_compute_equalized_allocation_noop_when_nothing_to_move() {
        let a = address(1);
        let vault = vault_with(vec![(
            a,
            Strategy {
                cap: U256::MAX,
                allocation: U256::ZERO,
                details: strategy_details(a, 0, 0),
            },
        )]);
        let initial = vault.current_allocation();
        let equalized = compute_equalized_allocation(&vault, &initial);
        assert_eq!(equalized, initial);
        assert_eq!(equalized[&a].diff, I256::ZERO);
    }
}
