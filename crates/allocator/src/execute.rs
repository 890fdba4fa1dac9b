//! Rebalance execution.
//!
//! The executor submits at most one transaction per run. It sits behind
//! a trait so the orchestrator's gating logic can be tested without a
//! chain.

#![allow(async_fn_in_trait)]

use alloy_primitives::{Address, B256};
use euler_earn_rs_contracts::EarnClient;
use euler_earn_rs_sim::{Allocation, EulerEarn};

use crate::error::Result;

/// Submits an approved rebalance to the chain.
pub trait RebalanceExecutor {
    async fn execute_rebalance(
        &self,
        earn_vault: Address,
        strategy_order: Vec<Address>,
    ) -> Result<B256>;
}

/// Orders strategies for the on-chain rebalance call.
///
/// Withdrawals must run before deposits so the freed liquidity is
/// available when the deposits execute. Within each group the vault's
/// canonical queue order is preserved; untouched strategies are left
/// out of the call entirely.
pub fn rebalance_order(vault: &EulerEarn, allocation: &Allocation) -> Vec<Address> {
    let mut withdrawals = Vec::new();
    let mut deposits = Vec::new();

    for address in &vault.initial_allocation_queue {
        let Some(entry) = allocation.get(address) else {
            continue;
        };
        if entry.diff.is_negative() {
            withdrawals.push(*address);
        } else if entry.diff.is_positive() {
            deposits.push(*address);
        }
    }

    withdrawals.extend(deposits);
    withdrawals
}

/// Executor submitting the rebalance through the earn vault client.
pub struct EarnRebalanceExecutor<'a> {
    client: &'a EarnClient,
}

impl<'a> EarnRebalanceExecutor<'a> {
    pub fn new(client: &'a EarnClient) -> Self {
        Self { client }
    }
}

impl RebalanceExecutor for EarnRebalanceExecutor<'_> {
    async fn execute_rebalance(
        &self,
        earn_vault: Address,
        strategy_order: Vec<Address>,
    ) -> Result<B256> {
        let tx_hash = self.client.rebalance(earn_vault, strategy_order).await?;
        Ok(tx_hash)
    }
}
