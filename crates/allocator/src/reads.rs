//! On-chain snapshot reads.
//!
//! Builds the [`EulerEarn`] view the decision engine works on: the
//! strategy set from the earn vault's withdrawal queue (or a configured
//! override), each strategy vault's state, decoded caps and rate-model
//! parameters, and the earn vault's current position in each strategy.
//! Reads for different strategies run concurrently; failures propagate
//! unmodified from the RPC layer.

use std::collections::HashMap;

use alloy_primitives::Address;
use euler_earn_rs_contracts::{EarnClient, EvkReads, IrmInfo};
use euler_earn_rs_sim::{
    borrow_rate, resolve_borrow_apy, resolve_supply_apy, resolve_supply_cap, AdaptiveIrm,
    EulerEarn, IrmConfig, KinkedIrm, Protocol, SimError, Strategy, StrategyDetails,
};

use crate::config::AllocatorConfig;
use crate::error::Result;

/// Decodes the lens's model tag into a rate-model configuration.
///
/// Unknown tags are a data-integrity failure, not a fallback case.
pub fn resolve_irm_config(info: &IrmInfo) -> std::result::Result<IrmConfig, SimError> {
    match info.model_type.as_str() {
        "noIrm" => Ok(IrmConfig::NoIrm),
        "irm" => Ok(IrmConfig::Kinked(KinkedIrm {
            base_rate: info.base_rate,
            kink: info.kink,
            slope1: info.slope1,
            slope2: info.slope2,
        })),
        "adaptiveIrm" => Ok(IrmConfig::Adaptive(AdaptiveIrm {
            rate_at_target: info.rate_at_target,
            target_utilization: info.target_utilization,
            initial_rate_at_target: info.initial_rate_at_target,
            min_rate_at_target: info.min_rate_at_target,
            max_rate_at_target: info.max_rate_at_target,
            curve_steepness: info.curve_steepness,
            adjustment_speed: info.adjustment_speed,
        })),
        other => Err(SimError::UnsupportedModel {
            model: other.to_string(),
        }),
    }
}

/// Reads the full earn vault snapshot for one run.
pub async fn read_earn_vault(client: &EarnClient, config: &AllocatorConfig) -> Result<EulerEarn> {
    let queue = match &config.strategies_override {
        Some(strategies) => strategies.clone(),
        None => client.withdrawal_queue(config.earn_vault).await?,
    };

    let reads = queue
        .iter()
        .map(|strategy| read_strategy(client, config, *strategy));
    let strategies: Vec<(Address, Strategy)> = futures::future::try_join_all(reads).await?;

    let asset_decimals = client.decimals(config.earn_vault).await?;

    Ok(EulerEarn {
        strategies: strategies.into_iter().collect::<HashMap<_, _>>(),
        asset_decimals,
        initial_allocation_queue: queue,
        idle_vault: (!config.no_idle_vault).then_some(config.earn_vault),
    })
}

/// Reads one strategy vault's snapshot and the earn vault's position in it.
async fn read_strategy(
    client: &EarnClient,
    config: &AllocatorConfig,
    vault: Address,
) -> Result<(Address, Strategy)> {
    let earn_strategy = client.get_strategy(config.earn_vault, vault).await?;

    let symbol = client.symbol(vault).await?;
    let asset_decimals = client.decimals(vault).await?;
    let cash = client.cash(vault).await?;
    let total_borrows = client.total_borrows(vault).await?;
    let total_shares = client.total_shares(vault).await?;
    let interest_fee = client.interest_fee(vault).await?;
    let supply_cap = resolve_supply_cap(client.supply_cap_raw(vault).await?);
    let max_withdraw = client.max_withdraw(vault, config.earn_vault).await?;

    let irm_info = client.irm_info(config.evk_vault_lens, vault).await?;
    let irm_config = resolve_irm_config(&irm_info)?;

    // the live position, not the vault's cached allocation figure
    let allocation = client.balance_of_assets(vault, config.earn_vault).await?;

    let rate = borrow_rate(cash, total_borrows, &irm_config);
    let borrow_apy = resolve_borrow_apy(rate);
    let supply_apy = resolve_supply_apy(borrow_apy, cash, total_borrows, interest_fee);

    let details = StrategyDetails {
        vault,
        symbol,
        protocol: Protocol::Euler,
        cash,
        total_borrows,
        total_shares,
        interest_fee,
        supply_cap,
        asset_decimals,
        irm_config,
        max_withdraw: Some(max_withdraw),
        borrow_apy,
        supply_apy,
        // reward campaign ingestion runs off-chain and is wired up by
        // the caller when available
        reward_apy: 0.0,
        reward_campaigns: vec![],
    };

    Ok((
        vault,
        Strategy {
            cap: earn_strategy.cap,
            allocation,
            details,
        },
    ))
}
