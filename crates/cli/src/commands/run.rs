//! Preview and run command implementations.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use euler_earn_rs_allocator::{
    chain_from_id, explorer_tx_url, read_earn_vault, Allocator, AllocatorConfig,
    EarnRebalanceExecutor, OptimizationMode, RunOutcome, TelegramNotifier,
};
use euler_earn_rs_contracts::EarnClient;
use euler_earn_rs_sim::{
    compute_drain_allocation, compute_equalized_allocation, compute_greedy_returns,
};

use crate::cli::{ModeArg, OutputFormat, RunArgs};
use crate::output::{allocation_json, format_allocation_table};

fn parse_address(value: &str) -> Result<Address> {
    value
        .parse::<Address>()
        .with_context(|| format!("invalid address: {value}"))
}

fn parse_amount(value: &str) -> Result<U256> {
    value
        .parse::<U256>()
        .with_context(|| format!("invalid amount: {value}"))
}

fn parse_soft_caps(pairs: &[String]) -> Result<HashMap<Address, U256>> {
    let mut soft_caps = HashMap::new();
    for pair in pairs {
        let (vault, amount) = pair
            .split_once('=')
            .with_context(|| format!("soft cap must be vault=amount, got: {pair}"))?;
        soft_caps.insert(parse_address(vault)?, parse_amount(amount)?);
    }
    Ok(soft_caps)
}

/// Assembles and validates the allocator configuration from CLI input.
pub fn build_config(args: &RunArgs) -> Result<AllocatorConfig> {
    let optimization_mode = match args.mode {
        ModeArg::Equalization => OptimizationMode::Equalization,
        ModeArg::Drain => OptimizationMode::Drain,
    };

    let strategies_override = args
        .strategies
        .as_ref()
        .map(|strategies| {
            strategies
                .iter()
                .map(|s| parse_address(s))
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?;

    let config = AllocatorConfig {
        chain_id: args.chain_id,
        earn_vault: parse_address(&args.earn_vault)?,
        evc: parse_address(&args.evc)?,
        evk_vault_lens: parse_address(&args.evk_vault_lens)?,
        euler_earn_lens: parse_address(&args.euler_earn_lens)?,
        allocation_diff_tolerance: parse_amount(&args.allocation_diff_tolerance)?,
        apy_spread_tolerance: args.apy_spread_tolerance,
        cash_percentage: U256::from(args.cash_percentage),
        broadcast: args.broadcast,
        no_idle_vault: args.no_idle_vault,
        optimization_mode,
        drain_source_vault: args
            .drain_source_vault
            .as_deref()
            .map(parse_address)
            .transpose()?,
        drain_target_vault: args
            .drain_target_vault
            .as_deref()
            .map(parse_address)
            .transpose()?,
        drain_threshold: args.drain_threshold.as_deref().map(parse_amount).transpose()?,
        soft_caps: parse_soft_caps(&args.soft_caps)?,
        strategies_override,
    };
    config.validate()?;
    Ok(config)
}

/// Computes and prints a candidate allocation without touching the chain.
pub async fn run_preview(args: &RunArgs, format: OutputFormat) -> Result<()> {
    let config = build_config(args)?;
    let client = EarnClient::read_only(&args.rpc_url)?;

    let vault = read_earn_vault(&client, &config).await?;
    let current_allocation = vault.current_allocation();
    let current = compute_greedy_returns(&vault, &current_allocation);

    let (candidate, transferred) = match config.optimization_mode {
        OptimizationMode::Drain => {
            let drain_config = config
                .drain_config()
                .context("drain mode requires source, target and threshold")?;
            let outcome = compute_drain_allocation(
                &vault,
                &current_allocation,
                &drain_config,
                &config.soft_caps,
            )?;
            (outcome.allocation, Some(outcome.transferred))
        }
        OptimizationMode::Equalization => (
            compute_equalized_allocation(&vault, &current_allocation),
            None,
        ),
    };
    let scored = compute_greedy_returns(&vault, &candidate);

    match format {
        OutputFormat::Table => {
            println!("{}", format_allocation_table(&vault, &candidate, &scored.details));
            println!(
                "Total returns: {:.4}% -> {:.4}%",
                current.total_returns, scored.total_returns
            );
            if let Some(transferred) = transferred {
                println!("Would transfer: {transferred}");
            }
        }
        OutputFormat::Json => {
            let json = allocation_json(
                &vault,
                &candidate,
                &scored.details,
                current.total_returns,
                scored.total_returns,
                transferred,
            );
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

/// Executes a full allocation run.
pub async fn run_allocator(args: &RunArgs, format: OutputFormat) -> Result<()> {
    if args.private_key.is_empty() {
        bail!("--private-key (or PRIVATE_KEY) is required to run");
    }

    let config = build_config(args)?;
    let chain_id = config.chain_id;
    let client = EarnClient::new(&args.rpc_url, &args.private_key)?;
    let executor = EarnRebalanceExecutor::new(&client);
    let notifier = match (&args.telegram_bot_token, &args.telegram_chat_id) {
        (Some(token), Some(chat_id)) => Some(TelegramNotifier::new(token.clone(), chat_id.clone())),
        _ => None,
    };

    let allocator = Allocator::new(config, executor, notifier)?;
    let outcome = allocator.run(&client).await?;

    match format {
        OutputFormat::Table => match outcome {
            RunOutcome::Skipped => {
                println!("{}", "skipped: no action required".yellow());
            }
            RunOutcome::DryRun => {
                println!(
                    "{}",
                    "dry run: plan computed, broadcast disabled".cyan()
                );
            }
            RunOutcome::Executed { tx_hash } => {
                let link = chain_from_id(chain_id)
                    .ok()
                    .and_then(|chain| explorer_tx_url(chain, tx_hash))
                    .unwrap_or_else(|| tx_hash.to_string());
                println!("{} {link}", "rebalance executed:".green());
            }
        },
        OutputFormat::Json => {
            let json = match outcome {
                RunOutcome::Skipped => serde_json::json!({ "outcome": "skipped" }),
                RunOutcome::DryRun => serde_json::json!({ "outcome": "dry_run" }),
                RunOutcome::Executed { tx_hash } => {
                    serde_json::json!({ "outcome": "executed", "tx_hash": tx_hash.to_string() })
                }
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
