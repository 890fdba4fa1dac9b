//! The allocation orchestrator.
//!
//! One run: read the vault snapshot, score the current allocation,
//! compute a candidate (equalization search or drain transfer), decide
//! whether the improvement justifies a transaction, and finalize by
//! either skipping or handing off to the execution and notification
//! collaborators. All gating decisions are pure; the only side effects
//! live in the collaborator seams.

use alloy_primitives::{B256, U256};
use euler_earn_rs_contracts::EarnClient;
use euler_earn_rs_sim::{
    compute_drain_allocation, compute_equalized_allocation, compute_greedy_returns, Allocation,
    EulerEarn, ReturnsDetails,
};

use crate::config::{AllocatorConfig, OptimizationMode};
use crate::error::{AllocatorError, Result};
use crate::execute::{rebalance_order, RebalanceExecutor};
use crate::notify::{AllocationChange, RunNotifier, RunSummary};
use crate::reads;

/// Yield spread before and after the candidate allocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadObservation {
    /// Spread across strategies under the current allocation
    pub current: f64,
    /// Spread across strategies under the candidate allocation
    pub candidate: f64,
}

/// State assembled at the start of a run
#[derive(Debug, Clone)]
pub struct RunContext {
    pub vault: EulerEarn,
    pub current_allocation: Allocation,
    pub current_returns: f64,
    pub current_returns_details: ReturnsDetails,
    pub allocatable_amount: U256,
    pub cash_amount: U256,
    pub requires_spread_check: bool,
    pub current_spread: Option<f64>,
    pub mode: OptimizationMode,
}

/// The candidate allocation a run settled on
#[derive(Debug, Clone)]
pub struct RunResult {
    pub final_allocation: Allocation,
    pub final_returns: f64,
    pub final_returns_details: ReturnsDetails,
    /// Amount moved in drain mode; `None` in equalization mode
    pub transferred: Option<U256>,
}

/// How a run ended. All three variants are successes; failures are
/// [`AllocatorError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Deliberate no-op: gate not satisfied, or nothing to transfer
    Skipped,
    /// Plan computed but broadcast is disabled
    DryRun,
    /// Rebalance submitted on-chain
    Executed { tx_hash: B256 },
}

/// Drives allocation runs against one earn vault.
pub struct Allocator<E, N> {
    config: AllocatorConfig,
    executor: E,
    notifier: N,
}

impl<E: RebalanceExecutor, N: RunNotifier> Allocator<E, N> {
    /// Creates an allocator over a validated configuration.
    pub fn new(config: AllocatorConfig, executor: E, notifier: N) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            executor,
            notifier,
        })
    }

    /// The run configuration.
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Dispersion of per-strategy total APY under an allocation.
    ///
    /// The spread is the max-min distance of supply-plus-reward APY
    /// across strategies with a nonzero planned amount; fewer than two
    /// funded strategies have no spread.
    pub fn compute_spread(details: &ReturnsDetails, allocation: &Allocation) -> f64 {
        let mut lowest = f64::INFINITY;
        let mut highest = f64::NEG_INFINITY;
        let mut funded = 0usize;

        for (address, entry) in allocation {
            if entry.new_amount.is_zero() {
                continue;
            }
            let Some(returns) = details.get(address) else {
                continue;
            };
            let total = returns.interest_apy + returns.rewards_apy;
            lowest = lowest.min(total);
            highest = highest.max(total);
            funded += 1;
        }

        if funded < 2 {
            0.0
        } else {
            highest - lowest
        }
    }

    /// Pure execute/abort verdict on a candidate allocation.
    ///
    /// Executes if and only if the spread compression strictly exceeds
    /// the configured tolerance; equality aborts. This only reports the
    /// verdict, it never triggers execution itself.
    #[allow(clippy::too_many_arguments)]
    pub fn verify_allocation(
        &self,
        vault: &EulerEarn,
        current_allocation: &Allocation,
        final_allocation: &Allocation,
        current_returns: f64,
        current_returns_details: &ReturnsDetails,
        final_returns: f64,
        final_returns_details: &ReturnsDetails,
        spread: &SpreadObservation,
    ) -> bool {
        let improvement = spread.current - spread.candidate;
        let verdict = improvement > self.config.apy_spread_tolerance;

        let changed_vaults = final_allocation
            .iter()
            .filter(|(address, entry)| {
                current_allocation
                    .get(*address)
                    .is_some_and(|current| current.new_amount != entry.new_amount)
            })
            .count();
        tracing::info!(
            strategies = vault.strategies.len(),
            changed_vaults,
            current_returns,
            final_returns,
            current_detail_count = current_returns_details.len(),
            final_detail_count = final_returns_details.len(),
            spread_current = spread.current,
            spread_candidate = spread.candidate,
            improvement,
            tolerance = self.config.apy_spread_tolerance,
            verdict,
            "spread check"
        );
        verdict
    }

    /// Executes one full allocation run.
    pub async fn run(&self, client: &EarnClient) -> Result<RunOutcome> {
        let vault = reads::read_earn_vault(client, &self.config).await?;
        let current_allocation = vault.current_allocation();
        let current = compute_greedy_returns(&vault, &current_allocation);

        let allocatable_amount = client.total_assets_allocatable(self.config.earn_vault).await?;
        let cash_amount = allocatable_amount * self.config.cash_percentage / U256::from(10_000u64);

        let mode = self.config.optimization_mode;
        let context = RunContext {
            current_spread: Some(Self::compute_spread(&current.details, &current_allocation)),
            requires_spread_check: mode == OptimizationMode::Equalization,
            vault,
            current_allocation,
            current_returns: current.total_returns,
            current_returns_details: current.details,
            allocatable_amount,
            cash_amount,
            mode,
        };

        let result = match mode {
            OptimizationMode::Drain => {
                let drain_config = self.config.drain_config().ok_or_else(|| {
                    AllocatorError::Config("drain mode requires a drain configuration".into())
                })?;
                let outcome = compute_drain_allocation(
                    &context.vault,
                    &context.current_allocation,
                    &drain_config,
                    &self.config.soft_caps,
                )?;
                RunResult {
                    final_allocation: outcome.allocation,
                    final_returns: outcome.total_returns,
                    final_returns_details: outcome.details,
                    transferred: Some(outcome.transferred),
                }
            }
            OptimizationMode::Equalization => {
                let candidate =
                    compute_equalized_allocation(&context.vault, &context.current_allocation);
                let scored = compute_greedy_returns(&context.vault, &candidate);
                RunResult {
                    final_allocation: candidate,
                    final_returns: scored.total_returns,
                    final_returns_details: scored.details,
                    transferred: None,
                }
            }
        };

        if context.requires_spread_check {
            let spread = SpreadObservation {
                current: context.current_spread.unwrap_or(0.0),
                candidate: Self::compute_spread(
                    &result.final_returns_details,
                    &result.final_allocation,
                ),
            };
            let approved = self.verify_allocation(
                &context.vault,
                &context.current_allocation,
                &result.final_allocation,
                context.current_returns,
                &context.current_returns_details,
                result.final_returns,
                &result.final_returns_details,
                &spread,
            );
            if !approved {
                tracing::info!("spread improvement below tolerance; skipping rebalance");
                return Ok(RunOutcome::Skipped);
            }
            if !self.exceeds_diff_tolerance(&result.final_allocation) {
                tracing::info!("allocation changes below diff tolerance; skipping rebalance");
                return Ok(RunOutcome::Skipped);
            }
        }

        self.finalize_allocation_run(&context, &result).await
    }

    /// Terminal step of a run.
    ///
    /// A drain run that found nothing to transfer is a deliberate
    /// no-op: it logs once and touches neither the execution nor the
    /// notification collaborator. Every other run proceeds to
    /// execution (when broadcasting) and notification.
    pub async fn finalize_allocation_run(
        &self,
        context: &RunContext,
        result: &RunResult,
    ) -> Result<RunOutcome> {
        if context.mode == OptimizationMode::Drain && result.transferred == Some(U256::ZERO) {
            tracing::info!("drain mode: nothing to transfer; skipping rebalance and notifications");
            return Ok(RunOutcome::Skipped);
        }

        let order = rebalance_order(&context.vault, &result.final_allocation);

        if !self.config.broadcast {
            tracing::info!(
                ?order,
                final_returns = result.final_returns,
                "broadcast disabled; rebalance not submitted"
            );
            return Ok(RunOutcome::DryRun);
        }

        let tx_hash = self
            .executor
            .execute_rebalance(self.config.earn_vault, order)
            .await?;
        tracing::info!(%tx_hash, "rebalance submitted");

        let summary = self.build_summary(context, result, tx_hash);
        if let Err(error) = self.notifier.notify_run(&summary).await {
            // the transaction already landed; a lost message must not
            // turn the run into a failure
            tracing::warn!(%error, "run executed but notification delivery failed");
        }

        Ok(RunOutcome::Executed { tx_hash })
    }

    /// True when at least one vault's planned change exceeds the
    /// configured diff tolerance.
    fn exceeds_diff_tolerance(&self, allocation: &Allocation) -> bool {
        allocation
            .values()
            .any(|entry| entry.diff.unsigned_abs() > self.config.allocation_diff_tolerance)
    }

    fn build_summary(
        &self,
        context: &RunContext,
        result: &RunResult,
        tx_hash: B256,
    ) -> RunSummary {
        let mut changes: Vec<AllocationChange> = result
            .final_allocation
            .iter()
            .filter(|(_, entry)| entry.diff != alloy_primitives::I256::ZERO)
            .map(|(address, entry)| AllocationChange {
                vault: *address,
                symbol: context
                    .vault
                    .strategies
                    .get(address)
                    .map_or_else(String::new, |s| s.details.symbol.clone()),
                old_amount: entry.old_amount,
                new_amount: entry.new_amount,
                diff: entry.diff,
            })
            .collect();
        changes.sort_by_key(|change| change.vault);

        RunSummary {
            mode: context.mode,
            chain_id: self.config.chain_id,
            earn_vault: self.config.earn_vault,
            total_returns_before: context.current_returns,
            total_returns_after: result.final_returns,
            transferred: result.transferred,
            tx_hash: Some(tx_hash),
            changes,
        }
    }
}
