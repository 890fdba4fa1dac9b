//! Run configuration for the allocator.
//!
//! The configuration is assembled and validated outside the decision
//! core (by the CLI); the core consumes it as an immutable value and
//! performs no parsing or environment access itself.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use euler_earn_rs_sim::DrainConfig;

use crate::error::{AllocatorError, Result};

/// How a run computes its candidate allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationMode {
    /// Search for an allocation that improves the blended return
    Equalization,
    /// Move capital one-way from a designated source into a target
    Drain,
}

impl std::fmt::Display for OptimizationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizationMode::Equalization => write!(f, "equalization"),
            OptimizationMode::Drain => write!(f, "drain"),
        }
    }
}

/// Immutable configuration for allocation runs
#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    /// Chain the earn vault is deployed on
    pub chain_id: u64,
    /// The Euler Earn aggregator vault
    pub earn_vault: Address,
    /// Ethereum Vault Connector address
    pub evc: Address,
    /// Periphery lens for EVK vault state
    pub evk_vault_lens: Address,
    /// Periphery lens for earn vault state
    pub euler_earn_lens: Address,
    /// Candidate is only executed when the largest per-vault change
    /// exceeds this amount
    pub allocation_diff_tolerance: U256,
    /// Minimum spread compression (in APY percentage points) required
    /// to execute
    pub apy_spread_tolerance: f64,
    /// Fraction of allocatable capital kept idle, in basis points
    pub cash_percentage: U256,
    /// Submit the rebalance transaction; a cleared flag plans only
    pub broadcast: bool,
    /// Treat the earn vault itself as holding no idle-capital sink
    pub no_idle_vault: bool,
    /// How the candidate allocation is computed
    pub optimization_mode: OptimizationMode,
    /// Drain mode: vault to withdraw from
    pub drain_source_vault: Option<Address>,
    /// Drain mode: vault to deposit into
    pub drain_target_vault: Option<Address>,
    /// Drain mode: source allocations at or below this are left alone
    pub drain_threshold: Option<U256>,
    /// Operator-configured per-vault ceilings, below the protocol caps
    pub soft_caps: HashMap<Address, U256>,
    /// Use this strategy set instead of the vault's withdrawal queue
    pub strategies_override: Option<Vec<Address>>,
}

impl AllocatorConfig {
    /// Checks the configuration is complete for its optimization mode.
    pub fn validate(&self) -> Result<()> {
        if self.optimization_mode == OptimizationMode::Drain {
            let source = self
                .drain_source_vault
                .ok_or_else(|| AllocatorError::Config("drain mode requires a source vault".into()))?;
            let target = self
                .drain_target_vault
                .ok_or_else(|| AllocatorError::Config("drain mode requires a target vault".into()))?;
            if self.drain_threshold.is_none() {
                return Err(AllocatorError::Config(
                    "drain mode requires a threshold".into(),
                ));
            }
            if source == target {
                return Err(AllocatorError::Config(
                    "drain mode requires distinct source and target vaults".into(),
                ));
            }
        }
        Ok(())
    }

    /// The drain configuration, when the run is in drain mode and all
    /// three parameters are present.
    pub fn drain_config(&self) -> Option<DrainConfig> {
        match (
            self.drain_source_vault,
            self.drain_target_vault,
            self.drain_threshold,
        ) {
            (Some(source_vault), Some(target_vault), Some(threshold)) => Some(DrainConfig {
                source_vault,
                target_vault,
                threshold,
            }),
            _ => None,
        }
    }
}
