//! Euler Earn allocation decision engine.
//!
//! This crate holds the pure computation core of the allocator bot:
//! converting raw strategy-vault state into comparable yield figures,
//! scoring candidate allocations, and computing capacity-constrained
//! drain transfers. Everything here is synchronous and side-effect
//! free; reading chain state and executing rebalances live in the
//! `euler-earn-rs-allocator` and `euler-earn-rs-contracts` crates.
//!
//! # Example
//!
//! ```rust,ignore
//! use euler_earn_rs_sim::{compute_drain_allocation, DrainConfig};
//! use alloy_primitives::U256;
//!
//! let outcome = compute_drain_allocation(&vault, &allocation, &config, &soft_caps)?;
//! if outcome.transferred.is_zero() {
//!     println!("nothing to transfer");
//! } else {
//!     println!("moving {} to {}", outcome.transferred, config.target_vault);
//! }
//! ```

pub mod drain;
pub mod earn;
pub mod error;
pub mod irm;
pub mod math;
pub mod returns;

// Re-export commonly used types
pub use error::{DrainRole, SimError};

// Earn vault snapshot exports
pub use earn::{
    Allocation, AllocationEntry, EulerEarn, Protocol, ReturnsDetails, RewardCampaign, Strategy,
    StrategyDetails, StrategyReturns,
};

// IRM exports
pub use irm::{
    borrow_rate, compute_adaptive_interest_rate, compute_interest_rate, resolve_borrow_apy,
    resolve_supply_apy, resolve_supply_cap, AdaptiveIrm, IrmConfig, KinkedIrm,
};

// Returns exports
pub use returns::{compute_equalized_allocation, compute_greedy_returns, GreedyReturns};

// Drain exports
pub use drain::{compute_drain_allocation, DrainConfig, DrainOutcome};

// Math exports
pub use math::{RAY, SECONDS_PER_YEAR, UTILIZATION_SCALE, WAD};
