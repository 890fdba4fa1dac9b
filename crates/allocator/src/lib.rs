//! Euler Earn allocation orchestrator.
//!
//! Ties the pure decision engine (`euler-earn-rs-sim`) to the chain:
//! reads the earn vault snapshot, computes a candidate allocation in
//! the configured optimization mode, gates it on spread compression and
//! diff tolerances, and finalizes the run against the execution and
//! notification collaborators. Runs are invoked serially by an external
//! scheduler; nothing here pipelines across runs.

pub mod chain;
pub mod config;
pub mod error;
pub mod execute;
pub mod notify;
pub mod orchestrator;
pub mod reads;

pub use chain::{chain_from_id, chain_name, explorer_tx_url};
pub use config::{AllocatorConfig, OptimizationMode};
pub use error::{AllocatorError, Result};
pub use execute::{rebalance_order, EarnRebalanceExecutor, RebalanceExecutor};
pub use notify::{
    format_run_message, AllocationChange, RunNotifier, RunSummary, TelegramNotifier,
};
pub use orchestrator::{Allocator, RunContext, RunOutcome, RunResult, SpreadObservation};
pub use reads::{read_earn_vault, resolve_irm_config};
