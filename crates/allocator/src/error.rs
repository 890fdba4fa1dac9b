//! Error types for the allocator crate.

use euler_earn_rs_contracts::ContractError;
use euler_earn_rs_sim::SimError;
use thiserror::Error;

/// Errors that can abort an allocation run.
///
/// A run that fails here aborts before any execution or notification
/// side effect. No-op decisions (zero drain transfer, spread gate not
/// satisfied) are not errors; they surface as successful run outcomes.
#[derive(Debug, Error)]
pub enum AllocatorError {
    /// Run configuration is incomplete or inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Chain id does not map to a known network.
    #[error("Unsupported chainId: {0}")]
    UnsupportedChain(u64),

    /// Decision-engine failure (drain preconditions, unknown rate model).
    #[error(transparent)]
    Sim(#[from] SimError),

    /// On-chain read or transaction failure, propagated unmodified.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Notification delivery failed.
    #[error("Notification delivery failed: {0}")]
    Notify(String),
}

/// Result type alias for allocator operations.
pub type Result<T> = std::result::Result<T, AllocatorError>;
