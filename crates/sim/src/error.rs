//! Error types for the decision engine.

use alloy_primitives::Address;
use thiserror::Error;

/// Errors that can occur while computing an allocation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// Drain mode was configured with the same vault on both sides
    #[error("drain mode requires distinct source and target vaults")]
    DrainVaultsIdentical,

    /// A drain endpoint is not a strategy of the earn vault
    #[error("drain mode {role} vault {vault} is not part of this Euler Earn vault")]
    DrainVaultUnknown { role: DrainRole, vault: Address },

    /// A drain endpoint has no entry in the supplied allocation
    #[error("drain mode {role} vault {vault} has no allocation entry")]
    DrainAllocationMissing { role: DrainRole, vault: Address },

    /// An interest-rate-model tag was not one of the recognized variants
    #[error("unsupported interest rate model: {model}")]
    UnsupportedModel { model: String },
}

/// Which side of a drain transfer an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainRole {
    Source,
    Target,
}

impl std::fmt::Display for DrainRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrainRole::Source => write!(f, "source"),
            DrainRole::Target => write!(f, "target"),
        }
    }
}
