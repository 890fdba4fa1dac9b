//! Contract bindings and clients for the Euler Earn allocator.
//!
//! This crate wraps the on-chain surface the allocator touches: the
//! Euler Earn aggregator vault, the EVK strategy vaults it allocates
//! into, and the periphery lens used to read interest-rate-model
//! parameters. Retry and timeout policy belong to the provider; errors
//! from reads and sends propagate unmodified.

pub mod earn;
pub mod earn_client;
pub mod error;
pub mod evk;
pub mod evk_client;
pub mod provider;

pub use earn::IEulerEarn;
pub use earn_client::{EarnClient, EarnStrategy};
pub use error::{ContractError, Result};
pub use evk::{IEVault, IVaultLens};
pub use evk_client::{EvkReadClient, EvkReads, IrmInfo};
pub use provider::{connect_http, connect_http_with_signer, HttpProvider};
