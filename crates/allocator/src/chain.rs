//! Chain-id helpers for supported networks.

use alloy_chains::NamedChain;
use alloy_primitives::B256;

use crate::error::{AllocatorError, Result};

/// Resolves a chain id to a named chain, failing for unknown ids.
pub fn chain_from_id(chain_id: u64) -> Result<NamedChain> {
    NamedChain::try_from(chain_id).map_err(|_| AllocatorError::UnsupportedChain(chain_id))
}

/// Human-readable name of a chain id.
pub fn chain_name(chain_id: u64) -> Result<String> {
    Ok(chain_from_id(chain_id)?.to_string())
}

/// Block-explorer URL for a transaction, when the chain has a known
/// explorer. Trailing slashes in the configured base URL are trimmed.
pub fn explorer_tx_url(chain: NamedChain, tx_hash: B256) -> Option<String> {
    let (_, base_url) = chain.etherscan_urls()?;
    Some(format!("{}/tx/{}", base_url.trim_end_matches('/'), tx_hash))
}
