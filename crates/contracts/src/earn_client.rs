//! Client for the Euler Earn aggregator vault.
//!
//! Covers the read side (strategy set, allocations, allocatable total)
//! and the single transaction the allocator submits: `rebalance` over a
//! withdraw-first strategy ordering.

use alloy::primitives::{Address, B256, U256};

use crate::earn::IEulerEarn;
use crate::error::{ContractError, Result};
use crate::evk_client::EvkReads;
use crate::provider::{connect_http_with_signer, HttpProvider};

/// A strategy entry as reported by the earn vault.
#[derive(Debug, Clone)]
pub struct EarnStrategy {
    /// Amount currently allocated to the strategy
    pub allocated: U256,
    /// Allocator-imposed cap for the strategy
    pub cap: U256,
    /// Raw status flag reported by the vault
    pub status: u8,
}

/// Client for an Euler Earn vault, able to read state and submit the
/// rebalance transaction.
pub struct EarnClient {
    provider: HttpProvider,
    signer_address: Address,
}

impl EarnClient {
    /// Create a new earn vault client from an RPC endpoint and the
    /// allocator's private key.
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self> {
        let (provider, signer_address) = connect_http_with_signer(rpc_url, private_key)?;
        Ok(Self {
            provider,
            signer_address,
        })
    }

    /// Create a read-only client with no signer attached. Calling
    /// [`EarnClient::rebalance`] through it will fail at send time.
    pub fn read_only(rpc_url: &str) -> Result<Self> {
        let provider = crate::provider::connect_http(rpc_url)?;
        Ok(Self {
            provider,
            signer_address: Address::ZERO,
        })
    }

    /// Returns the signer's address.
    pub fn signer_address(&self) -> Address {
        self.signer_address
    }

    /// Get the earn vault's underlying asset.
    pub async fn asset(&self, earn_vault: Address) -> Result<Address> {
        let contract = IEulerEarn::new(earn_vault, &self.provider);
        let result = contract
            .asset()
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get asset: {}", e)))?;
        Ok(result)
    }

    /// Get the earn vault's share token decimals.
    pub async fn decimals(&self, earn_vault: Address) -> Result<u8> {
        let contract = IEulerEarn::new(earn_vault, &self.provider);
        let result = contract
            .decimals()
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get decimals: {}", e)))?;
        Ok(result)
    }

    /// Get the ordered withdrawal queue, which doubles as the canonical
    /// strategy list.
    pub async fn withdrawal_queue(&self, earn_vault: Address) -> Result<Vec<Address>> {
        let contract = IEulerEarn::new(earn_vault, &self.provider);
        let result = contract.withdrawalQueue().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get withdrawal queue: {}", e))
        })?;
        Ok(result)
    }

    /// Get a strategy's allocation state.
    pub async fn get_strategy(&self, earn_vault: Address, strategy: Address) -> Result<EarnStrategy> {
        let contract = IEulerEarn::new(earn_vault, &self.provider);
        let result = contract
            .getStrategy(strategy)
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get strategy: {}", e)))?;
        Ok(EarnStrategy {
            allocated: U256::from(result.allocated),
            cap: U256::from(result.cap),
            status: result.status,
        })
    }

    /// Get the total amount allocated across strategies.
    pub async fn total_allocated(&self, earn_vault: Address) -> Result<U256> {
        let contract = IEulerEarn::new(earn_vault, &self.provider);
        let result = contract.totalAllocated().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get total allocated: {}", e))
        })?;
        Ok(result)
    }

    /// Get the total capital available for allocation, including idle
    /// liquidity.
    pub async fn total_assets_allocatable(&self, earn_vault: Address) -> Result<U256> {
        let contract = IEulerEarn::new(earn_vault, &self.provider);
        let result = contract.totalAssetsAllocatable().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get allocatable assets: {}", e))
        })?;
        Ok(result)
    }

    /// Submits the rebalance transaction over the given strategy order
    /// and waits for inclusion.
    ///
    /// The order matters on-chain: strategies being withdrawn from must
    /// come before strategies being deposited into, so freed liquidity
    /// is available when the deposits execute.
    pub async fn rebalance(&self, earn_vault: Address, strategies: Vec<Address>) -> Result<B256> {
        let contract = IEulerEarn::new(earn_vault, &self.provider);
        let pending = contract
            .rebalance(strategies)
            .send()
            .await
            .map_err(|e| ContractError::TransactionFailed(format!("Failed to send rebalance: {}", e)))?;
        let tx_hash = pending.watch().await.map_err(|e| {
            ContractError::TransactionFailed(format!("Rebalance not confirmed: {}", e))
        })?;
        Ok(tx_hash)
    }
}

// The earn client can read strategy vault state through the same provider
impl EvkReads for EarnClient {
    fn provider(&self) -> &HttpProvider {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_private_key() {
        let result = EarnClient::new("http://localhost:8545", "invalid_key");
        assert!(matches!(result, Err(ContractError::InvalidPrivateKey)));
    }

    #[test]
    fn test_invalid_rpc_url() {
        let private_key = "0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
        let result = EarnClient::new("not a valid url", private_key);
        assert!(matches!(result, Err(ContractError::RpcConnection(_))));
    }

    #[test]
    fn test_valid_construction() {
        let private_key = "0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
        let result = EarnClient::new("http://localhost:8545", private_key);
        assert!(result.is_ok());
    }
}
