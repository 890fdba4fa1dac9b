//! Read client for EVK strategy vaults.
//!
//! This module provides a trait with default implementations for the
//! view functions the allocator needs from a strategy vault, plus a
//! concrete client over an HTTP provider. All calls are read-only; RPC
//! failures propagate as [`ContractError::CallFailed`] without retry.

#![allow(async_fn_in_trait)]

use alloy::primitives::{Address, U256};

use crate::error::{ContractError, Result};
use crate::evk::{IEVault, IVaultLens};
use crate::provider::HttpProvider;

/// Interest-rate-model parameters reported by the vault lens.
#[derive(Debug, Clone)]
pub struct IrmInfo {
    /// Address of the model contract, zero when the vault has none
    pub interest_rate_model: Address,
    /// Model tag reported by the lens (e.g. "irm", "adaptiveIrm")
    pub model_type: String,
    pub base_rate: U256,
    pub kink: U256,
    pub slope1: U256,
    pub slope2: U256,
    pub rate_at_target: U256,
    pub target_utilization: U256,
    pub initial_rate_at_target: U256,
    pub min_rate_at_target: U256,
    pub max_rate_at_target: U256,
    pub curve_steepness: U256,
    pub adjustment_speed: U256,
}

/// Trait for EVK vault read functionality.
///
/// Provides default implementations for all view calls. Implementors
/// only need to provide `provider()`.
pub trait EvkReads {
    /// Returns a reference to the HTTP provider.
    fn provider(&self) -> &HttpProvider;

    /// Get the underlying asset address of a vault.
    async fn asset(&self, vault: Address) -> Result<Address> {
        let contract = IEVault::new(vault, self.provider());
        let result = contract
            .asset()
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get asset: {}", e)))?;
        Ok(result)
    }

    /// Get the vault's share token decimals.
    async fn decimals(&self, vault: Address) -> Result<u8> {
        let contract = IEVault::new(vault, self.provider());
        let result = contract
            .decimals()
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get decimals: {}", e)))?;
        Ok(result)
    }

    /// Get the vault's share token symbol.
    async fn symbol(&self, vault: Address) -> Result<String> {
        let contract = IEVault::new(vault, self.provider());
        let result = contract
            .symbol()
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get symbol: {}", e)))?;
        Ok(result)
    }

    /// Get the vault's idle liquidity.
    async fn cash(&self, vault: Address) -> Result<U256> {
        let contract = IEVault::new(vault, self.provider());
        let result = contract
            .cash()
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get cash: {}", e)))?;
        Ok(result)
    }

    /// Get the total assets borrowed from the vault.
    async fn total_borrows(&self, vault: Address) -> Result<U256> {
        let contract = IEVault::new(vault, self.provider());
        let result = contract
            .totalBorrows()
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get total borrows: {}", e)))?;
        Ok(result)
    }

    /// Get the vault's outstanding share supply.
    async fn total_shares(&self, vault: Address) -> Result<U256> {
        let contract = IEVault::new(vault, self.provider());
        let result = contract
            .totalSupply()
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get total supply: {}", e)))?;
        Ok(result)
    }

    /// Get the vault's interest fee in basis points.
    async fn interest_fee(&self, vault: Address) -> Result<u16> {
        let contract = IEVault::new(vault, self.provider());
        let result = contract
            .interestFee()
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get interest fee: {}", e)))?;
        Ok(result)
    }

    /// Get the vault's raw (encoded) supply cap.
    async fn supply_cap_raw(&self, vault: Address) -> Result<u16> {
        let contract = IEVault::new(vault, self.provider());
        let result = contract
            .caps()
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get caps: {}", e)))?;
        Ok(result.supplyCap)
    }

    /// Get a holder's share balance in the vault.
    async fn balance_of(&self, vault: Address, holder: Address) -> Result<U256> {
        let contract = IEVault::new(vault, self.provider());
        let result = contract
            .balanceOf(holder)
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get balance: {}", e)))?;
        Ok(result)
    }

    /// Get the maximum amount an owner can currently withdraw.
    async fn max_withdraw(&self, vault: Address, owner: Address) -> Result<U256> {
        let contract = IEVault::new(vault, self.provider());
        let result = contract
            .maxWithdraw(owner)
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get max withdraw: {}", e)))?;
        Ok(result)
    }

    /// Converts a share amount to assets via the vault's `previewRedeem`.
    ///
    /// Zero shares resolve to zero assets without a chain round-trip;
    /// the vault's answer is otherwise returned verbatim.
    async fn convert_shares_to_assets(&self, vault: Address, shares: U256) -> Result<U256> {
        if shares.is_zero() {
            return Ok(U256::ZERO);
        }
        let contract = IEVault::new(vault, self.provider());
        let result = contract
            .previewRedeem(shares)
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to preview redeem: {}", e)))?;
        Ok(result)
    }

    /// Gets a holder's position in the vault, denominated in assets.
    ///
    /// Reads the share balance and converts it through `previewRedeem`.
    async fn balance_of_assets(&self, vault: Address, holder: Address) -> Result<U256> {
        let shares = self.balance_of(vault, holder).await?;
        self.convert_shares_to_assets(vault, shares).await
    }

    /// Reads the vault's interest-rate-model parameters from the lens.
    async fn irm_info(&self, lens: Address, vault: Address) -> Result<IrmInfo> {
        let contract = IVaultLens::new(lens, self.provider());
        let info = contract
            .getVaultInterestRateModelInfo(vault)
            .call()
            .await
            .map_err(|e| ContractError::CallFailed(format!("Failed to get IRM info: {}", e)))?;
        Ok(IrmInfo {
            interest_rate_model: info.interestRateModel,
            model_type: info.interestRateModelType,
            base_rate: info.baseRate,
            kink: info.kink,
            slope1: info.slope1,
            slope2: info.slope2,
            rate_at_target: info.rateAtTarget,
            target_utilization: info.targetUtilization,
            initial_rate_at_target: info.initialRateAtTarget,
            min_rate_at_target: info.minRateAtTarget,
            max_rate_at_target: info.maxRateAtTarget,
            curve_steepness: info.curveSteepness,
            adjustment_speed: info.adjustmentSpeed,
        })
    }
}

/// Read-only client for EVK strategy vaults.
pub struct EvkReadClient {
    provider: HttpProvider,
}

impl EvkReadClient {
    /// Create a new read client over an existing provider.
    pub fn new(provider: HttpProvider) -> Self {
        Self { provider }
    }
}

impl EvkReads for EvkReadClient {
    fn provider(&self) -> &HttpProvider {
        &self.provider
    }
}
