//! Provider construction for contract clients.

use alloy::network::EthereumWallet;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::Address;

use crate::error::{ContractError, Result};

/// The type-erased provider used by all clients in this crate.
pub type HttpProvider = alloy::providers::DynProvider;

/// Connects a read-only HTTP provider to the given RPC endpoint.
pub fn connect_http(rpc_url: &str) -> Result<HttpProvider> {
    let url: url::Url = rpc_url
        .parse()
        .map_err(|e| ContractError::RpcConnection(format!("{}", e)))?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

/// Connects a provider with a local wallet signer attached.
///
/// Returns the provider together with the signer's address.
pub fn connect_http_with_signer(
    rpc_url: &str,
    private_key: &str,
) -> Result<(HttpProvider, Address)> {
    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|_| ContractError::InvalidPrivateKey)?;
    let signer_address = signer.address();
    let wallet = EthereumWallet::from(signer);

    let url: url::Url = rpc_url
        .parse()
        .map_err(|e| ContractError::RpcConnection(format!("{}", e)))?;

    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .connect_http(url)
        .erased();

    Ok((provider, signer_address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rpc_url() {
        let result = connect_http("not a valid url");
        assert!(matches!(result, Err(ContractError::RpcConnection(_))));
    }

    #[test]
    fn test_invalid_private_key() {
        let result = connect_http_with_signer("http://localhost:8545", "invalid_key");
        assert!(matches!(result, Err(ContractError::InvalidPrivateKey)));
    }

    #[test]
    fn test_valid_construction() {
        let private_key = "0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
        let result = connect_http_with_signer("http://localhost:8545", private_key);
        assert!(result.is_ok());
    }
}
