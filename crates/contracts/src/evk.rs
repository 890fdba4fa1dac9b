//! EVK strategy vault and lens interface definitions.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IEVault {
        // ERC-4626 / ERC-20 views
        function asset() external view returns (address);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string memory);
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function previewRedeem(uint256 shares) external view returns (uint256 assets);
        function maxWithdraw(address owner) external view returns (uint256 maxAssets);

        // EVK vault state
        function cash() external view returns (uint256);
        function totalBorrows() external view returns (uint256);
        function interestFee() external view returns (uint16);
        function interestRateModel() external view returns (address);
        function caps() external view returns (uint16 supplyCap, uint16 borrowCap);
    }
}

sol! {
    /// Periphery lens exposing a vault's interest-rate-model parameters
    /// in one call. Fields that do not apply to the reported model type
    /// are zero.
    #[sol(rpc)]
    interface IVaultLens {
        struct VaultInterestRateModelInfo {
            address vault;
            address interestRateModel;
            string interestRateModelType;
            uint256 baseRate;
            uint256 kink;
            uint256 slope1;
            uint256 slope2;
            uint256 rateAtTarget;
            uint256 targetUtilization;
            uint256 initialRateAtTarget;
            uint256 minRateAtTarget;
            uint256 maxRateAtTarget;
            uint256 curveSteepness;
            uint256 adjustmentSpeed;
        }

        function getVaultInterestRateModelInfo(address vault) external view returns (VaultInterestRateModelInfo memory);
    }
}
