//! Euler Earn vault interface definitions.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IEulerEarn {
        struct Strategy {
            uint120 allocated;
            uint120 cap;
            uint8 status;
        }

        // Views
        function asset() external view returns (address);
        function decimals() external view returns (uint8);
        function getStrategy(address strategy) external view returns (Strategy memory);
        function withdrawalQueue() external view returns (address[] memory);
        function totalAllocated() external view returns (uint256);
        function totalAssetsAllocatable() external view returns (uint256);

        // Rebalances the vault's capital over the given strategy order
        function rebalance(address[] calldata strategies) external;
    }
}
