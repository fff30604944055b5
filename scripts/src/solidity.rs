//! Definitions of the Solidity interfaces the scripts deploy and call

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use alloy_sol_types::sol;

sol! {
    contract MockV3Aggregator {
        constructor(uint8 _decimals, int256 _initialAnswer);

        function decimals() external view returns (uint8);
        function latestAnswer() external view returns (int256);
        function updateAnswer(int256 _answer) external;
    }
}

sol! {
    contract LinkToken {
        function transfer(address _to, uint256 _value) external returns (bool);
        function balanceOf(address _owner) external view returns (uint256);
    }
}

sol! {
    contract VRFCoordinatorMock {
        constructor(address linkAddress);

        function callBackWithRandomness(bytes32 requestId, uint256 randomness, address consumerContract) external;
    }
}

sol! {
    contract Lottery {
        constructor(address _priceFeedAddress, address _vrfCoordinator, address _link, uint256 _fee, bytes32 _keyhash);

        function getEntranceFee() external view returns (uint256);
        function startLottery() external;
        function enter() external payable;
        function endLottery() external;
        function recentWinner() external view returns (address);

        event RequestedRandomness(bytes32 requestId);
    }
}
