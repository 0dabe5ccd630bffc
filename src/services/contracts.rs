// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

//! Minimal ABI surface of the externally authored contracts this tool
//! instantiates and calls. Everything behind these signatures is opaque
//! deployed bytecode.

use alloy::sol;

sol! {
    #[sol(rpc)]
    contract IUniswapRouter {
        function WETH() external view returns (address);
    }

    #[sol(rpc)]
    contract IUniswapV2Pair {
        function token0() external view returns (address);
        function token1() external view returns (address);
    }

    #[sol(rpc)]
    contract IERC20Extended {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[sol(rpc)]
    contract Vault {
        function want() external view returns (address);
        function strategy() external view returns (address);
        function deposit(uint256 amount) external;
    }

    #[sol(rpc)]
    contract Strategy {
        function harvest() external;
    }
}
