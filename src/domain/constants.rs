// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use alloy::primitives::{Address, address};
use lazy_static::lazy_static;
use std::collections::HashMap;

// =============================================================================
// NETWORK CONSTANTS
// =============================================================================

pub const CHAIN_FANTOM: u64 = 250;
pub const CHAIN_FANTOM_TESTNET: u64 = 4002;
pub const CHAIN_DOGECHAIN: u64 = 2000;
pub const CHAIN_AURORA: u64 = 1313161554;

/// Public fallback RPC endpoints, used when neither config nor env supplies one.
pub fn default_rpc_for_chain(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        CHAIN_FANTOM => Some("https://rpc.ftm.tools"),
        CHAIN_FANTOM_TESTNET => Some("https://rpcapi-tracing.testnet.fantom.network"),
        CHAIN_DOGECHAIN => Some("https://rpc.dogechain.dog"),
        CHAIN_AURORA => Some("https://mainnet.aurora.dev"),
        _ => None,
    }
}

// Block times in seconds (approximate), used to size receipt poll intervals.
pub fn get_block_time(chain_id: u64) -> u64 {
    match chain_id {
        CHAIN_FANTOM | CHAIN_FANTOM_TESTNET => 1,
        CHAIN_DOGECHAIN => 2,
        CHAIN_AURORA => 1,
        _ => 12,
    }
}

// =============================================================================
// WRAPPED NATIVE TOKENS
// =============================================================================

pub const WFTM_FANTOM: Address = address!("21be370D5312f44cB42ce377BC9b8a0cEF1A4C83");
pub const WWDOGE_DOGECHAIN: Address = address!("B7ddC6414bf4F5515b52D8BdD69973Ae205ff101");
pub const WETH_AURORA: Address = address!("C9BdeEd33CD01541e1eeD10f90519d2C06Fe3feB");

lazy_static! {
    static ref WRAPPED_NATIVE_BY_CHAIN: HashMap<u64, Address> = {
        let mut m = HashMap::new();
        m.insert(CHAIN_FANTOM, WFTM_FANTOM);
        m.insert(CHAIN_DOGECHAIN, WWDOGE_DOGECHAIN);
        m.insert(CHAIN_AURORA, WETH_AURORA);
        m
    };
}

pub fn wrapped_native_for_chain(chain_id: u64) -> Option<Address> {
    WRAPPED_NATIVE_BY_CHAIN.get(&chain_id).copied()
}

// =============================================================================
// DEPLOYMENT CONSTANTS
// =============================================================================

/// Vault upgrade timelock passed to the vault constructor, in seconds.
pub const DEFAULT_APPROVAL_DELAY_SECS: u64 = 60;

/// Headroom applied on top of eth_estimateGas for deploys and calls.
pub const GAS_HEADROOM_BPS: u64 = 12_000;

pub const DEFAULT_PRIORITY_FEE_GWEI: u64 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_rpc_known_chains_only() {
        assert!(default_rpc_for_chain(CHAIN_FANTOM).is_some());
        assert!(default_rpc_for_chain(CHAIN_DOGECHAIN).is_some());
        assert!(default_rpc_for_chain(31337).is_none());
    }

    #[test]
    fn wrapped_native_covers_deploy_targets() {
        assert_eq!(
            wrapped_native_for_chain(CHAIN_DOGECHAIN),
            Some(WWDOGE_DOGECHAIN)
        );
        assert!(wrapped_native_for_chain(31337).is_none());
    }
}
