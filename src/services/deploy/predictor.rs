// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use crate::common::error::AppError;
use crate::common::retry::retry_async;
use crate::network::provider::HttpProvider;
use alloy::primitives::Address;
use alloy::providers::Provider;
use std::time::Duration;

/// CREATE address for a contract deployed by `deployer` at `nonce`:
/// `keccak256(rlp([deployer, nonce]))[12..]`.
pub fn predict_create_address(deployer: Address, nonce: u64) -> Address {
    deployer.create(nonce)
}

/// Predicts where a future deployment from `deployer` will land.
///
/// The vault constructor takes the strategy address and the strategy
/// constructor takes the vault address. The cycle is broken by predicting
/// the strategy address one transaction ahead, deploying the vault with the
/// prediction baked in, then deploying the strategy so it lands exactly
/// there. The prediction holds only if exactly `offset` transactions are
/// sent from `deployer` before the predicted deployment; the orchestrator
/// verifies this after the fact.
#[derive(Clone)]
pub struct DeployAddressPredictor {
    provider: HttpProvider,
    deployer: Address,
}

impl DeployAddressPredictor {
    pub fn new(provider: HttpProvider, deployer: Address) -> Self {
        Self { provider, deployer }
    }

    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// Address of the deployment that will be the `offset`-th transaction
    /// sent after the current pending count. Read-only: calling this again
    /// without sending anything returns the same value.
    pub async fn predict(&self, offset: u64) -> Result<Address, AppError> {
        let count = self.pending_count().await?;
        Ok(predict_create_address(self.deployer, count + offset))
    }

    /// Current pending transaction count for the deployer.
    pub async fn pending_count(&self) -> Result<u64, AppError> {
        let provider = self.provider.clone();
        let deployer = self.deployer;
        retry_async(
            move |_| {
                let provider = provider.clone();
                async move { provider.get_transaction_count(deployer).pending().await }
            },
            3,
            Duration::from_millis(100),
        )
        .await
        .map_err(|e| AppError::Connection(format!("Failed to fetch transaction count: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    // Canonical CREATE vectors for 0x6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0.
    const DEPLOYER: Address = address!("6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0");

    #[test]
    fn matches_known_create_vectors() {
        assert_eq!(
            predict_create_address(DEPLOYER, 0),
            address!("cd234a471b72ba2f1ccf0a70fcaba648a5eecd8d")
        );
        assert_eq!(
            predict_create_address(DEPLOYER, 1),
            address!("343c43a37d37dff08ae8c4a11544c718abb4fcf8")
        );
        assert_eq!(
            predict_create_address(DEPLOYER, 2),
            address!("f778b86fa74e846c4f0a1fbd1335fe81c00a0c91")
        );
    }

    #[test]
    fn different_offsets_give_different_addresses() {
        let count = 7u64;
        let one = predict_create_address(DEPLOYER, count + 1);
        let two = predict_create_address(DEPLOYER, count + 2);
        assert_ne!(one, two);
    }

    #[test]
    fn prediction_is_pure() {
        let a = predict_create_address(DEPLOYER, 42);
        let b = predict_create_address(DEPLOYER, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn different_deployers_never_collide_on_same_nonce() {
        let other = address!("0000000000000000000000000000000000000001");
        assert_ne!(
            predict_create_address(DEPLOYER, 0),
            predict_create_address(other, 0)
        );
    }
}
