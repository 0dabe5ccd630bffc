// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use crate::common::error::AppError;
use crate::common::retry::retry_async;
use crate::network::provider::HttpProvider;
use alloy::primitives::Address;
use alloy::providers::Provider;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Locally cached nonce for the deployer account.
///
/// The deployment orchestrator assigns every nonce through this manager, so
/// a run sends a strictly sequential series of transactions. Any transaction
/// sent from the same key outside the run invalidates pending address
/// predictions; `resync` realigns the cache with the chain before a run.
#[derive(Clone)]
pub struct NonceManager {
    provider: HttpProvider,
    address: Address,
    local_nonce: Arc<Mutex<Option<u64>>>,
}

impl NonceManager {
    pub fn new(provider: HttpProvider, address: Address) -> Self {
        Self {
            provider,
            address,
            local_nonce: Arc::new(Mutex::new(None)),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Next nonce to use; fetched from the chain on first call, then
    /// incremented locally.
    pub async fn next(&self) -> Result<u64, AppError> {
        let mut nonce_guard = self.local_nonce.lock().await;

        if let Some(nonce) = *nonce_guard {
            *nonce_guard = Some(nonce + 1);
            return Ok(nonce);
        }

        let on_chain_nonce = self.fetch_pending_count().await?;
        *nonce_guard = Some(on_chain_nonce + 1);
        Ok(on_chain_nonce)
    }

    /// Discard the local cache and realign with the chain.
    pub async fn resync(&self) -> Result<u64, AppError> {
        let mut nonce_guard = self.local_nonce.lock().await;
        let on_chain_nonce = self.fetch_pending_count().await?;
        *nonce_guard = Some(on_chain_nonce);
        tracing::debug!(target: "rpc", nonce = on_chain_nonce, "Nonce resynced");
        Ok(on_chain_nonce)
    }

    /// Pending transaction count, without touching the local cache.
    pub async fn pending_count(&self) -> Result<u64, AppError> {
        self.fetch_pending_count().await
    }

    async fn fetch_pending_count(&self) -> Result<u64, AppError> {
        let provider = self.provider.clone();
        let address = self.address;
        retry_async(
            move |_| {
                let provider = provider.clone();
                async move { provider.get_transaction_count(address).pending().await }
            },
            3,
            Duration::from_millis(100),
        )
        .await
        .map_err(|e| AppError::Connection(format!("Failed to fetch nonce: {}", e)))
    }
}
