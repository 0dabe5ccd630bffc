// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use crate::common::error::AppError;
use crate::domain::constants::GAS_HEADROOM_BPS;
use crate::network::gas::GasOracle;
use crate::network::nonce::NonceManager;
use crate::network::provider::HttpProvider;
use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::eips::eip2930::AccessList;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, B256, Bytes, TxKind, U256};
use alloy::providers::Provider;
use alloy::rpc::types::eth::{TransactionInput, TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Signs and submits EIP-1559 transactions, one nonce at a time.
///
/// Every transaction in a deployment run goes through `submit`, which takes
/// the next nonce from the shared manager. Address predictions depend on the
/// nonce series staying gapless, so there is no retry on send: a failed send
/// aborts the run rather than risking a burned or reused nonce.
pub struct TxSender {
    provider: HttpProvider,
    signer: PrivateKeySigner,
    chain_id: u64,
    nonce: NonceManager,
    gas: GasOracle,
    receipt_poll: Duration,
    receipt_timeout: Duration,
}

impl TxSender {
    pub fn new(
        provider: HttpProvider,
        signer: PrivateKeySigner,
        chain_id: u64,
        nonce: NonceManager,
        gas: GasOracle,
        receipt_poll: Duration,
        receipt_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            signer,
            chain_id,
            nonce,
            gas,
            receipt_poll,
            receipt_timeout,
        }
    }

    pub fn sender_address(&self) -> Address {
        self.nonce.address()
    }

    pub fn nonce_manager(&self) -> &NonceManager {
        &self.nonce
    }

    /// Deploy a contract from its init code (creation bytecode plus encoded
    /// constructor args). Returns the created address and the tx hash.
    pub async fn deploy(&self, init_code: Bytes) -> Result<(Address, B256), AppError> {
        let receipt = self.submit(TxKind::Create, init_code).await?;
        let hash = receipt.transaction_hash;
        let deployed = receipt.contract_address.ok_or_else(|| AppError::Deploy(
            format!("Receipt for {hash:#x} carries no contract address"),
        ))?;
        Ok((deployed, hash))
    }

    /// Call a deployed contract with pre-encoded calldata.
    pub async fn call(&self, to: Address, calldata: Bytes) -> Result<B256, AppError> {
        let receipt = self.submit(TxKind::Call(to), calldata).await?;
        Ok(receipt.transaction_hash)
    }

    async fn submit(&self, to: TxKind, input: Bytes) -> Result<TransactionReceipt, AppError> {
        let fees = self.gas.estimate_eip1559_fees().await?;
        let gas_limit = self.estimate_gas_with_headroom(to, &input).await?;
        let nonce = self.nonce.next().await?;

        let mut tx = TxEip1559 {
            chain_id: self.chain_id,
            nonce,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
            max_fee_per_gas: fees.max_fee_per_gas,
            gas_limit,
            to,
            value: U256::ZERO,
            access_list: AccessList::default(),
            input,
        };

        let sig = TxSignerSync::sign_transaction_sync(&self.signer, &mut tx)
            .map_err(|e| AppError::Deploy(format!("Sign tx failed: {}", e)))?;
        let signed: TxEnvelope = tx.into_signed(sig).into();
        let hash = *signed.tx_hash();
        let raw = signed.encoded_2718();

        tracing::debug!(
            target: "deploy",
            tx = %format!("{hash:#x}"),
            nonce,
            gas_limit,
            max_fee = fees.max_fee_per_gas,
            "Submitting transaction"
        );

        self.provider
            .send_raw_transaction(raw.as_slice())
            .await
            .map_err(|e| AppError::Connection(format!("Raw tx send failed: {}", e)))?;

        self.await_receipt(hash).await
    }

    async fn estimate_gas_with_headroom(&self, to: TxKind, input: &Bytes) -> Result<u64, AppError> {
        let request = TransactionRequest {
            from: Some(self.nonce.address()),
            to: Some(to),
            input: TransactionInput::new(input.clone()),
            ..Default::default()
        };

        let estimated = self
            .provider
            .estimate_gas(request)
            .await
            .map_err(|e| AppError::Deploy(format!("Gas estimation failed: {}", e)))?;

        Ok(estimated.saturating_mul(GAS_HEADROOM_BPS) / 10_000)
    }

    async fn await_receipt(&self, hash: B256) -> Result<TransactionReceipt, AppError> {
        let deadline = Instant::now() + self.receipt_timeout;
        loop {
            match self.provider.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    if !receipt.status() {
                        return Err(AppError::Transaction {
                            hash: format!("{hash:#x}"),
                            reason: "transaction reverted".into(),
                        });
                    }
                    tracing::debug!(
                        target: "deploy",
                        tx = %format!("{hash:#x}"),
                        block = receipt.block_number,
                        gas_used = receipt.gas_used,
                        "Transaction confirmed"
                    );
                    return Ok(receipt);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(target: "rpc", error = %e, "Receipt lookup failed, retrying");
                }
            }

            if Instant::now() >= deadline {
                return Err(AppError::Transaction {
                    hash: format!("{hash:#x}"),
                    reason: format!(
                        "no receipt after {}ms",
                        self.receipt_timeout.as_millis()
                    ),
                });
            }
            sleep(self.receipt_poll).await;
        }
    }
}
