// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

//! One-shot interactions against already deployed contracts: harvest a
//! strategy, seed a vault with a test deposit, or run a read-only smoke
//! check against a token or pair.

use crate::common::error::AppError;
use crate::network::provider::HttpProvider;
use crate::services::contracts::{IERC20Extended, IUniswapV2Pair, Strategy, Vault};
use crate::services::deploy::sender::TxSender;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

pub struct InteractionRunner {
    provider: HttpProvider,
    sender: TxSender,
    dry_run: bool,
}

impl InteractionRunner {
    pub fn new(provider: HttpProvider, sender: TxSender, dry_run: bool) -> Self {
        Self {
            provider,
            sender,
            dry_run,
        }
    }

    /// Resolve the vault's current strategy and call `harvest()` on it.
    pub async fn harvest(&self, vault: Address) -> Result<(), AppError> {
        let vault_contract = Vault::new(vault, self.provider.clone());
        let strategy = vault_contract
            .strategy()
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("vault strategy() failed: {}", e)))?;

        if self.dry_run {
            tracing::info!(target: "interact", %vault, %strategy, "Dry run: would harvest");
            return Ok(());
        }

        let calldata = Bytes::from(Strategy::harvestCall {}.abi_encode());
        let hash = self.sender.call(strategy, calldata).await?;
        tracing::info!(
            target: "interact",
            %strategy,
            tx = %format!("{hash:#x}"),
            "Harvest sent"
        );
        Ok(())
    }

    /// Approve the vault for the deployer's want balance and deposit a 1/100
    /// slice of it. A sanity deposit, not a capital move.
    pub async fn deposit(&self, vault: Address) -> Result<(), AppError> {
        let vault_contract = Vault::new(vault, self.provider.clone());
        let want = vault_contract
            .want()
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("vault want() failed: {}", e)))?;

        let owner = self.sender.sender_address();
        let want_contract = IERC20Extended::new(want, self.provider.clone());
        let balance = want_contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("balanceOf() failed: {}", e)))?;

        let amount = balance / U256::from(100);
        if amount.is_zero() {
            return Err(AppError::Validation {
                field: "deposit.amount".into(),
                message: format!("deployer holds no want token ({want}) to deposit"),
            });
        }

        if self.dry_run {
            tracing::info!(
                target: "interact",
                %vault,
                %want,
                %amount,
                "Dry run: would approve and deposit"
            );
            return Ok(());
        }

        let approve = Bytes::from(
            IERC20Extended::approveCall {
                spender: vault,
                amount,
            }
            .abi_encode(),
        );
        self.sender.call(want, approve).await?;

        let allowance = want_contract
            .allowance(owner, vault)
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("allowance() failed: {}", e)))?;
        tracing::info!(target: "interact", %allowance, "Vault allowance set");

        let deposit = Bytes::from(Vault::depositCall { amount }.abi_encode());
        let hash = self.sender.call(vault, deposit).await?;
        tracing::info!(
            target: "interact",
            %vault,
            %amount,
            tx = %format!("{hash:#x}"),
            "Deposit sent"
        );
        Ok(())
    }

    /// Read-only smoke check: the token's identity, and if it is an LP pair,
    /// both legs and their names. Never sends a transaction.
    pub async fn reads(&self, token: Address) -> Result<(), AppError> {
        let erc20 = IERC20Extended::new(token, self.provider.clone());
        let name = erc20
            .name()
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("name() failed for {token}: {}", e)))?;
        let symbol = erc20
            .symbol()
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("symbol() failed for {token}: {}", e)))?;
        tracing::info!(target: "interact", %token, name, symbol, "Token identity");

        let pair = IUniswapV2Pair::new(token, self.provider.clone());
        match pair.token0().call().await {
            Ok(token0) => {
                let token1 = pair
                    .token1()
                    .call()
                    .await
                    .map_err(|e| AppError::Connection(format!("token1() failed: {}", e)))?;
                let name0 = self.token_name(token0).await?;
                let name1 = self.token_name(token1).await?;
                tracing::info!(
                    target: "interact",
                    %token0,
                    name0,
                    %token1,
                    name1,
                    "LP pair legs"
                );
            }
            Err(_) => {
                tracing::info!(target: "interact", %token, "Not an LP pair, skipping leg reads");
            }
        }
        Ok(())
    }

    async fn token_name(&self, token: Address) -> Result<String, AppError> {
        let erc20 = IERC20Extended::new(token, self.provider.clone());
        erc20
            .name()
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("name() failed for {token}: {}", e)))
    }
}
