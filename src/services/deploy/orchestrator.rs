// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use crate::common::error::AppError;
use crate::data::artifact::ArtifactStore;
use crate::data::pool_registry::PoolConfig;
use crate::network::provider::HttpProvider;
use crate::services::contracts::{IERC20Extended, IUniswapRouter, IUniswapV2Pair};
use crate::services::deploy::predictor::{DeployAddressPredictor, predict_create_address};
use crate::services::deploy::routes::StrategyRoutes;
use crate::services::deploy::sender::TxSender;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolValue;

const VAULT_NAME_BRAND: &str = "Vaultsmith";
const VAULT_SYMBOL_BRAND: &str = "VS";

/// Addresses produced by one pool deployment.
#[derive(Clone, Debug)]
pub struct VaultDeployment {
    pub pool_id: String,
    pub vault_name: String,
    pub vault_symbol: String,
    pub treasury: Address,
    pub vault: Address,
    pub strategy: Address,
}

/// Runs the fixed deployment sequence for a pool.
///
/// The sequence is strict and is never retried as a whole: treasury, then
/// vault (constructed with the predicted strategy address), then strategy.
/// The vault deploy consumes one nonce, so the strategy is predicted at
/// offset 1 before the vault goes out. After the strategy lands the
/// orchestrator compares the real address with the prediction and aborts on
/// mismatch; a vault pointing at the wrong strategy is unrecoverable short
/// of redeploying.
pub struct DeployOrchestrator {
    provider: HttpProvider,
    sender: TxSender,
    predictor: DeployAddressPredictor,
    artifacts: ArtifactStore,
    keeper: Address,
    strategist: Address,
    fee_recipient: Address,
    approval_delay_secs: u64,
    dry_run: bool,
}

impl DeployOrchestrator {
    pub fn new(
        provider: HttpProvider,
        sender: TxSender,
        predictor: DeployAddressPredictor,
        artifacts: ArtifactStore,
        keeper: Address,
        strategist: Address,
        fee_recipient: Address,
        approval_delay_secs: u64,
        dry_run: bool,
    ) -> Self {
        Self {
            provider,
            sender,
            predictor,
            artifacts,
            keeper,
            strategist,
            fee_recipient,
            approval_delay_secs,
            dry_run,
        }
    }

    /// Deploy treasury, vault and strategy for one pool entry. Returns
    /// `None` on a dry run after logging the full plan.
    ///
    /// `sends_before` is the number of transactions a dry run assumes will
    /// be sent from the deployer ahead of this pool (three per preceding
    /// pool in a multi-pool run). Real runs read the live pending count, so
    /// it only shapes the dry-run plan.
    pub async fn deploy_pool(
        &self,
        pool: &PoolConfig,
        wrapped_native: Address,
        sends_before: u64,
    ) -> Result<Option<VaultDeployment>, AppError> {
        tracing::info!(target: "deploy", pool = %pool.id, "Starting pool deployment");

        let router_native = self.router_wrapped_native(pool.router).await?;
        if router_native != wrapped_native {
            tracing::warn!(
                target: "deploy",
                router = %router_native,
                configured = %wrapped_native,
                "Router WETH() disagrees with configured wrapped native"
            );
        }

        let (token0, token1) = self.pair_tokens(pool.lp_token).await?;
        let symbol0 = self.token_symbol(token0).await?;
        let symbol1 = self.token_symbol(token1).await?;

        let (vault_name, vault_symbol) =
            vault_identity(&pool.protocol_name, &pool.protocol_symbol, &symbol0, &symbol1);
        let routes = StrategyRoutes::for_pool(pool, wrapped_native, token0, token1);

        tracing::info!(
            target: "deploy",
            pool = %pool.id,
            name = %vault_name,
            symbol = %vault_symbol,
            %token0,
            %token1,
            dual_reward = routes.is_dual_reward(),
            "Resolved pool inputs"
        );

        if self.dry_run {
            let pending = self.predictor.pending_count().await?;
            let plan = planned_pool_addresses(self.predictor.deployer(), pending, sends_before);
            tracing::info!(
                target: "deploy",
                pool = %pool.id,
                treasury = %plan.treasury,
                vault = %plan.vault,
                predicted_strategy = %plan.strategy,
                "Dry run: no transactions sent"
            );
            return Ok(None);
        }

        let treasury = self.deploy_treasury().await?;

        // Offset 1: the vault deploy below consumes the next nonce, the
        // strategy lands on the one after.
        let predicted_strategy = self.predictor.predict(1).await?;
        tracing::info!(
            target: "deploy",
            predicted_strategy = %predicted_strategy,
            "Predicted strategy address"
        );

        let vault = self
            .deploy_vault(predicted_strategy, &vault_name, &vault_symbol)
            .await?;

        let strategy_args = encode_strategy_args(
            pool,
            vault,
            self.keeper,
            self.strategist,
            self.fee_recipient,
            &routes,
        );
        let strategy = self
            .deploy_contract(&pool.strategy_artifact, strategy_args)
            .await?;

        verify_predicted(predicted_strategy, strategy)?;

        tracing::info!(
            target: "deploy",
            pool = %pool.id,
            %treasury,
            %vault,
            %strategy,
            "Pool deployment complete"
        );

        Ok(Some(VaultDeployment {
            pool_id: pool.id.clone(),
            vault_name,
            vault_symbol,
            treasury,
            vault,
            strategy,
        }))
    }

    /// Deploy the standalone Multicall helper. No constructor args.
    pub async fn deploy_multicall(&self) -> Result<Option<Address>, AppError> {
        if self.dry_run {
            tracing::info!(target: "deploy", "Dry run: would deploy Multicall");
            return Ok(None);
        }
        let deployed = self.deploy_contract("Multicall", Vec::new()).await?;
        tracing::info!(target: "deploy", multicall = %deployed, "Multicall deployed");
        Ok(Some(deployed))
    }

    async fn deploy_treasury(&self) -> Result<Address, AppError> {
        let treasury = self.deploy_contract("Treasury", Vec::new()).await?;
        tracing::info!(target: "deploy", %treasury, "Treasury deployed");
        Ok(treasury)
    }

    async fn deploy_vault(
        &self,
        strategy: Address,
        name: &str,
        symbol: &str,
    ) -> Result<Address, AppError> {
        let args = (
            strategy,
            name.to_string(),
            symbol.to_string(),
            U256::from(self.approval_delay_secs),
        )
            .abi_encode_params();
        let vault = self.deploy_contract("Vault", args).await?;
        tracing::info!(target: "deploy", %vault, "Vault deployed");
        Ok(vault)
    }

    async fn deploy_contract(
        &self,
        artifact_name: &str,
        constructor_args: Vec<u8>,
    ) -> Result<Address, AppError> {
        let artifact = self.artifacts.load(artifact_name)?;
        let init_code = assemble_init_code(&artifact.bytecode, &constructor_args);
        let (deployed, hash) = self.sender.deploy(init_code).await?;
        tracing::debug!(
            target: "deploy",
            contract = artifact_name,
            address = %deployed,
            tx = %format!("{hash:#x}"),
            "Contract deployed"
        );
        Ok(deployed)
    }

    async fn router_wrapped_native(&self, router: Address) -> Result<Address, AppError> {
        let router = IUniswapRouter::new(router, self.provider.clone());
        router
            .WETH()
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("router WETH() failed: {}", e)))
    }

    async fn pair_tokens(&self, lp_token: Address) -> Result<(Address, Address), AppError> {
        let pair = IUniswapV2Pair::new(lp_token, self.provider.clone());
        let token0 = pair
            .token0()
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("pair token0() failed: {}", e)))?;
        let token1 = pair
            .token1()
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("pair token1() failed: {}", e)))?;
        Ok((token0, token1))
    }

    async fn token_symbol(&self, token: Address) -> Result<String, AppError> {
        let erc20 = IERC20Extended::new(token, self.provider.clone());
        erc20
            .symbol()
            .call()
            .await
            .map_err(|e| AppError::Connection(format!("symbol() failed for {token}: {}", e)))
    }
}

/// Where one pool deployment will land, derived from the deployer's pending
/// count. Treasury, vault and strategy each consume one nonce, in that order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedPoolAddresses {
    pub treasury: Address,
    pub vault: Address,
    pub strategy: Address,
}

/// Plan the three deployment addresses for a pool. `sends_before` counts
/// transactions expected from the deployer ahead of this pool's treasury.
pub fn planned_pool_addresses(
    deployer: Address,
    pending_count: u64,
    sends_before: u64,
) -> PlannedPoolAddresses {
    let base = pending_count + sends_before;
    PlannedPoolAddresses {
        treasury: predict_create_address(deployer, base),
        vault: predict_create_address(deployer, base + 1),
        strategy: predict_create_address(deployer, base + 2),
    }
}

fn verify_predicted(predicted: Address, actual: Address) -> Result<(), AppError> {
    if actual != predicted {
        return Err(AppError::AddressMismatch {
            predicted: format!("{predicted:#x}"),
            actual: format!("{actual:#x}"),
        });
    }
    Ok(())
}

/// Share-token identity from the protocol branding and the pair legs.
pub fn vault_identity(
    protocol_name: &str,
    protocol_symbol: &str,
    symbol0: &str,
    symbol1: &str,
) -> (String, String) {
    let name = format!("{VAULT_NAME_BRAND} {protocol_name} LP {symbol0}-{symbol1}");
    let symbol = format!(
        "{VAULT_SYMBOL_BRAND}-{}-LP-{symbol0}-{symbol1}",
        protocol_symbol.to_uppercase()
    );
    (name, symbol)
}

/// Creation bytecode followed by the ABI-encoded constructor arguments.
pub fn assemble_init_code(bytecode: &Bytes, constructor_args: &[u8]) -> Bytes {
    let mut init = Vec::with_capacity(bytecode.len() + constructor_args.len());
    init.extend_from_slice(bytecode);
    init.extend_from_slice(constructor_args);
    Bytes::from(init)
}

/// ABI-encoded strategy constructor arguments.
///
/// Single-reward strategies take eleven parameters ending in the three swap
/// routes. Dual-reward strategies take twelve, with the reward-to-output
/// route inserted after the output-to-native route.
pub fn encode_strategy_args(
    pool: &PoolConfig,
    vault: Address,
    keeper: Address,
    strategist: Address,
    fee_recipient: Address,
    routes: &StrategyRoutes,
) -> Vec<u8> {
    match &routes.reward_to_output {
        Some(reward_to_output) => (
            pool.lp_token,
            U256::from(pool.pool_id),
            pool.chef,
            vault,
            pool.router,
            keeper,
            strategist,
            fee_recipient,
            routes.output_to_native.clone(),
            reward_to_output.clone(),
            routes.output_to_lp0.clone(),
            routes.output_to_lp1.clone(),
        )
            .abi_encode_params(),
        None => (
            pool.lp_token,
            U256::from(pool.pool_id),
            pool.chef,
            vault,
            pool.router,
            keeper,
            strategist,
            fee_recipient,
            routes.output_to_native.clone(),
            routes.output_to_lp0.clone(),
            routes.output_to_lp1.clone(),
        )
            .abi_encode_params(),
    }
}
