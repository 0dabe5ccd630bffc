// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;
use clap::{Parser, Subcommand};
use std::str::FromStr;
use std::time::Duration;
use vaultsmith::app::config::GlobalSettings;
use vaultsmith::app::logging::setup_logging;
use vaultsmith::data::artifact::ArtifactStore;
use vaultsmith::data::pool_registry::{ChainPools, PoolRegistry};
use vaultsmith::deploy::{DeployAddressPredictor, DeployOrchestrator, TxSender};
use vaultsmith::domain::constants;
use vaultsmith::domain::error::AppError;
use vaultsmith::network::gas::GasOracle;
use vaultsmith::network::nonce::NonceManager;
use vaultsmith::network::provider::ConnectionFactory;
use vaultsmith::services::interact::InteractionRunner;

#[derive(Parser, Debug)]
#[command(author, version, about = "vaultsmith deployment tool")]
struct Cli {
    /// Path to config file (default: config.{toml,yaml,...})
    #[arg(long)]
    config: Option<String>,

    /// Do not submit transactions, only resolve inputs and log the plan
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Target chain id (overrides config; auto-detected when absent)
    #[arg(long)]
    chain: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deploy treasury, vault and strategy for registry pools
    Deploy {
        /// Deploy only the pool with this registry id
        #[arg(long)]
        pool: Option<String>,
    },
    /// Deploy the standalone Multicall helper
    DeployMulticall,
    /// Call harvest() on a vault's strategy
    Harvest { vault: Address },
    /// Approve and deposit a 1/100 balance slice into a vault
    Deposit { vault: Address },
    /// Read-only smoke check against a token or LP pair
    Reads { token: Address },
    /// Print the CREATE address of a future deployment
    Predict {
        /// Transactions sent from the deployer before the predicted one
        #[arg(long, default_value_t = 1)]
        offset: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let settings = GlobalSettings::load_with_path(cli.config.as_deref())?;
    setup_logging(if settings.debug { "debug" } else { "info" }, false);

    if let Some(key) = settings.etherscan_api_key_value()
        && std::env::var("ETHERSCAN_API_KEY").is_err()
    {
        unsafe { std::env::set_var("ETHERSCAN_API_KEY", key) };
    }

    let signer = PrivateKeySigner::from_str(&settings.wallet_key)
        .map_err(|e| AppError::Config(format!("Invalid wallet key: {}", e)))?;
    let deployer = signer.address();
    if let Some(expected) = settings.wallet_address
        && expected != deployer
    {
        return Err(AppError::Config(format!(
            "wallet_address {} does not match wallet_key address {}",
            expected, deployer
        )));
    }

    // Auto-detect chain if not explicitly configured
    let chain_id: u64 = match cli.chain.or(settings.chain) {
        Some(chain_id) => chain_id,
        None => {
            let url = settings.primary_http_provider().ok_or_else(|| {
                AppError::Config(
                    "No chain configured and no http_provider available to auto-detect".into(),
                )
            })?;
            let http = ConnectionFactory::http(&url)?;
            let detected = http
                .get_chain_id()
                .await
                .map_err(|e| AppError::Connection(format!("chain_id detect failed: {e}")))?;
            tracing::info!(target: "config", detected_chain = detected, rpc = %url, "Auto-detected chain_id from RPC");
            detected
        }
    };

    let rpc_url = settings.get_http_provider(chain_id)?;
    let provider = ConnectionFactory::http(&rpc_url)?;
    tracing::info!(target: "config", chain_id, rpc = %rpc_url, %deployer, dry_run = cli.dry_run, "Connected");

    let nonce_manager = NonceManager::new(provider.clone(), deployer);
    let gas_oracle = GasOracle::new(provider.clone(), chain_id, settings.max_gas_price_gwei);
    // Poll no faster than half a block.
    let receipt_poll_ms = settings
        .receipt_poll_ms_value()
        .max(constants::get_block_time(chain_id) * 500);
    let sender = TxSender::new(
        provider.clone(),
        signer,
        chain_id,
        nonce_manager.clone(),
        gas_oracle,
        Duration::from_millis(receipt_poll_ms),
        Duration::from_millis(settings.receipt_timeout_ms_value()),
    );
    let predictor = DeployAddressPredictor::new(provider.clone(), deployer);

    match cli.command {
        Command::Deploy { pool } => {
            let registry = PoolRegistry::load_from_file(&settings.pools_path())?;
            let chain_pools = registry.chain(chain_id).ok_or_else(|| {
                AppError::Config(format!("No pools configured for chain {}", chain_id))
            })?;
            let orchestrator = build_orchestrator(&settings, provider, sender, predictor, deployer, cli.dry_run);
            run_deploy(&orchestrator, &nonce_manager, chain_pools, pool.as_deref(), cli.dry_run).await
        }
        Command::DeployMulticall => {
            let orchestrator = build_orchestrator(&settings, provider, sender, predictor, deployer, cli.dry_run);
            nonce_manager.resync().await?;
            orchestrator.deploy_multicall().await.map(|_| ())
        }
        Command::Harvest { vault } => {
            let runner = InteractionRunner::new(provider, sender, cli.dry_run);
            nonce_manager.resync().await?;
            runner.harvest(vault).await
        }
        Command::Deposit { vault } => {
            let runner = InteractionRunner::new(provider, sender, cli.dry_run);
            nonce_manager.resync().await?;
            runner.deposit(vault).await
        }
        Command::Reads { token } => {
            let runner = InteractionRunner::new(provider, sender, cli.dry_run);
            runner.reads(token).await
        }
        Command::Predict { offset } => {
            let predicted = predictor.predict(offset).await?;
            tracing::info!(target: "deploy", %deployer, offset, %predicted, "Predicted CREATE address");
            Ok(())
        }
    }
}

fn build_orchestrator(
    settings: &GlobalSettings,
    provider: vaultsmith::network::provider::HttpProvider,
    sender: TxSender,
    predictor: DeployAddressPredictor,
    deployer: Address,
    dry_run: bool,
) -> DeployOrchestrator {
    let artifacts = ArtifactStore::new(settings.artifacts_dir());
    DeployOrchestrator::new(
        provider,
        sender,
        predictor,
        artifacts,
        settings.keeper.unwrap_or(deployer),
        settings.strategist.unwrap_or(deployer),
        settings.fee_recipient.unwrap_or(deployer),
        settings.approval_delay_secs,
        dry_run,
    )
}

async fn run_deploy(
    orchestrator: &DeployOrchestrator,
    nonce_manager: &NonceManager,
    chain_pools: &ChainPools,
    only_pool: Option<&str>,
    dry_run: bool,
) -> Result<(), AppError> {
    let selected: Vec<_> = match only_pool {
        Some(id) => {
            let pool = chain_pools
                .pools
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| AppError::Config(format!("Pool '{}' not in registry", id)))?;
            vec![pool]
        }
        None => chain_pools.pools.iter().collect(),
    };

    if selected.is_empty() {
        return Err(AppError::Config("Pool registry has no pools for this chain".into()));
    }

    if !dry_run {
        nonce_manager.resync().await?;
    }

    // Dry runs never send, so the plan for each pool has to account for the
    // three transactions every preceding pool would have consumed.
    let mut planned_sends = 0u64;
    for pool in selected {
        if let Some(deployment) = orchestrator
            .deploy_pool(pool, chain_pools.wrapped_native, planned_sends)
            .await?
        {
            tracing::info!(
                target: "deploy",
                pool = %deployment.pool_id,
                name = %deployment.vault_name,
                symbol = %deployment.vault_symbol,
                treasury = %deployment.treasury,
                vault = %deployment.vault,
                strategy = %deployment.strategy,
                "Deployment summary"
            );
        }
        if dry_run {
            planned_sends += 3;
        }
    }
    Ok(())
}
