// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use crate::common::error::AppError;
use crate::common::retry::retry_async;
use crate::domain::constants::DEFAULT_PRIORITY_FEE_GWEI;
use crate::network::provider::HttpProvider;
use alloy::providers::Provider;
use alloy::rpc::types::BlockNumberOrTag;
use alloy::rpc::types::eth::FeeHistory;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct GasOracle {
    provider: HttpProvider,
    chain_id: u64,
    max_fee_cap_gwei: u64,
}

#[derive(Debug, Clone)]
pub struct GasFees {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    pub next_base_fee_per_gas: u128,
}

impl GasOracle {
    pub fn new(provider: HttpProvider, chain_id: u64, max_fee_cap_gwei: u64) -> Self {
        Self {
            provider,
            chain_id,
            max_fee_cap_gwei,
        }
    }

    pub async fn estimate_eip1559_fees(&self) -> Result<GasFees, AppError> {
        let fees = match self.with_retry_history().await {
            Ok(history) => Self::fees_from_history(history)?,
            Err(_) => self.fallback_estimate().await?,
        };

        let cap = (self.max_fee_cap_gwei as u128).saturating_mul(1_000_000_000);
        if fees.max_fee_per_gas > cap {
            return Err(AppError::Validation {
                field: "max_gas_price_gwei".into(),
                message: format!(
                    "estimated max fee {} wei exceeds configured cap {} gwei",
                    fees.max_fee_per_gas, self.max_fee_cap_gwei
                ),
            });
        }
        Ok(fees)
    }

    async fn with_retry_history(&self) -> Result<FeeHistory, AppError> {
        let provider = self.provider.clone();
        retry_async(
            move |_| {
                let provider = provider.clone();
                async move {
                    provider
                        .get_fee_history(5, BlockNumberOrTag::Latest, &[50.0f64])
                        .await
                }
            },
            3,
            Duration::from_millis(100),
        )
        .await
        .map_err(|e| AppError::Connection(format!("Fee history failed: {}", e)))
    }

    fn fees_from_history(history: FeeHistory) -> Result<GasFees, AppError> {
        let latest_base_fee = history
            .latest_block_base_fee()
            .or_else(|| history.base_fee_per_gas.iter().rev().nth(1).copied())
            .ok_or_else(|| AppError::Connection("No base fee history".into()))?;

        let raw_next_base = history.next_block_base_fee().unwrap_or(latest_base_fee);

        // 12.5% buffer for nodes that return zeroes.
        let next_base_fee = if raw_next_base == 0 {
            (latest_base_fee.saturating_mul(1125)) / 1000
        } else {
            raw_next_base
        };

        let mut p50_sum = 0u128;
        let mut p50_count = 0u128;
        if let Some(rewards) = &history.reward {
            for block_reward in rewards {
                if let Some(r) = block_reward.first() {
                    p50_sum = p50_sum.saturating_add(*r);
                    p50_count = p50_count.saturating_add(1);
                }
            }
        }
        let avg_p50 = if p50_count > 0 {
            p50_sum / p50_count
        } else {
            (DEFAULT_PRIORITY_FEE_GWEI as u128) * 1_000_000_000
        };

        Ok(GasFees {
            max_fee_per_gas: next_base_fee.saturating_add(avg_p50),
            max_priority_fee_per_gas: avg_p50,
            next_base_fee_per_gas: next_base_fee,
        })
    }

    async fn fallback_estimate(&self) -> Result<GasFees, AppError> {
        // 1) Etherscan gas oracle if an API key is present (mainnet only).
        if self.chain_id == 1
            && let Ok(key) = env::var("ETHERSCAN_API_KEY")
            && !key.is_empty()
            && let Ok(fees) = self.etherscan_gas_oracle(&key).await
        {
            return Ok(fees);
        }

        // 2) Fallback for nodes that disable feeHistory (common on public RPCs).
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(|e| AppError::Connection(format!("Latest block fetch failed: {}", e)))?;

        let base: u128 = block
            .as_ref()
            .and_then(|b| b.header.base_fee_per_gas)
            .map(|v| v as u128)
            .unwrap_or(1_500_000_000u128); // 1.5 gwei conservative default

        let priority: u128 = self
            .provider
            .get_max_priority_fee_per_gas()
            .await
            .unwrap_or((DEFAULT_PRIORITY_FEE_GWEI as u128) * 1_000_000_000);

        let next_base = (base.saturating_mul(1125)) / 1000;

        Ok(GasFees {
            max_fee_per_gas: next_base + priority,
            max_priority_fee_per_gas: priority,
            next_base_fee_per_gas: next_base,
        })
    }

    async fn etherscan_gas_oracle(&self, api_key: &str) -> Result<GasFees, AppError> {
        let url = format!(
            "https://api.etherscan.io/v2/api?chainid=1&module=gastracker&action=gasoracle&apikey={api_key}"
        );
        let resp = reqwest::get(&url)
            .await
            .map_err(|e| AppError::Connection(format!("Etherscan gasoracle failed: {}", e)))?;
        if !resp.status().is_success() {
            return Err(AppError::Connection(format!(
                "Etherscan gasoracle responded with {}",
                resp.status()
            )));
        }
        let parsed: EtherscanGasOracleResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Connection(format!("Etherscan gasoracle decode failed: {e}")))?;

        let result = parsed
            .result
            .ok_or_else(|| AppError::Connection("Etherscan gasoracle missing result".into()))?;

        // Values are strings in gwei per docs.
        let base_gwei: f64 = result
            .suggest_base_fee
            .parse()
            .map_err(|_| AppError::Connection("Invalid suggestBaseFee from Etherscan".into()))?;
        let tip_gwei: f64 = result
            .propose_gas_price
            .parse()
            .map_err(|_| AppError::Connection("Invalid ProposeGasPrice from Etherscan".into()))?;

        let base = (base_gwei * 1e9_f64) as u128;
        let priority = (tip_gwei * 1e9_f64) as u128;

        Ok(GasFees {
            max_fee_per_gas: base + priority,
            max_priority_fee_per_gas: priority,
            next_base_fee_per_gas: base,
        })
    }
}

#[derive(Debug, Deserialize)]
struct EtherscanGasOracleResponse {
    result: Option<EtherscanGasOracleResult>,
}

#[derive(Debug, Deserialize)]
struct EtherscanGasOracleResult {
    #[serde(rename = "suggestBaseFee")]
    suggest_base_fee: String,
    #[serde(rename = "ProposeGasPrice")]
    propose_gas_price: String,
}
