// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use crate::common::error::AppError;
use crate::domain::constants;
use alloy::primitives::Address;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Static per-pool deployment target: one farm on one DEX.
///
/// Manually authored; nothing here is computed. The addresses are passed
/// verbatim into the strategy constructor, so correctness is on the author.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    pub id: String,
    pub protocol_name: String,
    pub protocol_symbol: String,
    pub lp_token: Address,
    pub router: Address,
    pub chef: Address,
    pub reward_token: Address,
    pub pool_id: u64,
    /// Secondary reward token for dual-reward farms (MiniChef style).
    pub secondary_reward: Option<Address>,
    /// Artifact name of the strategy contract to deploy for this pool.
    pub strategy_artifact: String,
}

#[derive(Clone, Debug)]
pub struct ChainPools {
    pub wrapped_native: Address,
    pub pools: Vec<PoolConfig>,
}

#[derive(Deserialize, Debug)]
struct PoolRegistryFile {
    chains: HashMap<String, ChainPoolsFile>,
}

#[derive(Deserialize, Debug)]
struct ChainPoolsFile {
    #[serde(default)]
    wrapped_native: Option<String>,
    #[serde(default)]
    pools: Vec<PoolConfigFile>,
}

#[derive(Deserialize, Debug)]
struct PoolConfigFile {
    id: String,
    protocol_name: String,
    protocol_symbol: String,
    lp_token: String,
    router: String,
    chef: String,
    reward_token: String,
    pool_id: u64,
    #[serde(default)]
    secondary_reward: Option<String>,
    strategy_artifact: String,
}

#[derive(Clone, Debug)]
pub struct PoolRegistry {
    chains: HashMap<u64, ChainPools>,
}

impl PoolRegistry {
    pub fn load_from_file(path: &str) -> Result<Self, AppError> {
        let p = Path::new(path);
        if !p.exists() {
            return Err(AppError::Config(format!(
                "Pool registry not found: {}",
                path
            )));
        }
        let raw = fs::read_to_string(p)
            .map_err(|e| AppError::Config(format!("Failed to read pool registry {}: {e}", path)))?;
        let file: PoolRegistryFile = serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("Failed to parse pool registry {}: {e}", path)))?;

        let mut chains: HashMap<u64, ChainPools> = HashMap::new();
        for (chain_str, c) in file.chains {
            let chain_id: u64 = chain_str.parse().map_err(|_| {
                AppError::Config(format!("Invalid chain id '{}' in pool registry", chain_str))
            })?;

            let wrapped_native = match c.wrapped_native {
                Some(raw) => parse_address(&raw, &format!("chains.{chain_id}.wrapped_native"))?,
                None => constants::wrapped_native_for_chain(chain_id).ok_or_else(|| {
                    AppError::Config(format!(
                        "No wrapped_native for chain {} and no builtin default",
                        chain_id
                    ))
                })?,
            };

            let mut pools = Vec::with_capacity(c.pools.len());
            for pool in c.pools {
                pools.push(parse_pool(pool, chain_id)?);
            }
            chains.insert(
                chain_id,
                ChainPools {
                    wrapped_native,
                    pools,
                },
            );
        }

        Ok(Self { chains })
    }

    pub fn chain(&self, chain_id: u64) -> Option<&ChainPools> {
        self.chains.get(&chain_id)
    }
}

fn parse_pool(raw: PoolConfigFile, chain_id: u64) -> Result<PoolConfig, AppError> {
    let field = |name: &str| format!("chains.{chain_id}.pools.{}.{name}", raw.id);
    Ok(PoolConfig {
        lp_token: parse_address(&raw.lp_token, &field("lp_token"))?,
        router: parse_address(&raw.router, &field("router"))?,
        chef: parse_address(&raw.chef, &field("chef"))?,
        reward_token: parse_address(&raw.reward_token, &field("reward_token"))?,
        secondary_reward: raw
            .secondary_reward
            .as_deref()
            .map(|s| parse_address(s, &field("secondary_reward")))
            .transpose()?,
        id: raw.id,
        protocol_name: raw.protocol_name,
        protocol_symbol: raw.protocol_symbol,
        pool_id: raw.pool_id,
        strategy_artifact: raw.strategy_artifact,
    })
}

fn parse_address(raw: &str, field: &str) -> Result<Address, AppError> {
    Address::from_str(raw).map_err(|_| AppError::InvalidAddress(format!("{field} -> {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_registry(body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "vaultsmith-pools-test-{}-{}.json",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        std::fs::write(&path, body).expect("write temp registry");
        path
    }

    const SAMPLE: &str = r#"
{
  "chains": {
    "2000": {
      "pools": [
        {
          "id": "yode-usdc-wwdoge",
          "protocol_name": "YodeSwap",
          "protocol_symbol": "YODE",
          "lp_token": "0x8DCeBE9f071562D52b5ABB17235f3bCA768C1e44",
          "router": "0x1111111111111111111111111111111111111111",
          "chef": "0x2222222222222222222222222222222222222222",
          "reward_token": "0x3333333333333333333333333333333333333333",
          "pool_id": 11,
          "strategy_artifact": "StrategyChefLP"
        }
      ]
    }
  }
}
"#;

    #[test]
    fn parses_pools_and_defaults_wrapped_native() {
        let path = write_registry(SAMPLE);
        let registry =
            PoolRegistry::load_from_file(path.to_str().expect("utf8 path")).expect("load");
        std::fs::remove_file(&path).ok();

        let chain = registry.chain(2000).expect("dogechain entry");
        assert_eq!(chain.wrapped_native, constants::WWDOGE_DOGECHAIN);
        assert_eq!(chain.pools.len(), 1);

        let pool = &chain.pools[0];
        assert_eq!(pool.id, "yode-usdc-wwdoge");
        assert_eq!(pool.pool_id, 11);
        assert_eq!(pool.strategy_artifact, "StrategyChefLP");
        assert!(pool.secondary_reward.is_none());
    }

    #[test]
    fn rejects_malformed_address_with_field_context() {
        let body = SAMPLE.replace("0x1111111111111111111111111111111111111111", "not-an-address");
        let path = write_registry(&body);
        let err = PoolRegistry::load_from_file(path.to_str().expect("utf8 path")).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, AppError::InvalidAddress(msg) if msg.contains("router")));
    }

    #[test]
    fn unknown_chain_without_wrapped_native_is_rejected() {
        let body = SAMPLE.replace("\"2000\"", "\"31337\"");
        let path = write_registry(&body);
        let err = PoolRegistry::load_from_file(path.to_str().expect("utf8 path")).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, AppError::Config(msg) if msg.contains("wrapped_native")));
    }

    #[test]
    fn missing_registry_file_is_config_error() {
        let err = PoolRegistry::load_from_file("/nonexistent/pools.json").unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("not found")));
    }
}
