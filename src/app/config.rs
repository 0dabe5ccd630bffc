// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use crate::domain::constants;
use crate::domain::error::AppError;
use alloy::primitives::Address;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalSettings {
    // General
    #[serde(default = "default_debug")]
    pub debug: bool,
    /// Target chain id; auto-detected from the RPC when absent.
    pub chain: Option<u64>,

    // Identity
    pub wallet_key: String,
    pub wallet_address: Option<Address>,

    // Deployment roles; each falls back to the deployer address.
    pub keeper: Option<Address>,
    pub strategist: Option<Address>,
    pub fee_recipient: Option<Address>,

    // Network
    pub http_providers: Option<HashMap<String, String>>,
    pub etherscan_api_key: Option<String>,

    // Deployment tuning
    #[serde(default = "default_approval_delay_secs")]
    pub approval_delay_secs: u64,
    #[serde(default = "default_max_gas")]
    pub max_gas_price_gwei: u64,
    pub pools_path: Option<String>,
    pub artifacts_dir: Option<String>,
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,
    #[serde(default = "default_receipt_timeout_ms")]
    pub receipt_timeout_ms: u64,
}

// Defaults
fn default_debug() -> bool {
    false
}
fn default_approval_delay_secs() -> u64 {
    constants::DEFAULT_APPROVAL_DELAY_SECS
}
fn default_max_gas() -> u64 {
    500
}
fn default_receipt_poll_ms() -> u64 {
    500
}
fn default_receipt_timeout_ms() -> u64 {
    120_000
}

impl GlobalSettings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(selected_path) = path {
            builder = builder.add_source(File::from(Path::new(selected_path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // Deterministic precedence: CLI (in main) > env/.env > config file.
        builder = builder.add_source(Environment::default());

        let settings: GlobalSettings = builder.build()?.try_deserialize()?;

        if settings.wallet_key.is_empty() {
            return Err(AppError::Config("WALLET_KEY is missing".to_string()));
        }

        Ok(settings)
    }

    pub fn load() -> Result<Self, AppError> {
        Self::load_with_path(None)
    }

    /// Best-effort primary HTTP RPC URL for chain auto-detection.
    pub fn primary_http_provider(&self) -> Option<String> {
        if let Some(map) = &self.http_providers {
            if let Some((_, v)) = map.iter().min_by_key(|(k, _)| k.parse::<u64>().ok()) {
                return Some(v.clone());
            }
        }
        std::env::var("http_provider")
            .ok()
            .filter(|s| !s.is_empty())
    }

    /// RPC URL for a specific chain: config map, then env convention
    /// (`http_provider_{chain}`, `http_provider`), then the hardcoded
    /// public fallback.
    pub fn get_http_provider(&self, chain_id: u64) -> Result<String, AppError> {
        if let Some(urls) = &self.http_providers
            && let Some(url) = urls.get(&chain_id.to_string())
        {
            return Ok(url.clone());
        }

        let candidates = [
            format!("http_provider_{}", chain_id),
            "http_provider".to_string(),
        ];
        for key in candidates {
            if let Ok(v) = std::env::var(&key) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Ok(trimmed.to_string());
                }
            }
        }

        if let Some(url) = constants::default_rpc_for_chain(chain_id) {
            return Ok(url.to_string());
        }

        Err(AppError::Config(format!(
            "No RPC URL found for chain {}",
            chain_id
        )))
    }

    pub fn etherscan_api_key_value(&self) -> Option<String> {
        if let Ok(v) = std::env::var("ETHERSCAN_API_KEY")
            && !v.trim().is_empty()
        {
            return Some(v);
        }
        self.etherscan_api_key.clone()
    }

    pub fn pools_path(&self) -> String {
        std::env::var("POOLS_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.pools_path.clone())
            .unwrap_or_else(|| "data/pools.json".to_string())
    }

    pub fn artifacts_dir(&self) -> String {
        std::env::var("ARTIFACTS_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.artifacts_dir.clone())
            .unwrap_or_else(|| "artifacts".to_string())
    }

    pub fn receipt_poll_ms_value(&self) -> u64 {
        self.receipt_poll_ms.max(100)
    }

    pub fn receipt_timeout_ms_value(&self) -> u64 {
        self.receipt_timeout_ms.max(self.receipt_poll_ms_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn base_settings() -> GlobalSettings {
        GlobalSettings {
            debug: default_debug(),
            chain: None,
            wallet_key: "0x0".to_string(),
            wallet_address: None,
            keeper: None,
            strategist: None,
            fee_recipient: None,
            http_providers: None,
            etherscan_api_key: None,
            approval_delay_secs: default_approval_delay_secs(),
            max_gas_price_gwei: default_max_gas(),
            pools_path: None,
            artifacts_dir: None,
            receipt_poll_ms: default_receipt_poll_ms(),
            receipt_timeout_ms: default_receipt_timeout_ms(),
        }
    }

    #[test]
    fn http_provider_prefers_configured_map() {
        let mut settings = base_settings();
        settings.http_providers = Some(HashMap::from([(
            "2000".to_string(),
            "https://rpc.example".to_string(),
        )]));
        assert_eq!(
            settings.get_http_provider(2000).unwrap(),
            "https://rpc.example"
        );
    }

    #[test]
    fn http_provider_falls_back_to_public_endpoint() {
        let _env_lock = env_lock_guard();
        let old_specific = std::env::var("http_provider_250").ok();
        let old_generic = std::env::var("http_provider").ok();
        unsafe {
            std::env::remove_var("http_provider_250");
            std::env::remove_var("http_provider");
        }

        let settings = base_settings();
        assert_eq!(
            settings.get_http_provider(250).unwrap(),
            "https://rpc.ftm.tools"
        );

        if let Some(v) = old_specific {
            unsafe { std::env::set_var("http_provider_250", v) };
        }
        if let Some(v) = old_generic {
            unsafe { std::env::set_var("http_provider", v) };
        }
    }

    #[test]
    fn http_provider_errors_for_unknown_chain() {
        let _env_lock = env_lock_guard();
        let old_specific = std::env::var("http_provider_31337").ok();
        let old_generic = std::env::var("http_provider").ok();
        unsafe {
            std::env::remove_var("http_provider_31337");
            std::env::remove_var("http_provider");
        }

        let settings = base_settings();
        let err = settings.get_http_provider(31337).unwrap_err();
        match err {
            AppError::Config(msg) => assert!(msg.contains("No RPC URL")),
            other => panic!("Unexpected error variant: {other:?}"),
        }

        if let Some(v) = old_specific {
            unsafe { std::env::set_var("http_provider_31337", v) };
        }
        if let Some(v) = old_generic {
            unsafe { std::env::set_var("http_provider", v) };
        }
    }

    #[test]
    fn env_http_provider_wins_over_public_fallback() {
        let _env_lock = env_lock_guard();
        let old = std::env::var("http_provider_2000").ok();
        unsafe {
            std::env::set_var("http_provider_2000", "https://node.internal");
        }

        let settings = base_settings();
        assert_eq!(
            settings.get_http_provider(2000).unwrap(),
            "https://node.internal"
        );

        if let Some(v) = old {
            unsafe { std::env::set_var("http_provider_2000", v) };
        } else {
            unsafe { std::env::remove_var("http_provider_2000") };
        }
    }

    #[test]
    fn receipt_tuning_values_have_safe_floor() {
        let mut settings = base_settings();
        settings.receipt_poll_ms = 0;
        settings.receipt_timeout_ms = 1;
        assert_eq!(settings.receipt_poll_ms_value(), 100);
        assert_eq!(settings.receipt_timeout_ms_value(), 100);
    }

    #[test]
    fn approval_delay_defaults_to_sixty_seconds() {
        let settings = base_settings();
        assert_eq!(settings.approval_delay_secs, 60);
    }

    #[test]
    fn pools_path_defaults_when_unset() {
        let _env_lock = env_lock_guard();
        let old = std::env::var("POOLS_PATH").ok();
        unsafe { std::env::remove_var("POOLS_PATH") };

        let settings = base_settings();
        assert_eq!(settings.pools_path(), "data/pools.json");

        if let Some(v) = old {
            unsafe { std::env::set_var("POOLS_PATH", v) };
        }
    }
}
