//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the toolkit.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the stream toolkit.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Full node and faucet endpoints.
    pub network: NetworkConfig,

    /// Signer key material location.
    pub keys: KeysConfig,

    /// Deployed stream package.
    pub contract: ContractConfig,

    /// Caller-side retry configuration.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, tried in order.
    pub failover_urls: Vec<String>,

    /// Faucet gas endpoint.
    pub faucet_url: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://fullnode.testnet.sui.io:443".to_string(),
            failover_urls: Vec::new(),
            faucet_url: "https://faucet.testnet.sui.io/gas".to_string(),
            rpc_timeout_secs: 10,
        }
    }
}

/// Where the signing mnemonic comes from and how it is derived.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Name of the environment variable holding the mnemonic phrase.
    pub mnemonic_env: String,

    /// Derivation path (None = default Ed25519 path).
    pub derivation_path: Option<String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            mnemonic_env: crate::keys::MNEMONIC_ENV_VAR.to_string(),
            derivation_path: None,
        }
    }
}

/// Identifiers of the deployed stream package.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Package object ID.
    pub package_id: String,

    /// Shared `GlobalConfig` object ID.
    pub global_config_id: String,

    /// Coin type argument for stream calls.
    pub coin_type: String,

    /// Gas budget in MIST for submitted transactions.
    pub gas_budget: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            package_id: String::new(),
            global_config_id: String::new(),
            coin_type: "0x2::sui::SUI".to_string(),
            gas_budget: 10_000_000,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 5000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Output format: "pretty" or "json".
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}
