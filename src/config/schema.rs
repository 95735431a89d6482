//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the mint client.
//! All types derive Serde traits for deserialization from config files.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Contract the client mints against when no config file overrides it.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xB381567590EA051380E32CA618e5eb8A4A3cC983";

/// Public JSON-RPC endpoint used for unauthenticated reads.
pub const DEFAULT_RPC_URL: &str = "https://eth.llamarpc.com";

/// Environment variable holding the wallet's private keys.
pub const DEFAULT_PRIVATE_KEYS_ENV: &str = "MINT_WALLET_PRIVATE_KEYS";

/// Root configuration for the mint client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MinterConfig {
    /// Chain connection settings.
    pub chain: ChainConfig,

    /// Deployed minter contract.
    pub contract: ContractConfig,

    /// Transaction submission settings.
    pub minting: MintingConfig,

    /// Wallet key source.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// JSON-RPC connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, tried in order.
    pub failover_urls: Vec<String>,

    /// Expected chain ID (1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            rpc_timeout_secs: 10,
        }
    }
}

impl ChainConfig {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the minter contract.
    pub address: String,

    /// Supply cap shown next to the minted count.
    pub max_supply: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            max_supply: 10_000,
        }
    }
}

impl ContractConfig {
    /// Parse the configured contract address.
    pub fn parsed_address(&self) -> Result<Address, String> {
        self.address
            .parse()
            .map_err(|e| format!("Invalid contract address '{}': {}", self.address, e))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MintingConfig {
    /// Block confirmations to await after submitting a mint.
    pub confirmations: u64,

    /// Maximum time to wait for those confirmations, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Re-read supply after a lady mint (the standard mint always does).
    pub refresh_supply_after_lady_mint: bool,
}

impl Default for MintingConfig {
    fn default() -> Self {
        Self {
            confirmations: 1,
            confirmation_timeout_secs: 600,
            poll_interval_ms: 2_000,
            refresh_supply_after_lady_mint: false,
        }
    }
}

impl MintingConfig {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Environment variable with comma-separated hex private keys.
    ///
    /// An unset variable means no wallet is available.
    pub private_keys_env: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            private_keys_env: DEFAULT_PRIVATE_KEYS_ENV.to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_filter: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus listen address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "mint_client=info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}
