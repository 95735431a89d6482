//! Read-only RPC client for the minter contract.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint (primary + failovers)
//! - Query contract state (total supply, mint price)
//! - Handle timeouts and network errors gracefully

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::contract;
use crate::blockchain::provider::ReadProvider;
use crate::blockchain::types::{ChainError, ChainId, ChainResult};
use crate::config::ChainConfig;

/// Read-side RPC client with failover support.
#[derive(Clone)]
pub struct RpcReader {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Minter contract queried by `eth_call`.
    contract: Address,
    /// Expected chain ID.
    chain_id: u64,
    /// Request timeout duration.
    timeout_duration: Duration,
    rpc_url: String,
}

impl RpcReader {
    /// Create a reader for `contract` on the configured chain.
    ///
    /// Connection is lazy; the chain ID is checked up front but a mismatch or
    /// an unreachable endpoint only logs a warning.
    pub async fn new(config: &ChainConfig, contract: Address) -> ChainResult<Self> {
        let reader = Self::connect(config, contract)?;

        match reader.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    contract = %contract,
                    "RPC reader initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "RPC reader initialized but chain verification failed"
                );
            }
        }

        Ok(reader)
    }

    /// Build the provider list without touching the network.
    pub fn connect(config: &ChainConfig, contract: Address) -> ChainResult<Self> {
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(
            Arc::new(ProviderBuilder::new().connect_http(primary_url))
                as Arc<dyn Provider + Send + Sync>,
        );

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(
                    Arc::new(ProviderBuilder::new().connect_http(url))
                        as Arc<dyn Provider + Send + Sync>,
                );
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        Ok(Self::with_providers(config, contract, providers))
    }

    /// Reader over an already built provider list, primary first.
    pub fn with_providers(
        config: &ChainConfig,
        contract: Address,
        providers: Vec<Arc<dyn Provider + Send + Sync>>,
    ) -> Self {
        Self {
            providers,
            contract,
            chain_id: config.chain_id,
            timeout_duration: config.rpc_timeout(),
            rpc_url: config.rpc_url.clone(),
        }
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> ChainResult<ChainId> {
        let mut last_error = None;
        let mut timed_out = false;
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_chain_id()).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                    last_error = Some(e.to_string());
                }
                Err(_) => {
                    timed_out = true;
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(self.exhausted(last_error, timed_out))
    }

    /// `eth_call` against the contract, falling through providers in order.
    async fn call_contract(&self, data: Bytes) -> ChainResult<Bytes> {
        let tx = TransactionRequest::default()
            .with_to(self.contract)
            .with_input(data);

        let mut last_error = None;
        let mut timed_out = false;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = async { provider.call(tx.clone()).await };
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(output)) => return Ok(output),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "eth_call failed");
                    last_error = Some(e.to_string());
                }
                Err(_) => {
                    timed_out = true;
                    tracing::warn!(provider_idx = i, "eth_call timed out");
                }
            }
        }

        Err(self.exhausted(last_error, timed_out))
    }

    /// Error for a request every provider failed, carrying the last cause.
    ///
    /// Only timeouts and no error response means the request timed out.
    fn exhausted(&self, last_error: Option<String>, timed_out: bool) -> ChainError {
        let secs = self.timeout_duration.as_secs();
        match (last_error, timed_out) {
            (Some(cause), true) => ChainError::Rpc(format!(
                "All RPC providers failed: {} (others timed out after {} seconds)",
                cause, secs
            )),
            (Some(cause), false) => ChainError::Rpc(format!("All RPC providers failed: {}", cause)),
            (None, true) => ChainError::Timeout(secs),
            (None, false) => ChainError::Rpc("No RPC providers configured".to_string()),
        }
    }

    async fn read_uint(&self, data: Bytes, what: &str) -> ChainResult<U256> {
        let output = self.call_contract(data).await?;
        contract::decode_uint256(&output)
            .map_err(|e| ChainError::Decode(format!("{}: {}", what, e)))
    }
}

impl ReadProvider for RpcReader {
    async fn total_supply(&self) -> ChainResult<U256> {
        let supply = self
            .read_uint(contract::total_supply_calldata(), "totalSupply")
            .await?;
        tracing::debug!(supply = %supply, "Read total supply");
        Ok(supply)
    }

    async fn mint_price(&self) -> ChainResult<U256> {
        let price = self
            .read_uint(contract::mint_price_calldata(), "MINT_PRICE")
            .await?;
        tracing::debug!(price_wei = %price, "Read mint price");
        Ok(price)
    }
}

impl std::fmt::Debug for RpcReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcReader")
            .field("rpc_url", &self.rpc_url)
            .field("providers", &self.providers.len())
            .field("contract", &self.contract)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
